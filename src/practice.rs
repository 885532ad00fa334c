//! Practice session state: the working deck and cursor for one study run.
//!
//! The session owns its deck and cursor exclusively; handlers mutate it only
//! through the transitions below, and persistence happens at the route layer
//! before the cached copies are touched.

use crate::models::{Card, Level};
use crate::search::{self, CardFilter, SearchMode};
use crate::shuffle;

/// Result of rating the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    Advanced,
    Complete,
}

pub struct PracticeSession {
    level: Level,
    /// Raw fetched set for the level, shuffled once at load.
    cards: Vec<Card>,
    /// Working deck derived from `cards` by the active query and filter.
    deck: Vec<Card>,
    cursor: usize,
    flipped: bool,
    query: String,
    filter: CardFilter,
    /// Single-card override from a live-search selection; when set, the deck
    /// is always exactly this card.
    selected: Option<Card>,
    complete: bool,
    /// Fetch failed at load; the empty deck means "nothing loaded", not
    /// "no matches".
    degraded: bool,
    notice: Option<String>,
}

impl PracticeSession {
    pub fn new(level: Level, cards: Vec<Card>) -> Self {
        let mut session = Self {
            level,
            cards: shuffle::shuffled(&cards),
            deck: Vec::new(),
            cursor: 0,
            flipped: false,
            query: String::new(),
            filter: CardFilter::All,
            selected: None,
            complete: false,
            degraded: false,
            notice: None,
        };
        session.refilter();
        session
    }

    /// Session for one explicitly selected card, bypassing level fetch and
    /// filtering entirely.
    pub fn for_card(card: Card) -> Self {
        let level = card.level;
        let mut session = Self {
            level,
            cards: vec![card.clone()],
            deck: Vec::new(),
            cursor: 0,
            flipped: false,
            query: String::new(),
            filter: CardFilter::All,
            selected: Some(card),
            complete: false,
            degraded: false,
            notice: None,
        };
        session.refilter();
        session
    }

    /// Degraded ready state after a failed fetch: zero cards, with a notice.
    pub fn degraded(level: Level, notice: impl Into<String>) -> Self {
        Self {
            level,
            cards: Vec::new(),
            deck: Vec::new(),
            cursor: 0,
            flipped: false,
            query: String::new(),
            filter: CardFilter::All,
            selected: None,
            complete: false,
            degraded: true,
            notice: Some(notice.into()),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn current(&self) -> Option<&Card> {
        self.deck.get(self.cursor)
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> CardFilter {
        self.filter
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn total_len(&self) -> usize {
        self.cards.len()
    }

    /// 1-based position for display.
    pub fn position(&self) -> usize {
        if self.deck.is_empty() { 0 } else { self.cursor + 1 }
    }

    pub fn progress_percent(&self) -> u32 {
        if self.deck.is_empty() {
            0
        } else {
            (self.position() as f64 / self.deck.len() as f64 * 100.0).round() as u32
        }
    }

    /// Toggles which face of the current card is visible. No-op without a
    /// card; never mutates any record.
    pub fn flip(&mut self) {
        if self.current().is_some() {
            self.flipped = !self.flipped;
        }
    }

    /// Updates the search inputs and recomputes the deck when they changed.
    pub fn set_search(&mut self, query: String, filter: CardFilter) {
        if self.query == query && self.filter == filter {
            return;
        }
        self.query = query;
        self.filter = filter;
        self.refilter();
    }

    /// Recomputes deck = filter(raw records) — or the selected card alone —
    /// and resets the cursor to the first card, prompt side up.
    fn refilter(&mut self) {
        self.deck = match &self.selected {
            Some(card) => vec![card.clone()],
            None => {
                search::filter_cards(&self.cards, &self.query, self.filter, SearchMode::PRACTICE)
            }
        };
        self.cursor = 0;
        self.flipped = false;
        self.complete = false;
    }

    /// Moves past the current card after it was rated. The route persists the
    /// rating first; this only steps the cursor.
    pub fn advance(&mut self) -> RateOutcome {
        self.flipped = false;
        if self.cursor + 1 < self.deck.len() {
            self.cursor += 1;
            RateOutcome::Advanced
        } else {
            self.complete = true;
            RateOutcome::Complete
        }
    }

    /// Reshuffles the current deck in place and restarts from the top.
    pub fn reshuffle(&mut self) {
        shuffle::shuffle_in_place(&mut self.deck);
        self.cursor = 0;
        self.flipped = false;
    }

    /// Applies a persisted field change to every cached copy of the card.
    /// Deliberately does not refilter: toggles leave cursor and flip alone.
    pub fn apply_update(&mut self, id: i32, apply: impl Fn(&mut Card)) {
        for card in self.cards.iter_mut().filter(|c| c.id == id) {
            apply(card);
        }
        for card in self.deck.iter_mut().filter(|c| c.id == id) {
            apply(card);
        }
        if let Some(selected) = self.selected.as_mut()
            && selected.id == id
        {
            apply(selected);
        }
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// One-shot notice for the next render.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    fn card(id: i32, word: &str) -> Card {
        Card {
            id,
            word: word.to_string(),
            image_url: "/placeholder.svg".to_string(),
            description: format!("how to sign {word}"),
            examples: None,
            level: Level::Beginner,
            is_favorite: false,
            needs_review: false,
            last_seen: None,
        }
    }

    fn session_with(n: i32) -> PracticeSession {
        let cards: Vec<Card> = (1..=n).map(|i| card(i, &format!("word{i}"))).collect();
        PracticeSession::new(Level::Beginner, cards)
    }

    #[test]
    fn starts_at_the_first_card_unflipped() {
        let session = session_with(3);
        assert_eq!(session.deck_len(), 3);
        assert_eq!(session.position(), 1);
        assert!(!session.is_flipped());
        assert!(!session.is_complete());
        assert!(session.current().is_some());
    }

    #[test]
    fn filter_change_resets_cursor_and_flip() {
        let mut cards: Vec<Card> = (1..=4).map(|i| card(i, &format!("word{i}"))).collect();
        cards[1].needs_review = true;
        cards[3].needs_review = true;
        let mut session = PracticeSession::new(Level::Beginner, cards);

        session.advance();
        session.advance();
        session.flip();
        assert_eq!(session.position(), 3);
        assert!(session.is_flipped());

        session.set_search(String::new(), CardFilter::Review);
        assert_eq!(session.position(), 1);
        assert!(!session.is_flipped());
        assert_eq!(session.deck_len(), 2);
        assert!(session.current().is_some_and(|c| c.needs_review));
    }

    #[test]
    fn unchanged_search_inputs_keep_the_cursor() {
        let mut session = session_with(3);
        session.advance();
        session.set_search(String::new(), CardFilter::All);
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn rating_walks_the_deck_and_completes() {
        let mut session = session_with(3);

        session.flip();
        assert_eq!(session.advance(), RateOutcome::Advanced);
        assert_eq!(session.position(), 2);
        assert!(!session.is_flipped());

        assert_eq!(session.advance(), RateOutcome::Advanced);
        assert_eq!(session.advance(), RateOutcome::Complete);
        assert!(session.is_complete());
    }

    #[test]
    fn rating_the_only_card_completes_immediately() {
        let mut session = PracticeSession::for_card(card(9, "Hello"));
        assert_eq!(session.deck_len(), 1);
        assert_eq!(session.advance(), RateOutcome::Complete);
    }

    #[test]
    fn selected_card_override_ignores_query_and_filter() {
        let mut session = PracticeSession::for_card(card(9, "Hello"));
        session.set_search("zzz".to_string(), CardFilter::Favorites);
        assert_eq!(session.deck_len(), 1);
        assert_eq!(session.current().map(|c| c.id), Some(9));
    }

    #[test]
    fn favorite_toggle_round_trips_with_opposite_payloads() {
        let mut session = session_with(2);
        let id = session.current().expect("deck not empty").id;
        let before = session.current().unwrap().is_favorite;

        let mut payloads = Vec::new();
        for _ in 0..2 {
            let next = !session.current().unwrap().is_favorite;
            payloads.push(next);
            session.apply_update(id, |c| c.is_favorite = next);
        }

        assert_eq!(payloads, vec![!before, before]);
        assert_eq!(session.current().unwrap().is_favorite, before);
        // Cursor and flip are untouched by toggles
        assert_eq!(session.position(), 1);
        assert!(!session.is_flipped());
    }

    #[test]
    fn apply_update_reaches_raw_set_deck_and_selection() {
        let mut session = PracticeSession::for_card(card(9, "Hello"));
        let now = Utc::now();
        session.apply_update(9, |c| {
            c.needs_review = true;
            c.last_seen = Some(now);
        });
        let current = session.current().unwrap();
        assert!(current.needs_review);
        assert_eq!(current.last_seen, Some(now));
    }

    #[test]
    fn reshuffle_keeps_the_deck_and_restarts() {
        let mut session = session_with(8);
        session.advance();
        session.flip();

        let mut before: Vec<i32> = (1..=8).collect();
        session.reshuffle();

        assert_eq!(session.position(), 1);
        assert!(!session.is_flipped());
        let mut after: Vec<i32> = Vec::new();
        while let Some(card) = session.current() {
            after.push(card.id);
            if session.advance() == RateOutcome::Complete {
                break;
            }
        }
        after.sort_unstable();
        before.sort_unstable();
        assert_eq!(after, before);
    }

    #[test]
    fn degraded_session_is_distinct_from_no_matches() {
        let mut failed = PracticeSession::degraded(Level::Advanced, "Failed to load flashcards.");
        assert!(failed.is_degraded());
        assert_eq!(failed.deck_len(), 0);
        assert_eq!(failed.take_notice().as_deref(), Some("Failed to load flashcards."));
        assert_eq!(failed.take_notice(), None);

        let mut no_matches = session_with(3);
        no_matches.set_search("no such word".to_string(), CardFilter::All);
        assert!(!no_matches.is_degraded());
        assert_eq!(no_matches.deck_len(), 0);
        assert_eq!(no_matches.total_len(), 3);
        assert!(no_matches.current().is_none());
    }

    #[test]
    fn flip_without_a_card_is_a_no_op() {
        let mut session = PracticeSession::degraded(Level::Beginner, "x");
        session.flip();
        assert!(!session.is_flipped());
    }
}
