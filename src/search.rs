//! Client-side search and category filtering for the working deck.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::models::Card;

/// Category tabs shown above the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardFilter {
    #[default]
    All,
    Favorites,
    Review,
    Recent,
}

impl CardFilter {
    pub const OPTIONS: [CardFilter; 4] = [
        CardFilter::All,
        CardFilter::Favorites,
        CardFilter::Recent,
        CardFilter::Review,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CardFilter::All => "All Cards",
            CardFilter::Favorites => "Favorites",
            CardFilter::Recent => "Recent",
            CardFilter::Review => "Due for Review",
        }
    }
}

impl Display for CardFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFilter::All => write!(f, "all"),
            CardFilter::Favorites => write!(f, "favorites"),
            CardFilter::Review => write!(f, "review"),
            CardFilter::Recent => write!(f, "recent"),
        }
    }
}

/// What a call site does with a query shorter than its minimum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortQuery {
    /// Too short to filter: leave the deck as-is.
    MatchAll,
    /// Too short to search: show nothing instead of everything.
    MatchNone,
}

/// Query-length policy. The two call sites intentionally diverge and both
/// behaviors are preserved here rather than unified.
#[derive(Debug, Clone, Copy)]
pub struct SearchMode {
    pub min_query_len: usize,
    pub on_short: ShortQuery,
}

impl SearchMode {
    /// Practice view: any non-empty trimmed query narrows the deck.
    pub const PRACTICE: SearchMode = SearchMode {
        min_query_len: 1,
        on_short: ShortQuery::MatchAll,
    };

    /// Live search: queries under two characters return no results.
    pub const LIVE: SearchMode = SearchMode {
        min_query_len: 2,
        on_short: ShortQuery::MatchNone,
    };

    /// Trim + lowercase the raw query and decide how it applies.
    pub fn normalize(&self, raw: &str) -> QueryDecision {
        let query = raw.trim().to_lowercase();
        if query.chars().count() >= self.min_query_len {
            QueryDecision::Filter(query)
        } else {
            match self.on_short {
                ShortQuery::MatchAll => QueryDecision::NoFilter,
                ShortQuery::MatchNone => QueryDecision::MatchNone,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryDecision {
    NoFilter,
    MatchNone,
    Filter(String),
}

/// Case-insensitive substring match against word, description, or any
/// example sentence. `needle` must already be trimmed and lowercased.
pub fn text_matches(card: &Card, needle: &str) -> bool {
    if card.word.to_lowercase().contains(needle) {
        return true;
    }
    if card.description.to_lowercase().contains(needle) {
        return true;
    }
    card.examples_list().join(" ").to_lowercase().contains(needle)
}

pub fn category_matches(card: &Card, filter: CardFilter) -> bool {
    match filter {
        CardFilter::All => true,
        CardFilter::Favorites => card.is_favorite,
        CardFilter::Review => card.needs_review,
        CardFilter::Recent => card.last_seen.is_some(),
    }
}

/// Text match (when a query applies) AND category match.
pub fn card_matches(card: &Card, decision: &QueryDecision, filter: CardFilter) -> bool {
    match decision {
        QueryDecision::MatchNone => return false,
        QueryDecision::Filter(needle) if !text_matches(card, needle) => return false,
        _ => {}
    }
    category_matches(card, filter)
}

/// Filters without reordering: the deck keeps the input sequence's order.
pub fn filter_cards(
    cards: &[Card],
    raw_query: &str,
    filter: CardFilter,
    mode: SearchMode,
) -> Vec<Card> {
    let decision = mode.normalize(raw_query);
    cards
        .iter()
        .filter(|card| card_matches(card, &decision, filter))
        .cloned()
        .collect()
}
