//! Summary counts for the welcome page and progress dashboard, derived from
//! the raw card collection.

use crate::models::{Card, Level};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelStats {
    pub level: Level,
    pub total: usize,
    /// Cards with a last-seen timestamp, i.e. rated at least once.
    pub completed: usize,
    pub favorites: usize,
    pub review: usize,
}

impl LevelStats {
    fn empty(level: Level) -> Self {
        LevelStats {
            level,
            total: 0,
            completed: 0,
            favorites: 0,
            review: 0,
        }
    }

    pub fn percent_complete(&self) -> u32 {
        percent(self.completed, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total_cards: usize,
    pub total_learned: usize,
    /// Share of all cards rated at least once, rounded to whole percent.
    pub accuracy: u32,
    pub levels: Vec<LevelStats>,
}

impl UserStats {
    pub fn level_total(&self, level: Level) -> usize {
        self.levels
            .iter()
            .find(|s| s.level == level)
            .map(|s| s.total)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total_cards == 0
    }
}

pub fn aggregate(cards: &[Card]) -> UserStats {
    let mut levels: Vec<LevelStats> = Level::ALL.into_iter().map(LevelStats::empty).collect();

    for card in cards {
        let Some(entry) = levels.iter_mut().find(|s| s.level == card.level) else {
            continue;
        };
        entry.total += 1;
        if card.last_seen.is_some() {
            entry.completed += 1;
        }
        if card.is_favorite {
            entry.favorites += 1;
        }
        if card.needs_review {
            entry.review += 1;
        }
    }

    let total_learned = levels.iter().map(|s| s.completed).sum();
    UserStats {
        total_cards: cards.len(),
        total_learned,
        accuracy: percent(total_learned, cards.len()),
        levels,
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    fn card(level: Level, seen: bool, favorite: bool, review: bool) -> Card {
        Card {
            id: 0,
            word: "Hello".to_string(),
            image_url: "/placeholder.svg".to_string(),
            description: "greeting".to_string(),
            examples: None,
            level,
            is_favorite: favorite,
            needs_review: review,
            last_seen: seen.then(Utc::now),
        }
    }

    #[test]
    fn aggregates_per_level_counts() {
        let cards = vec![
            card(Level::Beginner, true, true, false),
            card(Level::Beginner, false, false, true),
            card(Level::Intermediate, true, false, false),
        ];
        let stats = aggregate(&cards);

        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.total_learned, 2);
        assert_eq!(stats.accuracy, 67);
        assert_eq!(stats.level_total(Level::Beginner), 2);
        assert_eq!(stats.level_total(Level::Advanced), 0);

        let beginner = &stats.levels[0];
        assert_eq!(beginner.level, Level::Beginner);
        assert_eq!(beginner.completed, 1);
        assert_eq!(beginner.favorites, 1);
        assert_eq!(beginner.review, 1);
        assert_eq!(beginner.percent_complete(), 50);
    }

    #[test]
    fn empty_collection_yields_zeroed_stats() {
        let stats = aggregate(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.accuracy, 0);
        assert_eq!(stats.levels.len(), Level::ALL.len());
        assert!(stats.levels.iter().all(|s| s.total == 0));
    }
}
