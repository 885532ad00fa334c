use askama::Template;

use crate::live_search::SearchSnapshot;
use crate::models::{Card, Level};
use crate::search::CardFilter;
use crate::stats::UserStats;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub stats: UserStats,
    pub show_seed_prompt: bool,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub stats: UserStats,
}

#[derive(Template)]
#[template(path = "search_results.html")]
pub struct SearchResultsTemplate {
    pub snapshot: SearchSnapshot,
}

#[derive(Template)]
#[template(path = "practice.html")]
pub struct PracticeTemplate {
    pub level: Level,
    pub card: Option<Card>,
    /// Decoded examples of the current card.
    pub examples: Vec<String>,
    pub flipped: bool,
    pub position: usize,
    pub deck_len: usize,
    pub total_len: usize,
    pub progress: u32,
    pub query: String,
    pub filter: CardFilter,
    pub filters: [CardFilter; 4],
    pub complete: bool,
    pub degraded: bool,
    pub has_selection: bool,
    pub notice: Option<String>,
}
