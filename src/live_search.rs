//! Debounced live search over the whole card collection, one pipeline per
//! browser session. Keystrokes feed a settle-timer; the settled query is
//! matched by the hosted store, not the local predicate.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::debounce::Debouncer;
use crate::models::Card;
use crate::search::{QueryDecision, SearchMode};
use crate::store::CardStore;

#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    /// Latest raw input as typed.
    pub raw_query: String,
    /// Query the current results answer, trimmed and lowercased.
    pub settled_query: String,
    pub cards: Vec<Card>,
    /// A newer query is still waiting out its quiet period or its store
    /// round-trip.
    pub searching: bool,
    pub notice: Option<String>,
}

impl SearchSnapshot {
    /// The latest input is long enough to search. The results panel follows
    /// the input box, not the settled query, so clearing the box hides
    /// results without waiting out the quiet period.
    pub fn input_active(&self) -> bool {
        SearchMode::LIVE.normalize(&self.raw_query) != QueryDecision::MatchNone
    }
}

pub struct LiveSearch {
    state: Arc<RwLock<SearchSnapshot>>,
    debouncer: Debouncer<String>,
}

impl LiveSearch {
    /// Dropping the returned value tears the pipeline down and cancels any
    /// pending quiet-period timer.
    pub fn new(store: CardStore, quiet: Duration) -> Self {
        let state = Arc::new(RwLock::new(SearchSnapshot::default()));
        let worker_state = state.clone();
        let debouncer = Debouncer::new(quiet, move |raw: String| {
            let store = store.clone();
            let state = worker_state.clone();
            async move {
                match SearchMode::LIVE.normalize(&raw) {
                    // Under the minimum length: show nothing, not everything
                    QueryDecision::MatchNone => {
                        let mut snapshot = state.write().await;
                        if snapshot.raw_query != raw {
                            return;
                        }
                        snapshot.settled_query.clear();
                        snapshot.cards.clear();
                        snapshot.searching = false;
                        snapshot.notice = None;
                    }
                    QueryDecision::Filter(query) => {
                        debug!("🔍 Live search for {query:?}");
                        let result = store.search(&query).await;
                        let mut snapshot = state.write().await;
                        // A newer keystroke arrived while we were querying;
                        // its own settle will overwrite everything
                        if snapshot.raw_query != raw {
                            return;
                        }
                        match result {
                            Ok(cards) => {
                                snapshot.cards = cards;
                                snapshot.notice = None;
                            }
                            Err(e) => {
                                error!("Live search query failed: {e}");
                                snapshot.cards = Vec::new();
                                snapshot.notice =
                                    Some("Search failed. Please try again.".to_string());
                            }
                        }
                        snapshot.settled_query = query;
                        snapshot.searching = false;
                    }
                    QueryDecision::NoFilter => {}
                }
            }
        });
        Self { state, debouncer }
    }

    /// Feed the next keystroke's value; supersedes any pending one.
    pub async fn submit(&self, raw: String) {
        {
            let mut snapshot = self.state.write().await;
            snapshot.searching =
                SearchMode::LIVE.normalize(&raw) != QueryDecision::MatchNone;
            snapshot.raw_query = raw.clone();
        }
        self.debouncer.submit(raw);
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        self.state.read().await.clone()
    }
}
