use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use dashmap::DashMap;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::{
    config::AppConfig, live_search::LiveSearch, practice::PracticeSession, routes,
    store::CardStore,
};

pub struct AppState {
    pub store: CardStore,
    /// Active practice sessions, keyed by the signed browser-session cookie.
    pub sessions: DashMap<String, Arc<Mutex<PracticeSession>>>,
    /// Live-search pipelines, same key; dropped entries cancel their timers.
    pub searches: DashMap<String, Arc<LiveSearch>>,
}

pub fn init_router(db: PgPool, config: AppConfig) -> Router {
    let state = Arc::new(AppState {
        store: CardStore::new(Arc::new(db)),
        sessions: DashMap::new(),
        searches: DashMap::new(),
    });

    Router::new()
        .route("/", get(routes::index))
        .route("/styles.css", get(routes::styles))
        .route("/health", get(routes::health_handler))
        .route("/dashboard", get(routes::dashboard))
        .route("/seed", post(routes::seed_database))
        .route("/search", post(routes::search::submit_search))
        .route("/search/results", get(routes::search::search_results))
        .route(
            "/practice",
            get(routes::practice::practice_page).post(routes::practice::start_practice),
        )
        .route("/practice/flip", post(routes::practice::flip_card))
        .route("/practice/rate", post(routes::practice::rate_card))
        .route("/practice/favorite", post(routes::practice::toggle_favorite))
        .route("/practice/review", post(routes::practice::toggle_review))
        .route("/practice/shuffle", post(routes::practice::shuffle_deck))
        .route("/practice/search", post(routes::practice::update_search))
        .route("/practice/end", post(routes::practice::end_practice))
        .with_state(state)
        .layer(Extension(config))
}
