use std::sync::Arc;

use askama::Template;
use axum::{Extension, Form, extract::State, http::HeaderMap, response::IntoResponse};
use serde::Deserialize;

use crate::{
    config::AppConfig,
    errors::ApiError,
    live_search::{LiveSearch, SearchSnapshot},
    router::AppState,
    routes::{ensure_session, handle_render, session_id},
    templates::SearchResultsTemplate,
};

#[derive(Deserialize)]
pub struct LiveSearchForm {
    #[serde(default)]
    pub q: String,
}

/// Accepts one keystroke's worth of input. The pipeline settles the query
/// after its quiet period; until then the returned fragment polls for the
/// settled results.
pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
    Form(form): Form<LiveSearchForm>,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, sid) = ensure_session(&headers, &config);
    let pipeline = state
        .searches
        .entry(sid)
        .or_insert_with(|| Arc::new(LiveSearch::new(state.store.clone(), config.search_debounce)))
        .value()
        .clone();

    pipeline.submit(form.q).await;
    let snapshot = pipeline.snapshot().await;
    let template = SearchResultsTemplate { snapshot };
    Ok((jar, handle_render(template.render())?))
}

pub async fn search_results(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let pipeline = session_id(&headers, &config)
        .and_then(|sid| state.searches.get(&sid).map(|entry| entry.value().clone()));
    let snapshot = match pipeline {
        Some(pipeline) => pipeline.snapshot().await,
        None => SearchSnapshot::default(),
    };
    handle_render(SearchResultsTemplate { snapshot }.render())
}
