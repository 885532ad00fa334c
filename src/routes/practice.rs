use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{
    config::AppConfig,
    errors::ApiError,
    models::Level,
    practice::{PracticeSession, RateOutcome},
    router::AppState,
    routes::{ensure_session, handle_render, session_id},
    search::CardFilter,
    templates::PracticeTemplate,
};

const FETCH_FAILED_NOTICE: &str = "Failed to load flashcards from the database.";

#[derive(Deserialize)]
pub struct StartForm {
    pub level: Option<Level>,
    /// Explicitly selected card from live search; bypasses level and filters.
    pub card_id: Option<i32>,
}

pub async fn start_practice(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
    Form(form): Form<StartForm>,
) -> Result<impl IntoResponse, ApiError> {
    let session = if let Some(card_id) = form.card_id {
        match state.store.fetch_card(card_id).await {
            Ok(Some(card)) => {
                info!("🃏 Starting single-card practice for {:?}", card.word);
                PracticeSession::for_card(card)
            }
            Ok(None) => return Err(ApiError::CardNotFound),
            Err(e) => {
                error!("Failed to fetch selected card {card_id}: {e}");
                PracticeSession::degraded(
                    form.level.unwrap_or(Level::Beginner),
                    FETCH_FAILED_NOTICE,
                )
            }
        }
    } else {
        let level = form
            .level
            .ok_or(ApiError::BadRequest("level or card_id required"))?;
        match state.store.fetch_level(level).await {
            Ok(cards) => {
                info!("🃏 Starting {level} practice with {} cards", cards.len());
                PracticeSession::new(level, cards)
            }
            Err(e) => {
                error!("Failed to fetch flashcards for {level}: {e}");
                PracticeSession::degraded(level, FETCH_FAILED_NOTICE)
            }
        }
    };

    let (jar, sid) = ensure_session(&headers, &config);
    // Leaving the welcome page tears down its live-search pipeline, which
    // cancels any pending debounce timer
    state.searches.remove(&sid);
    state.sessions.insert(sid, Arc::new(Mutex::new(session)));
    Ok((jar, Redirect::to("/practice")))
}

fn session_handle(
    state: &AppState,
    headers: &HeaderMap,
    config: &AppConfig,
) -> Result<Arc<Mutex<PracticeSession>>, ApiError> {
    let sid = session_id(headers, config).ok_or(ApiError::SessionExpired)?;
    state
        .sessions
        .get(&sid)
        .map(|entry| entry.value().clone())
        .ok_or(ApiError::SessionExpired)
}

pub async fn practice_page(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let handle = session_handle(&state, &headers, &config)?;
    let mut session = handle.lock().await;

    let card = session.current().cloned();
    let examples = card.as_ref().map(|c| c.examples_list()).unwrap_or_default();
    let template = PracticeTemplate {
        level: session.level(),
        flipped: session.is_flipped(),
        position: session.position(),
        deck_len: session.deck_len(),
        total_len: session.total_len(),
        progress: session.progress_percent(),
        query: session.query().to_string(),
        filter: session.filter(),
        filters: CardFilter::OPTIONS,
        complete: session.is_complete(),
        degraded: session.is_degraded(),
        has_selection: session.has_selection(),
        notice: session.take_notice(),
        card,
        examples,
    };
    handle_render(template.render())
}

pub async fn flip_card(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let handle = session_handle(&state, &headers, &config)?;
    handle.lock().await.flip();
    Ok(Redirect::to("/practice"))
}

#[derive(Deserialize)]
pub struct RateForm {
    pub known: bool,
}

/// Persist the rating for the current card, then advance. A failed write
/// leaves the cached copy untouched but the session continues.
pub async fn rate_card(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
    Form(form): Form<RateForm>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = session_handle(&state, &headers, &config)?;
    let mut session = handle.lock().await;

    let Some(card) = session.current().cloned() else {
        return Ok(Redirect::to("/practice"));
    };

    let now = Utc::now();
    match state.store.record_rating(card.id, form.known, now).await {
        Ok(()) => session.apply_update(card.id, |c| {
            c.needs_review = !form.known;
            c.last_seen = Some(now);
        }),
        Err(e) => {
            error!("Failed to record rating for card {}: {e}", card.id);
            session.set_notice("Failed to update flashcard progress.");
        }
    }

    if session.advance() == RateOutcome::Complete {
        info!("🎉 Practice session completed ({} cards)", session.deck_len());
    }
    Ok(Redirect::to("/practice"))
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let handle = session_handle(&state, &headers, &config)?;
    let mut session = handle.lock().await;

    let Some(card) = session.current().cloned() else {
        return Ok(Redirect::to("/practice"));
    };

    let value = !card.is_favorite;
    match state.store.set_favorite(card.id, value).await {
        Ok(()) => {
            session.apply_update(card.id, |c| c.is_favorite = value);
            session.set_notice(if value {
                format!("\"{}\" added to favorites.", card.word)
            } else {
                format!("\"{}\" removed from favorites.", card.word)
            });
        }
        Err(e) => {
            error!("Failed to update favorite status for card {}: {e}", card.id);
            session.set_notice("Failed to update favorite status.");
        }
    }
    Ok(Redirect::to("/practice"))
}

pub async fn toggle_review(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let handle = session_handle(&state, &headers, &config)?;
    let mut session = handle.lock().await;

    let Some(card) = session.current().cloned() else {
        return Ok(Redirect::to("/practice"));
    };

    let value = !card.needs_review;
    match state.store.set_needs_review(card.id, value).await {
        Ok(()) => {
            session.apply_update(card.id, |c| c.needs_review = value);
            session.set_notice(if value {
                format!("\"{}\" marked for review.", card.word)
            } else {
                format!("\"{}\" removed from review.", card.word)
            });
        }
        Err(e) => {
            error!("Failed to update review status for card {}: {e}", card.id);
            session.set_notice("Failed to update review status.");
        }
    }
    Ok(Redirect::to("/practice"))
}

pub async fn shuffle_deck(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let handle = session_handle(&state, &headers, &config)?;
    let mut session = handle.lock().await;
    if session.deck_len() > 1 {
        session.reshuffle();
        let deck_len = session.deck_len();
        session.set_notice(format!(
            "Shuffled {deck_len} cards for varied practice."
        ));
    }
    Ok(Redirect::to("/practice"))
}

#[derive(Deserialize)]
pub struct DeckSearchForm {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub filter: CardFilter,
}

pub async fn update_search(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
    Form(form): Form<DeckSearchForm>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = session_handle(&state, &headers, &config)?;
    handle.lock().await.set_search(form.q, form.filter);
    Ok(Redirect::to("/practice"))
}

pub async fn end_practice(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(sid) = session_id(&headers, &config) {
        state.sessions.remove(&sid);
        // Dropping the live-search pipeline cancels any pending timer
        state.searches.remove(&sid);
    }
    Ok(Redirect::to("/"))
}
