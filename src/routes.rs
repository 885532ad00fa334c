use std::sync::Arc;

pub(crate) mod practice;
pub(crate) mod search;

use askama::Template;
use axum::{
    Extension, Form, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{SignedCookieJar, cookie};
use rand::Rng;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    config::AppConfig,
    errors::ApiError,
    router::AppState,
    seed::{self, SeedOutcome},
    stats,
    templates::{DashboardTemplate, IndexTemplate},
};

pub(crate) const SESSION_COOKIE: &str = "practice_session";

pub(crate) fn handle_render(res: askama::Result<String>) -> Result<Html<String>, ApiError> {
    match res {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            error!("Template rendering failed: {}", e);
            Err(ApiError::TemplateError(e))
        }
    }
}

/// Reads the browser session id from the signed cookie, minting a fresh one
/// (and adding the cookie to the jar) when absent.
pub(crate) fn ensure_session(headers: &HeaderMap, config: &AppConfig) -> (SignedCookieJar, String) {
    let jar = SignedCookieJar::from_headers(headers, config.cookie_secret.clone());
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let sid = cookie.value().to_string();
        (jar, sid)
    } else {
        let sid = format!("{:032x}", rand::rng().random::<u128>());
        let jar = jar.add(
            cookie::Cookie::build((SESSION_COOKIE, sid.clone()))
                .path("/")
                .http_only(true)
                .secure(true)
                .max_age(time::Duration::days(30))
                .same_site(cookie::SameSite::Strict)
                .build(),
        );
        (jar, sid)
    }
}

pub(crate) fn session_id(headers: &HeaderMap, config: &AppConfig) -> Option<String> {
    let jar = SignedCookieJar::from_headers(headers, config.cookie_secret.clone());
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let (stats, notice) = match state.store.fetch_all().await {
        Ok(cards) => (stats::aggregate(&cards), None),
        Err(e) => {
            error!("Failed to load cards for the welcome page: {e}");
            (
                stats::aggregate(&[]),
                Some("Failed to load flashcards from the database.".to_string()),
            )
        }
    };
    let show_seed_prompt = notice.is_none() && stats.is_empty();
    let template = IndexTemplate {
        stats,
        show_seed_prompt,
        notice,
    };
    handle_render(template.render())
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let cards = state.store.fetch_all().await?;
    let template = DashboardTemplate {
        stats: stats::aggregate(&cards),
    };
    handle_render(template.render())
}

pub async fn styles() -> Result<impl IntoResponse, ApiError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/css")
        .body(include_str!("../templates/styles.css").to_owned())?;

    Ok(response)
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "activeSessions": state.sessions.len()
    }))
}

#[derive(Deserialize)]
pub struct SeedForm {
    pub token: String,
}

/// First-run bulk load of the sample card set, guarded by the seed token.
pub async fn seed_database(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    Form(form): Form<SeedForm>,
) -> Result<impl IntoResponse, ApiError> {
    if !seed::verify_seed_token(&form.token, &config.seed_token) {
        warn!("Seed request with an invalid token");
        return Err(ApiError::Unauthorized);
    }
    match seed::seed_if_empty(&state.store).await {
        Ok(SeedOutcome::Seeded(count)) => info!("✅ Seeded {count} cards"),
        Ok(SeedOutcome::AlreadySeeded) => info!("Seed skipped, store not empty"),
        // Non-fatal: the welcome page reports the still-empty store
        Err(e) => error!("Seeding failed: {e}"),
    }
    Ok(Redirect::to("/"))
}
