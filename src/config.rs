//! Application configuration structure
use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use axum_extra::extract::cookie::Key;
use secrecy::SecretString;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub bind_addr: String,
    /// Shared secret guarding the first-run seeding endpoint.
    pub seed_token: SecretString,
    pub cookie_secret: Key,
    /// Quiet period for the live-search debouncer.
    pub search_debounce: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .context("DATABASE_URL not set")?
            .into();
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let seed_token = env::var("SEED_TOKEN").context("SEED_TOKEN not set")?.into();
        let debounce_ms = match env::var("SEARCH_DEBOUNCE_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("SEARCH_DEBOUNCE_MS is not a number")?,
            Err(_) => 300,
        };

        Ok(Self {
            database_url,
            bind_addr,
            seed_token,
            cookie_secret: Key::generate(),
            search_debounce: Duration::from_millis(debounce_ms),
        })
    }
}
