//! First-run seeding of the built-in sample card set.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::models::CardNew;
use crate::store::CardStore;

const SAMPLE_CARDS_JSON: &str = include_str!("../seed/cards.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded(usize),
}

pub fn parse_cards(raw: &str) -> Result<Vec<CardNew>> {
    serde_json::from_str(raw).context("Invalid seed card JSON")
}

pub fn sample_cards() -> Result<Vec<CardNew>> {
    parse_cards(SAMPLE_CARDS_JSON)
}

/// Bulk-loads the sample set, but only into an empty store.
pub async fn seed_if_empty(store: &CardStore) -> Result<SeedOutcome> {
    let existing = store.count().await?;
    if existing > 0 {
        info!("Store already holds {existing} cards, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }
    let cards = sample_cards()?;
    store.insert_many(&cards).await?;
    info!("🌱 Seeded {} sample cards", cards.len());
    Ok(SeedOutcome::Seeded(cards.len()))
}

/// Constant-time check of the presented seeding token against the configured
/// secret. Both sides are hashed first so the comparison length is fixed.
pub fn verify_seed_token(presented: &str, expected: &SecretString) -> bool {
    let presented = hex::encode(Sha256::digest(presented.as_bytes()));
    let expected = hex::encode(Sha256::digest(expected.expose_secret().as_bytes()));
    use subtle::ConstantTimeEq;
    presented.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() == 1
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::Level;

    #[test]
    fn sample_set_parses() {
        let cards = sample_cards().expect("bundled seed data is valid");
        assert_eq!(cards.len(), 18);

        let hello = &cards[0];
        assert_eq!(hello.word, "Hello");
        assert_eq!(hello.level, Level::Beginner);
        assert_eq!(hello.examples.len(), 2);
        assert_eq!(hello.examples_blob(), serde_json::to_string(&hello.examples).unwrap());

        assert!(cards.iter().any(|c| c.level == Level::Intermediate));
        assert!(cards.iter().any(|c| c.level == Level::Advanced));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(parse_cards("not json").is_err());
        assert!(parse_cards(r#"[{"word": "x"}]"#).is_err());
    }

    #[test]
    fn seed_token_check() {
        let expected = SecretString::from("super-secret");
        assert!(verify_seed_token("super-secret", &expected));
        assert!(!verify_seed_token("super-secret ", &expected));
        assert!(!verify_seed_token("", &expected));
    }
}
