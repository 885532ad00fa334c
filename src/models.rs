use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty tiers a card can belong to. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn title(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            Level::Beginner => "Basic signs and everyday words",
            Level::Intermediate => "Common phrases and expressions",
            Level::Advanced => "Complex conversations and idioms",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "beginner"),
            Level::Intermediate => write!(f, "intermediate"),
            Level::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// A card row as stored in the hosted record store. `id` is immutable once
/// created; everything else is mutable via explicit update operations.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Card {
    pub id: i32,
    pub word: String,
    pub image_url: String,
    pub description: String,
    /// Serialized example sentences, kept as stored; decode via [`Examples`].
    pub examples: Option<String>,
    pub level: Level,
    pub is_favorite: bool,
    pub needs_review: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

impl Card {
    /// Decoded example sentences in source order; empty when the blob is
    /// missing or empty.
    pub fn examples_list(&self) -> Vec<String> {
        Examples::decode(self.examples.as_deref()).into_list()
    }
}

/// Decoded form of the `examples` blob. Malformed data degrades to the raw
/// text wrapped as a single example instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Examples {
    List(Vec<String>),
    Fallback(String),
}

impl Examples {
    pub fn decode(raw: Option<&str>) -> Examples {
        let Some(raw) = raw else {
            return Examples::List(Vec::new());
        };
        if raw.trim().is_empty() {
            return Examples::List(Vec::new());
        }
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => {
                Examples::List(items.into_iter().map(value_to_text).collect())
            }
            // Valid JSON but not an array: wrap the single value
            Ok(other) => Examples::List(vec![value_to_text(other)]),
            Err(_) => Examples::Fallback(raw.to_string()),
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            Examples::List(items) => items,
            Examples::Fallback(raw) => vec![raw],
        }
    }
}

fn value_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Payload for inserting a new card; used by the first-run seeding helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardNew {
    pub word: String,
    pub level: Level,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl CardNew {
    /// Examples serialized the way the store expects them.
    pub fn examples_blob(&self) -> String {
        serde_json::to_string(&self.examples).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_json_array() {
        let decoded = Examples::decode(Some(r#"["Hello there", "Hello again"]"#));
        assert_eq!(
            decoded,
            Examples::List(vec!["Hello there".to_string(), "Hello again".to_string()])
        );
    }

    #[test]
    fn wraps_scalar_json() {
        assert_eq!(Examples::decode(Some("42")).into_list(), vec!["42".to_string()]);
        assert_eq!(
            Examples::decode(Some(r#""just one""#)).into_list(),
            vec!["just one".to_string()]
        );
    }

    #[test]
    fn malformed_blob_falls_back_to_raw_text() {
        let decoded = Examples::decode(Some("Wave your hand, palm out"));
        assert_eq!(
            decoded,
            Examples::Fallback("Wave your hand, palm out".to_string())
        );
        assert_eq!(decoded.into_list(), vec!["Wave your hand, palm out".to_string()]);
    }

    #[test]
    fn missing_or_empty_blob_is_empty() {
        assert_eq!(Examples::decode(None).into_list(), Vec::<String>::new());
        assert_eq!(Examples::decode(Some("  ")).into_list(), Vec::<String>::new());
    }

    #[test]
    fn level_round_trips_through_strings() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        assert!("expert".parse::<Level>().is_err());
    }
}
