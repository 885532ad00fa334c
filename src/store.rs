//! Client of the hosted record store that owns durable card data. Every SQL
//! statement in the crate lives here; callers treat this as the external
//! collaborator boundary.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::models::{Card, CardNew, Level};

#[derive(Clone)]
pub struct CardStore {
    db: Arc<PgPool>,
}

impl CardStore {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }

    /// Query-all-by-level, in stable id order; the caller shuffles.
    pub async fn fetch_level(&self, level: Level) -> Result<Vec<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>("SELECT * FROM flashcard WHERE level = $1 ORDER BY id")
            .bind(level)
            .fetch_all(&*self.db)
            .await
    }

    /// Full collection, used by the stats aggregator.
    pub async fn fetch_all(&self) -> Result<Vec<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>("SELECT * FROM flashcard ORDER BY id")
            .fetch_all(&*self.db)
            .await
    }

    pub async fn fetch_card(&self, id: i32) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>("SELECT * FROM flashcard WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await
    }

    /// Substring match on word or description, delegated to the store; used
    /// by the live-search path only.
    pub async fn search(&self, needle: &str) -> Result<Vec<Card>, sqlx::Error> {
        let pattern = format!("%{needle}%");
        sqlx::query_as::<_, Card>(
            "SELECT * FROM flashcard WHERE word ILIKE $1 OR description ILIKE $1 ORDER BY word, id",
        )
        .bind(pattern)
        .fetch_all(&*self.db)
        .await
    }

    pub async fn set_favorite(&self, id: i32, value: bool) -> Result<(), sqlx::Error> {
        debug!("💾 set_favorite id={} value={}", id, value);
        let result = sqlx::query("UPDATE flashcard SET is_favorite = $1 WHERE id = $2")
            .bind(value)
            .bind(id)
            .execute(&*self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    pub async fn set_needs_review(&self, id: i32, value: bool) -> Result<(), sqlx::Error> {
        debug!("💾 set_needs_review id={} value={}", id, value);
        let result = sqlx::query("UPDATE flashcard SET needs_review = $1 WHERE id = $2")
            .bind(value)
            .bind(id)
            .execute(&*self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    /// Persist a rating: a known card no longer needs review, and either way
    /// the card was just seen.
    pub async fn record_rating(
        &self,
        id: i32,
        known: bool,
        seen_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        debug!("💾 record_rating id={} known={}", id, known);
        let result = sqlx::query("UPDATE flashcard SET needs_review = $1, last_seen = $2 WHERE id = $3")
            .bind(!known)
            .bind(seen_at)
            .bind(id)
            .execute(&*self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    /// Bulk insert in one transaction; used by the first-run seeding helper.
    pub async fn insert_many(&self, cards: &[CardNew]) -> Result<(), sqlx::Error> {
        if cards.is_empty() {
            return Ok(());
        }
        let mut tx = self.db.begin().await?;
        for card in cards {
            sqlx::query(
                "INSERT INTO flashcard (word, image_url, description, examples, level) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&card.word)
            .bind(&card.image_url)
            .bind(&card.description)
            .bind(card.examples_blob())
            .bind(card.level)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM flashcard")
            .fetch_one(&*self.db)
            .await
    }
}
