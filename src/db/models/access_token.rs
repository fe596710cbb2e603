//! Magic-link access tokens.
//!
//! The raw token is stored, not a hash: the bot has to embed it verbatim in
//! a WhatsApp message, and a token is dead after one use anyway.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::DbPool;

/// Timestamp format that collates correctly against SQLite's
/// datetime('now') output.
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub created_at: String,
    pub expires_at: String,
    pub used_at: Option<String>,
}

/// 32 random bytes, hex-encoded: 64 chars.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

impl AccessToken {
    /// Mint a fresh token for a user, valid for `ttl_hours`.
    pub async fn create(pool: &DbPool, user_id: i64, ttl_hours: i64) -> sqlx::Result<String> {
        let token = generate_token();
        let expires_at = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours))
            .format(SQLITE_DATETIME)
            .to_string();

        sqlx::query("INSERT INTO access_tokens (user_id, token, expires_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&token)
            .bind(&expires_at)
            .execute(pool)
            .await?;

        Ok(token)
    }

    /// Validate and consume a token in one step.
    ///
    /// A token is live while it is unexpired and used_at is NULL; consuming
    /// sets used_at exactly once. The guarded UPDATE makes a concurrent
    /// second consumer lose even if both passed the SELECT.
    pub async fn consume(pool: &DbPool, token: &str) -> sqlx::Result<Option<AccessToken>> {
        let row: Option<AccessToken> = sqlx::query_as(
            "SELECT * FROM access_tokens \
             WHERE token = ? AND used_at IS NULL AND expires_at > datetime('now')",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let updated = sqlx::query(
            "UPDATE access_tokens SET used_at = datetime('now') \
             WHERE id = ? AND used_at IS NULL",
        )
        .bind(row.id)
        .execute(pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    async fn seed_user(pool: &DbPool) -> i64 {
        sqlx::query("INSERT INTO users (phone_number) VALUES (?)")
            .bind("+15550001111")
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[test]
    fn generated_tokens_are_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn a_token_can_only_be_consumed_once() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool).await;

        let token = AccessToken::create(&pool, user_id, 24).await.unwrap();

        let first = AccessToken::consume(&pool, &token).await.unwrap();
        assert_eq!(first.unwrap().user_id, user_id);

        let second = AccessToken::consume(&pool, &token).await.unwrap();
        assert!(second.is_none());

        // used_at survives the failed second attempt untouched
        let used_at: Option<String> =
            sqlx::query_scalar("SELECT used_at FROM access_tokens WHERE token = ?")
                .bind(&token)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(used_at.is_some());
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool).await;

        sqlx::query("INSERT INTO access_tokens (user_id, token, expires_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind("a".repeat(64))
            .bind("2020-01-01 00:00:00")
            .execute(&pool)
            .await
            .unwrap();

        let consumed = AccessToken::consume(&pool, &"a".repeat(64)).await.unwrap();
        assert!(consumed.is_none());
    }

    #[tokio::test]
    async fn unknown_tokens_are_rejected() {
        let pool = memory_pool().await;
        let consumed = AccessToken::consume(&pool, "deadbeef").await.unwrap();
        assert!(consumed.is_none());
    }
}
