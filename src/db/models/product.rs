//! Tracked product model and the dashboard's mutations against it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::DbPool;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackedProduct {
    pub id: i64,
    pub user_id: i64,
    pub asin: String,
    pub name: String,
    pub url: String,
    pub current_price: Option<f64>,
    pub target_price: Option<f64>,
    /// Soft-delete flag. The bot only watches active products.
    pub is_active: bool,
    pub created_at: String,
}

impl TrackedProduct {
    /// Active products for a user, newest first. An unknown user simply
    /// has no products.
    pub async fn list_active_for_user(
        pool: &DbPool,
        user_id: i64,
    ) -> sqlx::Result<Vec<TrackedProduct>> {
        sqlx::query_as(
            "SELECT * FROM tracked_products \
             WHERE user_id = ? AND is_active = 1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// A product is only visible to the dashboard while it is active.
    pub async fn find_active(pool: &DbPool, id: i64) -> sqlx::Result<Option<TrackedProduct>> {
        sqlx::query_as("SELECT * FROM tracked_products WHERE id = ? AND is_active = 1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Flip is_active off. Idempotent; price history is kept.
    pub async fn soft_delete(pool: &DbPool, id: i64) -> sqlx::Result<()> {
        sqlx::query("UPDATE tracked_products SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn update_target_price(pool: &DbPool, id: i64, target: f64) -> sqlx::Result<()> {
        sqlx::query("UPDATE tracked_products SET target_price = ? WHERE id = ?")
            .bind(target)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Total active products across all users, for the landing-page counter.
    pub async fn count_active(pool: &DbPool) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tracked_products WHERE is_active = 1")
            .fetch_one(pool)
            .await
    }

    /// CSS class for the price badge: at or under target is a deal, within
    /// 10% over target is close, anything else is high.
    pub fn price_status(&self) -> &'static str {
        match (self.current_price, self.target_price) {
            (Some(current), Some(target)) => {
                if current <= target {
                    "deal"
                } else if current <= target * 1.1 {
                    "close"
                } else {
                    "high"
                }
            }
            _ => "neutral",
        }
    }

    /// How far the current price sits above target, when both are known.
    pub fn savings(&self) -> Option<f64> {
        match (self.current_price, self.target_price) {
            (Some(current), Some(target)) => Some(current - target),
            _ => None,
        }
    }
}
