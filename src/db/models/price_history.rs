//! Price history rows, inserted by the bot on every price check.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::DbPool;

/// How many points the detail chart plots.
pub const CHART_POINT_LIMIT: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricePoint {
    pub price: f64,
    pub recorded_at: String,
}

impl PricePoint {
    /// History for one product in recording order, capped for charting.
    pub async fn for_product(pool: &DbPool, product_id: i64) -> sqlx::Result<Vec<PricePoint>> {
        sqlx::query_as(
            "SELECT price, recorded_at FROM price_history \
             WHERE product_id = ? \
             ORDER BY recorded_at ASC \
             LIMIT ?",
        )
        .bind(product_id)
        .bind(CHART_POINT_LIMIT)
        .fetch_all(pool)
        .await
    }
}
