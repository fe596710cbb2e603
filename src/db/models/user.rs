//! User model. Rows are created by the WhatsApp bot on first contact;
//! the dashboard never inserts or deletes users.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::DbPool;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub phone_number: String,
    pub created_at: String,
}

impl User {
    pub async fn find_by_phone(pool: &DbPool, phone: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE phone_number = ?")
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &DbPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total registered users, for the landing-page counter.
    pub async fn count(pool: &DbPool) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    async fn insert_user(pool: &DbPool, phone: &str) -> i64 {
        sqlx::query("INSERT INTO users (phone_number) VALUES (?)")
            .bind(phone)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn find_by_phone_returns_none_for_unknown_number() {
        let pool = memory_pool().await;
        insert_user(&pool, "+15550001111").await;

        let found = User::find_by_phone(&pool, "+15550001111").await.unwrap();
        assert_eq!(found.unwrap().phone_number, "+15550001111");

        let missing = User::find_by_phone(&pool, "+15559999999").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn phone_number_is_unique() {
        let pool = memory_pool().await;
        insert_user(&pool, "+15550001111").await;

        let dup = sqlx::query("INSERT INTO users (phone_number) VALUES (?)")
            .bind("+15550001111")
            .execute(&pool)
            .await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_products_and_history() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "+15550001111").await;

        let product_id = sqlx::query(
            "INSERT INTO tracked_products (user_id, asin, name, url) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind("B00EXAMPLE")
        .bind("Mechanical Keyboard")
        .bind("https://www.amazon.com/dp/B00EXAMPLE")
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        sqlx::query("INSERT INTO price_history (product_id, price) VALUES (?, ?)")
            .bind(product_id)
            .bind(79.99)
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&pool)
            .await
            .unwrap();

        let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracked_products")
            .fetch_one(&pool)
            .await
            .unwrap();
        let history: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM price_history")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(products, 0);
        assert_eq!(history, 0);
    }
}
