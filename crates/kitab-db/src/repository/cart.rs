//! # Cart Repository
//!
//! Database operations for buyer carts.
//!
//! ## The Upsert Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              At most one row per (user, book), always                   │
//! │                                                                         │
//! │  add(user, book, 2)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ... ON CONFLICT(user_id, book_id)                              │
//! │          DO UPDATE SET quantity = quantity + excluded.quantity         │
//! │       │                                                                 │
//! │       ├── no row yet  → new row, quantity 2                            │
//! │       └── row exists  → same row, quantity += 2                        │
//! │                                                                         │
//! │  One statement, guarded by the UNIQUE index. Two concurrent adds       │
//! │  for the same pair cannot interleave a check with an insert.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kitab_core::CartItem;

/// A cart row joined with the book fields the storefront displays.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Cart item id (used for removal).
    pub id: String,
    pub book_id: String,
    pub quantity: i64,
    pub title: String,
    pub author: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Gets a user's cart joined with book display fields.
    ///
    /// Returns an empty list for an empty cart; never errors on empty.
    pub async fn items_for_user(&self, user_id: &str) -> DbResult<Vec<CartEntry>> {
        let entries = sqlx::query_as::<_, CartEntry>(
            r#"
            SELECT
                ci.id,
                ci.book_id,
                ci.quantity,
                b.title,
                b.author,
                b.price_cents,
                b.image_url
            FROM cart_items ci
            JOIN books b ON b.id = ci.book_id
            WHERE ci.user_id = ?1
            ORDER BY ci.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Adds a book to the cart, or increments the quantity if it is
    /// already there.
    ///
    /// ## Atomicity
    /// A single `INSERT ... ON CONFLICT DO UPDATE` statement backed by the
    /// UNIQUE (user_id, book_id) index. There is no separate check step to
    /// race against.
    ///
    /// ## Returns
    /// The resulting row (with the summed quantity on repeat adds).
    pub async fn add_item(&self, user_id: &str, book_id: &str, quantity: i64) -> DbResult<CartItem> {
        debug!(user_id = %user_id, book_id = %book_id, quantity = %quantity, "Cart upsert");

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (id, user_id, book_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (user_id, book_id)
            DO UPDATE SET quantity = quantity + excluded.quantity
            RETURNING id, user_id, book_id, quantity, created_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(book_id)
        .bind(quantity)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Removes a cart item by id, scoped to its owner.
    ///
    /// Idempotent: unknown ids (or ids belonging to someone else) are not
    /// an error and change nothing.
    pub async fn remove_item(&self, user_id: &str, cart_item_id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, cart_item_id = %cart_item_id, "Removing cart item");

        sqlx::query("DELETE FROM cart_items WHERE id = ?1 AND user_id = ?2")
            .bind(cart_item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes all cart rows for a user.
    ///
    /// ## When To Call
    /// After a successful checkout (the order handler does this), or from
    /// an explicit clear-cart action.
    pub async fn clear_for_user(&self, user_id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, "Clearing cart");

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Counts distinct cart rows for a user (for the cart-size cap).
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
