//! # Order Repository
//!
//! Order placement and status lifecycle.
//!
//! ## Placement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    place_order(user, lines)                             │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── for each line: SELECT book  ──► missing → BookNotFound          │
//! │    │        │                                                           │
//! │    │        ├── stock < qty        ──► InsufficientStock               │
//! │    │        └── echoed price drift ──► PriceMismatch                   │
//! │    │                                                                    │
//! │    ├── total = Σ catalog_price × qty   (exact cents)                   │
//! │    ├── INSERT order (status 'pending')                                 │
//! │    ├── INSERT order_items (one per line, price frozen)                 │
//! │    └── UPDATE books SET stock = stock - qty   (guarded)                │
//! │    │                                                                    │
//! │  COMMIT ── any error above rolls back EVERYTHING: no orphaned          │
//! │            orders, no partial stock decrements                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status changes go through the [`OrderStatus`] transition graph; a
//! rejected transition leaves the row untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kitab_core::checkout::{self, CheckoutLine};
use kitab_core::{CoreError, Order, OrderStatus};

// =============================================================================
// View Types
// =============================================================================

/// One order line joined with book display fields.
///
/// Book columns are optional: the book may have been deleted from the
/// catalog after purchase, and the frozen line must still render.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub book_id: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub book_title: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

/// An order with its line items, as returned to buyers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLineView>,
}

/// An order with buyer attribution, as returned to admins.
///
/// User columns are optional: orders survive account deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub items: Vec<OrderLineView>,
}

/// Internal row shape for the admin listing join.
#[derive(Debug, sqlx::FromRow)]
struct AdminOrderRow {
    id: String,
    user_id: String,
    total_price_cents: i64,
    status: OrderStatus,
    created_at: chrono::DateTime<Utc>,
    user_name: Option<String>,
    user_email: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order: one atomic transaction covering pricing, the order
    /// row, its items, and stock decrements.
    ///
    /// ## Arguments
    /// * `user_id` - The buyer placing the order
    /// * `lines` - Requested lines; prices are re-derived from the catalog
    ///
    /// ## Returns
    /// The created order (status `pending`).
    ///
    /// ## Errors
    /// * Validation error for an empty line list (before any write)
    /// * `BookNotFound` / `InsufficientStock` / `PriceMismatch` roll the
    ///   whole transaction back
    pub async fn place_order(&self, user_id: &str, lines: &[CheckoutLine]) -> DbResult<Order> {
        checkout::validate_checkout(lines)?;

        let mut tx = self.pool.begin().await?;

        // Resolve every line against the catalog inside the transaction so
        // prices and stock cannot drift under us.
        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let book = sqlx::query_as::<_, kitab_core::Book>(
                r#"
                SELECT
                    id, title, author, description, category,
                    price_cents, stock, image_url, created_at, updated_at
                FROM books
                WHERE id = ?1
                "#,
            )
            .bind(&line.book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::BookNotFound(line.book_id.clone()))?;

            priced.push(checkout::price_line(&book, line)?);
        }

        let total = checkout::order_total(&priced);
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            total_price_cents: total.cents(),
            status: OrderStatus::Pending,
            created_at: now,
        };

        debug!(order_id = %order.id, total = %total, lines = priced.len(), "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_price_cents, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total_price_cents)
        .bind(order.status)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &priced {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, book_id, quantity, price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order.id)
            .bind(&line.book_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: rows_affected = 0 means stock moved since
            // our read, so the whole order rolls back.
            let result = sqlx::query(
                r#"
                UPDATE books
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND stock >= ?2
                "#,
            )
            .bind(&line.book_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(CoreError::InsufficientStock {
                    book_id: line.book_id.clone(),
                    available: 0,
                    requested: line.quantity,
                }
                .into());
            }
        }

        tx.commit().await?;

        info!(order_id = %order.id, user_id = %user_id, total = %total, "Order placed");

        Ok(order)
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_price_cents, status, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all items for an order, joined with book display fields.
    pub async fn items_for_order(&self, order_id: &str) -> DbResult<Vec<OrderLineView>> {
        let items = sqlx::query_as::<_, OrderLineView>(
            r#"
            SELECT
                oi.book_id,
                oi.quantity,
                oi.price_cents,
                b.title AS book_title,
                b.author,
                b.image_url
            FROM order_items oi
            LEFT JOIN books b ON b.id = oi.book_id
            WHERE oi.order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a user's orders, newest first, each with its items.
    ///
    /// No pagination; the full result set is returned.
    pub async fn orders_for_user(&self, user_id: &str) -> DbResult<Vec<OrderWithItems>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_price_cents, status, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_for_order(&order.id).await?;
            result.push(OrderWithItems { order, items });
        }

        Ok(result)
    }

    /// Gets a user's most recent order with its items, if any.
    pub async fn latest_for_user(&self, user_id: &str) -> DbResult<Option<OrderWithItems>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_price_cents, status, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match order {
            Some(order) => {
                let items = self.items_for_order(&order.id).await?;
                Ok(Some(OrderWithItems { order, items }))
            }
            None => Ok(None),
        }
    }

    /// Gets all orders with buyer attribution, newest first (admin view).
    pub async fn all_orders(&self) -> DbResult<Vec<AdminOrder>> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            r#"
            SELECT
                o.id,
                o.user_id,
                o.total_price_cents,
                o.status,
                o.created_at,
                u.name AS user_name,
                u.email AS user_email
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for_order(&row.id).await?;
            result.push(AdminOrder {
                order: Order {
                    id: row.id,
                    user_id: row.user_id,
                    total_price_cents: row.total_price_cents,
                    status: row.status,
                    created_at: row.created_at,
                },
                user_name: row.user_name,
                user_email: row.user_email,
                items,
            });
        }

        Ok(result)
    }

    /// Moves an order to a new lifecycle status.
    ///
    /// ## Errors
    /// * NotFound for an unknown order id
    /// * `InvalidStatusTransition` when the transition graph forbids the
    ///   move; the row is left untouched
    pub async fn update_status(&self, order_id: &str, new_status: OrderStatus) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_price_cents, status, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order_id))?;

        if !order.status.can_transition_to(new_status) {
            return Err(CoreError::InvalidStatusTransition {
                order_id: order_id.to_string(),
                from: order.status,
                to: new_status,
            }
            .into());
        }

        sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(order_id)
            .bind(new_status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(order_id = %order_id, from = %order.status, to = %new_status, "Order status updated");

        Ok(Order {
            status: new_status,
            ..order
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::book::NewBook;
    use std::collections::BTreeSet;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_book(db: &Database, title: &str, price_cents: i64, stock: i64) -> String {
        db.books()
            .create(NewBook {
                title: title.to_string(),
                author: "Author".to_string(),
                description: None,
                category: None,
                price_cents,
                stock,
                image_url: None,
            })
            .await
            .unwrap()
            .id
    }

    fn line(book_id: &str, quantity: i64) -> CheckoutLine {
        CheckoutLine {
            book_id: book_id.to_string(),
            quantity,
            price_cents: None,
        }
    }

    #[tokio::test]
    async fn test_place_order_computes_exact_total() {
        let db = test_db().await;
        // $10.00 × 2 + $5.50 × 1 = $25.50
        let b1 = seed_book(&db, "Ten Dollars", 1000, 10).await;
        let b2 = seed_book(&db, "Five Fifty", 550, 10).await;

        let order = db
            .orders()
            .place_order("buyer-1", &[line(&b1, 2), line(&b2, 1)])
            .await
            .unwrap();

        assert_eq!(order.total_price_cents, 2550);
        assert_eq!(order.status, OrderStatus::Pending);

        let items = db.orders().items_for_order(&order.id).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_place_order_empty_fails_before_writes() {
        let db = test_db().await;

        let err = db.orders().place_order("buyer-1", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Business(CoreError::Validation(_))
        ));

        assert!(db.orders().orders_for_user("buyer-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_decrements_stock() {
        let db = test_db().await;
        let b1 = seed_book(&db, "Stocked", 1000, 10).await;

        db.orders()
            .place_order("buyer-1", &[line(&b1, 3)])
            .await
            .unwrap();

        let book = db.books().get_by_id(&b1).await.unwrap().unwrap();
        assert_eq!(book.stock, 7);
    }

    #[tokio::test]
    async fn test_place_order_insufficient_stock_rolls_back() {
        let db = test_db().await;
        let b1 = seed_book(&db, "Plenty", 1000, 10).await;
        let b2 = seed_book(&db, "Scarce", 500, 1).await;

        let err = db
            .orders()
            .place_order("buyer-1", &[line(&b1, 2), line(&b2, 5)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Business(CoreError::InsufficientStock { .. })
        ));

        // Nothing persisted: no order, and the first book's stock untouched
        assert!(db.orders().orders_for_user("buyer-1").await.unwrap().is_empty());
        let book = db.books().get_by_id(&b1).await.unwrap().unwrap();
        assert_eq!(book.stock, 10);
    }

    #[tokio::test]
    async fn test_place_order_rejects_price_drift() {
        let db = test_db().await;
        let b1 = seed_book(&db, "Repriced", 1000, 10).await;

        let mut stale = line(&b1, 1);
        stale.price_cents = Some(800); // client displayed an old price

        let err = db
            .orders()
            .place_order("buyer-1", &[stale])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Business(CoreError::PriceMismatch { .. })
        ));
        assert!(db.orders().orders_for_user("buyer-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_unknown_book() {
        let db = test_db().await;

        let err = db
            .orders()
            .place_order("buyer-1", &[line("ghost-book", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Business(CoreError::BookNotFound(_))));
    }

    #[tokio::test]
    async fn test_round_trip_multiset_matches_input() {
        let db = test_db().await;
        let b1 = seed_book(&db, "One", 1000, 10).await;
        let b2 = seed_book(&db, "Two", 550, 10).await;

        db.orders()
            .place_order("buyer-1", &[line(&b1, 2), line(&b2, 1)])
            .await
            .unwrap();

        let orders = db.orders().orders_for_user("buyer-1").await.unwrap();
        assert_eq!(orders.len(), 1);

        let got: BTreeSet<(String, i64, i64)> = orders[0]
            .items
            .iter()
            .map(|i| (i.book_id.clone(), i.quantity, i.price_cents))
            .collect();
        let expected: BTreeSet<(String, i64, i64)> =
            [(b1.clone(), 2, 1000), (b2.clone(), 1, 550)].into_iter().collect();
        assert_eq!(got, expected);

        // Display fields joined from the catalog
        assert!(orders[0]
            .items
            .iter()
            .all(|i| i.book_title.is_some() && i.author.is_some()));
    }

    #[tokio::test]
    async fn test_orders_for_user_newest_first() {
        let db = test_db().await;
        let b1 = seed_book(&db, "One", 1000, 10).await;
        let orders = db.orders();

        orders.place_order("buyer-1", &[line(&b1, 1)]).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = orders.place_order("buyer-1", &[line(&b1, 2)]).await.unwrap();

        let listed = orders.orders_for_user("buyer-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].order.id, second.id);

        let latest = orders.latest_for_user("buyer-1").await.unwrap().unwrap();
        assert_eq!(latest.order.id, second.id);
    }

    #[tokio::test]
    async fn test_latest_for_user_empty() {
        let db = test_db().await;
        assert!(db
            .orders()
            .latest_for_user("nobody")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_status_happy_path() {
        let db = test_db().await;
        let b1 = seed_book(&db, "One", 1000, 10).await;
        let order = db
            .orders()
            .place_order("buyer-1", &[line(&b1, 1)])
            .await
            .unwrap();

        let confirmed = db
            .orders()
            .update_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        let shipped = db
            .orders()
            .update_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);

        // Persisted, not just echoed
        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_is_not_found() {
        let db = test_db().await;
        let err = db
            .orders()
            .update_status("ghost-order", OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_status_rejects_bad_transition_and_mutates_nothing() {
        let db = test_db().await;
        let b1 = seed_book(&db, "One", 1000, 10).await;
        let order = db
            .orders()
            .place_order("buyer-1", &[line(&b1, 1)])
            .await
            .unwrap();

        // pending → shipped skips confirmation
        let err = db
            .orders()
            .update_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Business(CoreError::InvalidStatusTransition { .. })
        ));

        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_terminal_states_are_final() {
        let db = test_db().await;
        let b1 = seed_book(&db, "One", 1000, 10).await;
        let orders = db.orders();
        let order = orders.place_order("buyer-1", &[line(&b1, 1)]).await.unwrap();

        orders
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let err = orders
            .update_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Business(CoreError::InvalidStatusTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_all_orders_includes_user_info() {
        let db = test_db().await;
        let b1 = seed_book(&db, "One", 1000, 10).await;

        // Register a real user so the join resolves
        let user = kitab_core::User {
            id: "buyer-known".to_string(),
            name: "Known Buyer".to_string(),
            email: "known@example.com".to_string(),
            password_hash: "x".to_string(),
            role: kitab_core::Role::Buyer,
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();

        db.orders()
            .place_order("buyer-known", &[line(&b1, 1)])
            .await
            .unwrap();
        // An order whose buyer no longer exists still lists
        db.orders()
            .place_order("buyer-ghost", &[line(&b1, 1)])
            .await
            .unwrap();

        let all = db.orders().all_orders().await.unwrap();
        assert_eq!(all.len(), 2);

        let known = all
            .iter()
            .find(|o| o.order.user_id == "buyer-known")
            .unwrap();
        assert_eq!(known.user_name.as_deref(), Some("Known Buyer"));

        let ghost = all
            .iter()
            .find(|o| o.order.user_id == "buyer-ghost")
            .unwrap();
        assert!(ghost.user_name.is_none());
    }
}
