//! # Book Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Public listing (newest first) and lookup
//! - Admin CRUD
//!
//! Stock is mutated only by the order transaction in
//! [`crate::repository::order`], never here; admin edits replace the whole
//! row including stock.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kitab_core::Book;

/// Fields accepted when creating or replacing a book.
///
/// The id and timestamps are owned by the repository; everything else is
/// caller-supplied (validated upstream in kitab-core).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub image_url: Option<String>,
}

/// Repository for book database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists all books, newest first.
    ///
    /// No pagination: the catalog is small and the storefront renders it
    /// in full.
    pub async fn list_all(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                id, title, author, description, category,
                price_cents, stock, image_url, created_at, updated_at
            FROM books
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Gets a book by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - Book not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                id, title, author, description, category,
                price_cents, stock, image_url, created_at, updated_at
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Creates a new book with a generated id.
    pub async fn create(&self, new: NewBook) -> DbResult<Book> {
        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            author: new.author,
            description: new.description,
            category: new.category,
            price_cents: new.price_cents,
            stock: new.stock,
            image_url: new.image_url,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %book.id, title = %book.title, "Inserting book");

        sqlx::query(
            r#"
            INSERT INTO books (
                id, title, author, description, category,
                price_cents, stock, image_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.category)
        .bind(book.price_cents)
        .bind(book.stock)
        .bind(&book.image_url)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(book)
    }

    /// Replaces all editable fields of a book.
    ///
    /// ## Returns
    /// The updated book, or NotFound if the id does not exist.
    pub async fn update(&self, id: &str, changes: NewBook) -> DbResult<Book> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = ?2,
                author = ?3,
                description = ?4,
                category = ?5,
                price_cents = ?6,
                stock = ?7,
                image_url = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.author)
        .bind(&changes.description)
        .bind(&changes.category)
        .bind(changes.price_cents)
        .bind(changes.stock)
        .bind(&changes.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        // Re-read so the caller sees the stored row (including created_at)
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Book", id))
    }

    /// Deletes a book. Idempotent: deleting a missing id is not an error.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting book");

        sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
