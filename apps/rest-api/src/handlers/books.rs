//! Public catalog handlers. No authentication: anyone may browse.

use axum::extract::{Path, State};
use axum::Json;

use kitab_core::Book;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/books
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.db.books().list_all().await?;
    Ok(Json(books))
}

/// GET /api/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state
        .db
        .books()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book", &id))?;

    Ok(Json(book))
}
