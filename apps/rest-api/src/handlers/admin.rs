//! Admin handlers: book/user/order management.
//!
//! Every handler takes the [`AdminUser`] extractor, so a buyer token is
//! rejected with 403 before any of this code runs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use kitab_core::validation::{
    validate_author, validate_email, validate_price_cents, validate_stock, validate_title,
    validate_user_name,
};
use kitab_core::{Book, OrderStatus, Role, User};
use kitab_db::{AdminOrder, NewBook};

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Books
// =============================================================================

fn validate_book_payload(book: &NewBook) -> Result<(), ApiError> {
    validate_title(&book.title)?;
    validate_author(&book.author)?;
    validate_price_cents(book.price_cents)?;
    validate_stock(book.stock)?;
    Ok(())
}

/// GET /api/admin/books
pub async fn list_books(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.db.books().list_all().await?;
    Ok(Json(books))
}

/// POST /api/admin/books
pub async fn create_book(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    validate_book_payload(&req)?;

    let book = state.db.books().create(req).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/admin/books/{id}
pub async fn update_book(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<NewBook>,
) -> Result<Json<Book>, ApiError> {
    validate_book_payload(&req)?;

    let book = state.db.books().update(&id, req).await?;
    Ok(Json(book))
}

/// DELETE /api/admin/books/{id}
pub async fn delete_book(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.db.books().delete(&id).await?;
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInfoRequest {
    pub name: String,
    pub email: String,
}

/// GET /api/admin/users
///
/// Lists buyer accounts only; the view manages customers, not operators.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.db.users().list_buyers().await?;
    Ok(Json(users))
}

/// PATCH /api/admin/users/{id} - change role
pub async fn update_user_role(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.db.users().update_role(&id, req.role).await?;
    Ok(Json(user))
}

/// PUT /api/admin/users/{id} - edit name and email
pub async fn update_user_info(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserInfoRequest>,
) -> Result<Json<User>, ApiError> {
    validate_user_name(&req.name)?;
    validate_email(&req.email)?;

    let user = state
        .db
        .users()
        .update_info(&id, req.name.trim(), req.email.trim())
        .await?;
    Ok(Json(user))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.db.users().delete(&id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<AdminOrder>>, ApiError> {
    let orders = state.db.orders().all_orders().await?;
    Ok(Json(orders))
}

/// PATCH /api/admin/orders/{id} - advance the lifecycle status
///
/// Unknown status strings are a 400; known statuses that the transition
/// graph forbids are a 422.
pub async fn update_order_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|_| {
            ApiError::validation(
                "status must be one of: pending, confirmed, shipped, delivered, cancelled",
            )
        })?;

    let order = state.db.orders().update_status(&id, status).await?;

    Ok(Json(json!({
        "message": "Order status updated successfully",
        "order": order,
    })))
}
