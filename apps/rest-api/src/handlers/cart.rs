//! Buyer cart handlers. All routes require a valid (any-role) token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use kitab_core::validation::{validate_cart_size, validate_quantity};
use kitab_core::CartItem;
use kitab_db::CartEntry;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub book_id: String,
    pub quantity: i64,
}

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CartEntry>>, ApiError> {
    let entries = state.db.carts().items_for_user(&user.user_id).await?;
    Ok(Json(entries))
}

/// POST /api/cart
///
/// Repeat adds for the same book increment the existing row's quantity.
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItem>), ApiError> {
    if req.book_id.trim().is_empty() {
        return Err(ApiError::validation("bookId is required"));
    }
    validate_quantity(req.quantity)?;

    let current = state.db.carts().count_for_user(&user.user_id).await?;
    validate_cart_size(current as usize)?;

    let item = state
        .db
        .carts()
        .add_item(&user.user_id, &req.book_id, req.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /api/cart/{id}
///
/// Idempotent, and scoped to the caller: one buyer cannot delete another
/// buyer's cart rows by guessing ids.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.db.carts().remove_item(&user.user_id, &id).await?;
    Ok(Json(json!({ "message": "Item removed from cart" })))
}
