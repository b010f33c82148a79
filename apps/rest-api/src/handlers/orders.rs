//! Checkout and order-history handlers (buyer side).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use kitab_core::CheckoutLine;
use kitab_db::OrderWithItems;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Requested lines. Missing or empty fails validation before any write.
    #[serde(default)]
    pub cart_items: Vec<CheckoutLine>,
}

/// POST /api/orders
///
/// Places the order in one atomic transaction (pricing, order row, items,
/// stock), then clears the buyer's cart as a follow-up step.
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let order = state
        .db
        .orders()
        .place_order(&user.user_id, &req.cart_items)
        .await?;

    // The order is committed at this point. A failed cart clear must not
    // undo the sale; the stale cart rows are merely cosmetic.
    if let Err(e) = state.db.carts().clear_for_user(&user.user_id).await {
        warn!(user_id = %user.user_id, error = %e, "Cart clear after checkout failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "orderId": order.id,
        })),
    ))
}

/// GET /api/orders/user
pub async fn user_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<OrderWithItems>>, ApiError> {
    let orders = state.db.orders().orders_for_user(&user.user_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/latest
pub async fn latest_order(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<OrderWithItems>, ApiError> {
    let latest = state
        .db
        .orders()
        .latest_for_user(&user.user_id)
        .await?
        .ok_or_else(|| ApiError::new(crate::error::ErrorCode::NotFound, "No orders found"))?;

    Ok(Json(latest))
}
