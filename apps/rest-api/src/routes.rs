//! Route table for the REST API.
//!
//! ## Surface
//! ```text
//! Public:   GET  /               GET /health
//!           POST /api/auth/register   POST /api/auth/login
//!           GET  /api/books           GET  /api/books/{id}
//! Buyer:    GET/POST /api/cart        DELETE /api/cart/{id}
//!           POST /api/orders          GET /api/orders/user
//!           GET  /api/orders/latest
//! Admin:    /api/admin/books[/{id}]   /api/admin/users/{id}
//!           /api/admin/orders[/{id}]
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::handlers;
use crate::state::AppState;

/// Builds the application router with all routes attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        // Public catalog
        .route("/api/books", get(handlers::books::list_books))
        .route("/api/books/{id}", get(handlers::books::get_book))
        // Cart (buyer token)
        .route(
            "/api/cart",
            get(handlers::cart::get_cart).post(handlers::cart::add_to_cart),
        )
        .route("/api/cart/{id}", delete(handlers::cart::remove_from_cart))
        // Orders (buyer token)
        .route("/api/orders", post(handlers::orders::place_order))
        .route("/api/orders/user", get(handlers::orders::user_orders))
        .route("/api/orders/latest", get(handlers::orders::latest_order))
        // Admin: books
        .route(
            "/api/admin/books",
            get(handlers::admin::list_books).post(handlers::admin::create_book),
        )
        .route(
            "/api/admin/books/{id}",
            put(handlers::admin::update_book).delete(handlers::admin::delete_book),
        )
        // Admin: users
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/{id}",
            patch(handlers::admin::update_user_role)
                .put(handlers::admin::update_user_info)
                .delete(handlers::admin::delete_user),
        )
        // Admin: orders
        .route("/api/admin/orders", get(handlers::admin::list_orders))
        .route(
            "/api/admin/orders/{id}",
            patch(handlers::admin::update_order_status),
        )
        .with_state(state)
}

/// GET / - welcome banner.
async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the KitabCart API" }))
}

/// GET /health - liveness plus a database ping.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": "unreachable" })),
        )
    }
}
