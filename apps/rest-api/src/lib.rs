//! # KitabCart REST API
//!
//! Axum HTTP server exposing the bookstore over HTTP/JSON.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         REST API Layers                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  routes        │  │  handlers      │  │  auth                      ││
//! │  │                │  │                │  │                            ││
//! │  │ • route table  │  │ • auth         │  │ • JwtManager               ││
//! │  │ • health       │  │ • books/cart   │  │ • AuthUser extractor       ││
//! │  │                │  │ • orders/admin │  │ • AdminUser role gate      ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │   config (env, fail-fast) · state (pool + jwt) · error (JSON)    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `KITAB_JWT_SECRET` - REQUIRED: secret for JWT signing (no fallback)
//! - `HTTP_PORT` - listen port (default: 3081)
//! - `DATABASE_PATH` - SQLite file path (default: ./kitabcart.db)
//! - `JWT_LIFETIME_SECS` - token lifetime (default: 172800 = 2 days)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use state::AppState;
