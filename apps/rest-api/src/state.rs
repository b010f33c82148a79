//! Shared application state for the HTTP server.

use std::sync::Arc;

use kitab_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// State handed to every handler via axum's `State` extractor.
///
/// Cloning is cheap: the pool is internally reference-counted and the
/// rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Builds the state from loaded configuration and a connected database.
    pub fn new(config: ApiConfig, db: Database) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_lifetime_secs,
        ));
        AppState {
            db,
            jwt,
            config: Arc::new(config),
        }
    }
}
