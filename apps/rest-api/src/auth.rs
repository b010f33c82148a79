//! JWT authentication module.
//!
//! Handles token generation/validation and the request extractors that
//! gate buyer and admin routes.
//!
//! ## Request Flow
//! ```text
//! Authorization: Bearer <token>
//!        │
//!        ▼
//! AuthUser extractor ── missing/garbage/expired → 401
//!        │
//!        ▼
//! AdminUser extractor ── role != admin → 403 (handler never runs)
//! ```

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kitab_core::{Role, User};

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Role carried in the token so admin routes need no user lookup
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a token for a user.
    pub fn generate_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ApiError::internal()
        })
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::auth(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Extractors
// =============================================================================

/// An authenticated caller (any role).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::auth("Missing authorization header"))?;

        let token = extract_bearer_token(header_value)
            .ok_or_else(|| ApiError::auth("Authorization header must be a Bearer token"))?;

        let claims = state.jwt.validate_token(token)?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// An authenticated admin. Wraps [`AuthUser`] and adds the role gate.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            return Err(ApiError::forbidden("Admin access required"));
        }

        Ok(AdminUser(user))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::error::ErrorCode;
    use axum::http::Request;
    use kitab_db::{Database, DbConfig};

    fn test_user(role: Role) -> User {
        User {
            id: "user-001".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "x".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn manager() -> JwtManager {
        JwtManager::new("test-secret".to_string(), 3600)
    }

    async fn test_state() -> AppState {
        let config = ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_lifetime_secs: 3600,
        };
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(config, db)
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/cart");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, _body) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = manager();
        let user = test_user(Role::Buyer);

        let token = manager.generate_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.role, Role::Buyer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = manager();
        assert!(manager.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager().generate_token(&test_user(Role::Buyer)).unwrap();
        let other = JwtManager::new("different-secret".to_string(), 3600);
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[tokio::test]
    async fn test_auth_extractor_accepts_valid_token() {
        let state = test_state().await;
        let token = state.jwt.generate_token(&test_user(Role::Buyer)).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));

        let user = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.user_id, "user-001");
        assert_eq!(user.role, Role::Buyer);
    }

    #[tokio::test]
    async fn test_auth_extractor_rejects_missing_header() {
        let state = test_state().await;
        let mut parts = parts_with_auth(None);

        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthError);
    }

    #[tokio::test]
    async fn test_admin_extractor_rejects_buyer_token() {
        let state = test_state().await;
        let token = state.jwt.generate_token(&test_user(Role::Buyer)).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));

        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_admin_extractor_accepts_admin_token() {
        let state = test_state().await;
        let token = state.jwt.generate_token(&test_user(Role::Admin)).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));

        let admin = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(admin.0.role, Role::Admin);
    }
}
