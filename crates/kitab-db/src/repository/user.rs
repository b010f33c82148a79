//! # User Repository
//!
//! Account storage and the admin user-management operations.
//!
//! Password hashing happens in the API layer; this repository only ever
//! sees the finished hash.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kitab_core::{Role, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Finds a user by email (login path).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a new user (registration path).
    ///
    /// ## Errors
    /// `UniqueViolation` when the email is already registered.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists buyer accounts for the admin view, oldest first.
    ///
    /// Admins are deliberately excluded from the listing; the view is for
    /// managing customers.
    pub async fn list_buyers(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE role = 'buyer' ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Changes a user's role.
    ///
    /// ## Returns
    /// The updated user, or NotFound for an unknown id.
    pub async fn update_role(&self, id: &str, role: Role) -> DbResult<User> {
        let result = sqlx::query("UPDATE users SET role = ?2 WHERE id = ?1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Updates a user's name and email.
    ///
    /// ## Errors
    /// * NotFound for an unknown id
    /// * `UniqueViolation` when the new email belongs to someone else
    pub async fn update_info(&self, id: &str, name: &str, email: &str) -> DbResult<User> {
        let result = sqlx::query("UPDATE users SET name = ?2, email = ?3 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .bind(email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Deletes a user. Idempotent.
    ///
    /// Cart rows cascade away with the account; orders survive (weak
    /// reference, see the schema header).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user(email: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4().to_string(),
            name: "Sample".to_string(),
            email: email.to_string(),
            password_hash: "argon2-hash-here".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let user = sample_user("reader@example.com", Role::Buyer);
        users.insert(&user).await.unwrap();

        let found = users
            .find_by_email("reader@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, Role::Buyer);

        assert!(users
            .find_by_email("missing@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users
            .insert(&sample_user("taken@example.com", Role::Buyer))
            .await
            .unwrap();
        let err = users
            .insert(&sample_user("taken@example.com", Role::Buyer))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_buyers_excludes_admins() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users
            .insert(&sample_user("buyer@example.com", Role::Buyer))
            .await
            .unwrap();
        users
            .insert(&sample_user("admin@example.com", Role::Admin))
            .await
            .unwrap();

        let buyers = users.list_buyers().await.unwrap();
        assert_eq!(buyers.len(), 1);
        assert_eq!(buyers[0].email, "buyer@example.com");
    }

    #[tokio::test]
    async fn test_update_role() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let user = sample_user("promote@example.com", Role::Buyer);
        users.insert(&user).await.unwrap();

        let updated = users.update_role(&user.id, Role::Admin).await.unwrap();
        assert_eq!(updated.role, Role::Admin);

        let err = users
            .update_role("no-such-user", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_info() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let user = sample_user("old@example.com", Role::Buyer);
        users.insert(&user).await.unwrap();

        let updated = users
            .update_info(&user.id, "New Name", "new@example.com")
            .await
            .unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let user = sample_user("gone@example.com", Role::Buyer);
        users.insert(&user).await.unwrap();

        users.delete(&user.id).await.unwrap();
        assert!(users.get_by_id(&user.id).await.unwrap().is_none());
        users.delete(&user.id).await.unwrap();
    }
}
