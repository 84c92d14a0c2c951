//! # User Repository
//!
//! User accounts for authentication. Password hashing happens in
//! balanza-auth; this repository only ever sees the finished hash.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use balanza_core::validation::{validate_email, validate_username};
use balanza_core::{Role, User};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Argon2 hash, produced by balanza-auth. Never a raw password.
    pub password_hash: String,
    pub role: Role,
}

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

    /// Creates a user under the tenant.
    ///
    /// ## Errors
    /// - `DbError::UniqueViolation` - username or email already taken
    /// - `DbError::Domain` - malformed username/email
    pub async fn create(&self, tenant_id: &str, input: NewUser) -> DbResult<User> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;

        let now = Utc::now();
        let user = User {
            id: generate_id(),
            tenant_id: tenant_id.to_string(),
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash: input.password_hash,
            role: input.role,
            active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(username = %user.username, tenant_id = %tenant_id, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, tenant_id, username, email, password_hash, role, active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.tenant_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    ///
    /// Unscoped on purpose: token verification starts from a user id
    /// and derives the tenant from the row.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, tenant_id, username, email, password_hash, role, active,
                   created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username (login lookup; usernames are global).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, tenant_id, username, email, password_hash, role, active,
                   created_at, updated_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists the tenant's users.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, tenant_id, username, email, password_hash, role, active,
                   created_at, updated_at
            FROM users
            WHERE tenant_id = ?1
            ORDER BY username
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Activates or deactivates a user. Inactive users cannot log in.
    pub async fn set_active(&self, tenant_id: &str, id: &str, active: bool) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE users SET active = ?3, updated_at = ?4 WHERE id = ?1 AND tenant_id = ?2",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}
