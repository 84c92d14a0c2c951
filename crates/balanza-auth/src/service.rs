//! Registration, login, and verification flows.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Identity Flows                                    │
//! │                                                                         │
//! │  register ──► new tenant + admin user ──► session token                │
//! │  login    ──► argon2 verify + active check ──► session token           │
//! │  verify   ──► decode token ──► re-read user row ──► Identity           │
//! │                                                                         │
//! │  Identity = (user_id, tenant_id, role), with tenant_id taken from      │
//! │  the user's row at verification time. Engine calls downstream          │
//! │  receive this tenant id and nothing else.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use balanza_core::{Role, User};
use balanza_db::repository::tenant::NewTenant;
use balanza_db::repository::user::NewUser;
use balanza_db::Database;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::jwt::TokenService;
use crate::password::{hash_password, verify_password};

/// The verified caller every downstream operation trusts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub tenant_id: String,
    pub role: Role,
}

/// Input for registering a new tenant with its first (admin) user.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub company_tax_id: String,
}

/// A successful login or registration.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Identity service: registration, login, token verification.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
    tokens: TokenService,
}

impl AuthService {
    /// Creates the service from a database handle and configuration.
    pub fn new(db: Database, config: AuthConfig) -> Self {
        AuthService {
            db,
            tokens: TokenService::new(config.jwt_secret, config.session_lifetime_secs),
        }
    }

    /// Registers a new tenant and its admin user, returning a live session.
    ///
    /// ## Errors
    /// - `Db` with `ErrorKind::Conflict` - username, email, company name,
    ///   or tax id already taken
    /// - `Db` with `ErrorKind::InvalidInput` - malformed username/email
    pub async fn register(&self, input: RegisterInput) -> AuthResult<Session> {
        let password_hash = hash_password(&input.password)?;

        let tenant = self
            .db
            .tenants()
            .create(NewTenant {
                name: input.company_name,
                tax_id: input.company_tax_id,
                ..Default::default()
            })
            .await?;

        let user = match self
            .db
            .users()
            .create(
                &tenant.id,
                NewUser {
                    username: input.username,
                    email: input.email,
                    password_hash,
                    role: Role::Admin,
                },
            )
            .await
        {
            Ok(user) => user,
            Err(err) => {
                // The tenant was committed before the user failed; take it
                // back out so a retry with the same company name succeeds.
                if let Err(cleanup) = self.db.tenants().delete_cascade(&tenant.id).await {
                    warn!(tenant_id = %tenant.id, error = %cleanup, "Orphan tenant cleanup failed");
                }
                return Err(err.into());
            }
        };

        info!(user_id = %user.id, tenant_id = %tenant.id, "Tenant registered");

        let token = self.issue_for(&user)?;
        Ok(Session { token, user })
    }

    /// Authenticates a username/password pair.
    ///
    /// Unknown usernames and wrong passwords are the same error, and the
    /// password is always checked before the active flag is consulted.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<Session> {
        let user = self
            .db
            .users()
            .get_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.active {
            return Err(AuthError::InactiveUser);
        }

        info!(user_id = %user.id, "Login");

        let token = self.issue_for(&user)?;
        Ok(Session { token, user })
    }

    /// Verifies a session token and resolves it to an [`Identity`].
    ///
    /// The user row is re-read: a deleted or deactivated user fails
    /// verification even with a token that has not expired, and the
    /// tenant id comes from the row, not the token payload.
    pub async fn verify(&self, token: &str) -> AuthResult<Identity> {
        let claims = self.tokens.validate(token)?;

        let user = self
            .db
            .users()
            .get_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.active {
            return Err(AuthError::InactiveUser);
        }

        Ok(Identity {
            user_id: user.id,
            tenant_id: user.tenant_id,
            role: user.role,
        })
    }

    fn issue_for(&self, user: &User) -> AuthResult<String> {
        self.tokens
            .issue(&user.id, &user.tenant_id, user.role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanza_db::{DbConfig, ErrorKind};

    async fn test_service() -> AuthService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AuthService::new(db, AuthConfig::default())
    }

    fn maria() -> RegisterInput {
        RegisterInput {
            username: "maria".to_string(),
            email: "maria@tienda.co".to_string(),
            password: "secreto123".to_string(),
            company_name: "Tienda La Esquina".to_string(),
            company_tax_id: "900123456-7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_login_verify() {
        let auth = test_service().await;

        let session = auth.register(maria()).await.unwrap();
        assert_eq!(session.user.role, Role::Admin);

        let login = auth.login("maria", "secreto123").await.unwrap();
        let identity = auth.verify(&login.token).await.unwrap();

        assert_eq!(identity.user_id, session.user.id);
        assert_eq!(identity.tenant_id, session.user.tenant_id);
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_alike() {
        let auth = test_service().await;
        auth.register(maria()).await.unwrap();

        let wrong = auth.login("maria", "incorrecta").await.unwrap_err();
        let unknown = auth.login("nadie", "secreto123").await.unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict_without_orphan_tenant() {
        let auth = test_service().await;
        auth.register(maria()).await.unwrap();

        let mut second = maria();
        second.email = "otra@tienda.co".to_string();
        second.company_name = "Otra Tienda".to_string();
        second.company_tax_id = "800999111-2".to_string();

        let err = auth.register(second).await.unwrap_err();
        match err {
            AuthError::Db(db_err) => assert_eq!(db_err.kind(), ErrorKind::Conflict),
            other => panic!("expected Db conflict, got {other:?}"),
        }

        // The compensating delete removed the second tenant
        let mut third = maria();
        third.username = "lucia".to_string();
        third.email = "lucia@tienda.co".to_string();
        third.company_name = "Otra Tienda".to_string();
        third.company_tax_id = "800999111-2".to_string();
        auth.register(third).await.unwrap();
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login_or_verify() {
        let auth = test_service().await;
        let session = auth.register(maria()).await.unwrap();

        auth.db
            .users()
            .set_active(&session.user.tenant_id, &session.user.id, false)
            .await
            .unwrap();

        assert!(matches!(
            auth.login("maria", "secreto123").await.unwrap_err(),
            AuthError::InactiveUser
        ));
        assert!(matches!(
            auth.verify(&session.token).await.unwrap_err(),
            AuthError::InactiveUser
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_tampered_token() {
        let auth = test_service().await;
        let session = auth.register(maria()).await.unwrap();

        let mut tampered = session.token.clone();
        tampered.push('x');

        assert!(matches!(
            auth.verify(&tampered).await.unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }
}
