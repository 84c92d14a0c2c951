//! Identity error types.

use balanza_db::DbError;
use thiserror::Error;

/// Identity and credential errors.
///
/// `InvalidCredentials` deliberately covers both "no such user" and
/// "wrong password" so a login probe cannot enumerate usernames.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Usuario inactivo")]
    InactiveUser,

    #[error("Token inválido: {0}")]
    InvalidToken(String),

    #[error("Usuario no encontrado")]
    UserNotFound,

    /// Persistence failure (including duplicate username/email, which
    /// carries `ErrorKind::Conflict`).
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for identity operations.
pub type AuthResult<T> = Result<T, AuthError>;
