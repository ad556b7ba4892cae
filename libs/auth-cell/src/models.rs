use thiserror::Error;

use shared_database::RepositoryError;
use shared_models::error::AppError;
use shared_utils::jwt::TokenError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown login and wrong password are reported the same way.
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Login and password must not be blank")]
    BlankCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::Token(_) => AppError::Auth(err.to_string()),
            AuthError::BlankCredentials => AppError::BadRequest(err.to_string()),
            AuthError::Storage(RepositoryError::Conflict(msg)) => AppError::Conflict(msg),
            AuthError::Hashing(msg) => AppError::Internal(msg),
            AuthError::Storage(other) => AppError::Database(other.to_string()),
        }
    }
}
