//! The module contains the error the engine can throw.
//!
//! Caller errors:
//!
//! - [`Validation`] malformed or out-of-range input.
//! - [`Conflict`] a name or email is already taken.
//! - [`Forbidden`] the resource is missing or belongs to someone else.
//! - [`InvalidCredentials`] / [`InvalidToken`] authentication failures.
//!
//! Everything else is an infrastructure failure and must not leak to clients.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Conflict`]: EngineError::Conflict
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`InvalidCredentials`]: EngineError::InvalidCredentials
//!  [`InvalidToken`]: EngineError::InvalidToken
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("\"{0}\" already present!")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error(transparent)]
    Database(#[from] DbErr),
    /// The balance update and the transaction insert were rolled back together.
    #[error("posting aborted: {0}")]
    AtomicApply(DbErr),
    #[error("hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    TokenSigning(String),
}

impl EngineError {
    /// Returns true for failures the caller can't fix by changing the request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::AtomicApply(_) | Self::Hashing(_) | Self::TokenSigning(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidToken, Self::InvalidToken) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::AtomicApply(a), Self::AtomicApply(b)) => a.to_string() == b.to_string(),
            (Self::Hashing(a), Self::Hashing(b)) => a == b,
            (Self::TokenSigning(a), Self::TokenSigning(b)) => a == b,
            _ => false,
        }
    }
}

/// Maps a store error to `Conflict` when it is a uniqueness violation.
///
/// `key` is the value reported back to the caller.
pub(crate) fn conflict_or_database(err: DbErr, key: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::Conflict(key.to_string()),
        _ => EngineError::Database(err),
    }
}
