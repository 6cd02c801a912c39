//! The module contains the error the engine can throw.
//!
//! - [`InvalidArgument`] malformed or non-positive input.
//! - [`KeyNotFound`] an account, category or transaction does not exist.
//! - [`InsufficientFunds`] a debit would leave a balance below zero.
//! - [`Conflict`] the store could not serialize concurrent writers.
//! - [`Database`] any other store failure.
//!
//! Every error is returned before the surrounding store transaction commits,
//! so nothing has been applied when a caller sees one.
//!
//!  [`InvalidArgument`]: EngineError::InvalidArgument
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`Conflict`]: EngineError::Conflict
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(DbErr),
}

impl EngineError {
    /// Returns `true` when retrying the same operation may succeed.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Fragments of driver messages reporting lock contention or a serialization
/// failure (SQLite busy/locked, Postgres 40001/40P01).
const CONTENTION_MARKERS: [&str; 4] = [
    "database is locked",
    "database table is locked",
    "could not serialize access",
    "deadlock detected",
];

impl From<DbErr> for EngineError {
    fn from(err: DbErr) -> Self {
        let message = err.to_string().to_lowercase();
        if CONTENTION_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
        {
            return Self::Conflict(err.to_string());
        }
        Self::Database(err)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
