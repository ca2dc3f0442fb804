//! Unified error type for the ledger service.
//!
//! Every fallible function in the crate returns [`Result`]. The REST layer maps
//! these variants onto HTTP status codes in `api::error`.

use thiserror::Error;

/// Errors raised by configuration, storage and ledger validation.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is out of range
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Any failure reported by `SeaORM` / the underlying `SQLite` driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A record was looked up by id and does not exist
    #[error("{collection} record {id} not found")]
    NotFound {
        /// Collection name as exposed over REST (e.g. `students`)
        collection: &'static str,
        /// The id that was requested
        id: i64,
    },

    /// Input rejected before it reached the store
    #[error("Validation failed: {message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// Negative, zero (where forbidden) or non-finite money amount
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Percentage outside 0..=100
    #[error("Invalid percentage: {percentage} (expected 0-100)")]
    InvalidPercentage {
        /// The rejected percentage
        percentage: f64,
    },

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable could not be read
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`].
    #[must_use]
    pub const fn not_found(collection: &'static str, id: i64) -> Self {
        Self::NotFound { collection, id }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
