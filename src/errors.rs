//! Unified error type for `ExpenseWise`.
//!
//! The `Display` text of every domain variant doubles as the short notification
//! shown to the user, so messages stay brief and free of internal detail.

use crate::models::PaymentMethod;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Failure reported by the database driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (config files, exports written to disk)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or out-of-range user input, caught before any remote call
    #[error("{message}")]
    Validation {
        /// Notification text
        message: String,
    },

    /// A spend would exceed the available balance of its payment method
    #[error("Insufficient balance! Available: {available:.2}")]
    InsufficientFunds {
        /// Payment method the spend draws from
        method: PaymentMethod,
        /// Balance available for that method
        available: Decimal,
        /// Amount the caller asked for
        requested: Decimal,
    },

    /// A mutating operation was attempted while offline
    #[error("Please go online to {operation}")]
    Connectivity {
        /// Human-readable name of the rejected action
        operation: &'static str,
    },

    /// An update targeted a record the store does not know
    #[error("Record not found: {id}")]
    NotFound {
        /// Id that was looked up
        id: Uuid,
    },

    /// The confirmation entry differs from the first entry
    #[error("PINs do not match")]
    PinMismatch,

    /// Unlock attempt with the wrong PIN
    #[error("Incorrect PIN")]
    IncorrectPin,

    /// Change-PIN attempt with the wrong current PIN
    #[error("Current PIN is incorrect")]
    CurrentPinIncorrect,

    /// Route guard: the app is locked
    #[error("App is locked")]
    Locked,

    /// Another write is still in flight
    #[error("Another change is still being saved")]
    WriteInProgress,

    /// The store rejected or timed out a write
    #[error("Failed to {operation}. Please try again.")]
    RemoteWrite {
        /// Human-readable name of the failed action
        operation: &'static str,
        /// Underlying failure, for logs
        message: String,
    },

    /// PIN hashing backend failure
    #[error("PIN hashing error: {message}")]
    PinHash {
        /// Backend message
        message: String,
    },

    /// Export encoding failure
    #[error("Export error: {message}")]
    Export {
        /// Encoder message
        message: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given notification text.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Domain-level rejections are reported as-is and never downgraded.
    #[must_use]
    pub const fn is_domain_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. }
                | Self::PinMismatch
                | Self::IncorrectPin
                | Self::CurrentPinIncorrect
        )
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::Export {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
