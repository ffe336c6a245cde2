//! Error types for babycare.
//!
//! This module defines all error types used throughout the babycare crate,
//! providing detailed context for debugging and user-friendly error messages.
//! The age calculator itself never fails; these errors come from profiles,
//! records, storage, configuration, and argument parsing.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for babycare operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Domain Errors ===
    /// A baby profile failed validation.
    #[error("invalid baby profile: {message}")]
    InvalidProfile {
        /// Description of the validation failure.
        message: String,
    },

    /// A care record failed validation.
    #[error("invalid {kind} record: {message}")]
    InvalidRecord {
        /// Kind of record being validated.
        kind: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// No baby profile with the given identifier exists.
    #[error("baby not found: {0}")]
    BabyNotFound(String),

    /// An operation needed a current baby but none is selected.
    #[error("no baby selected; add one with `babycare baby add` or pass --baby")]
    NoBabySelected,

    /// No care record with the given id exists.
    #[error("record not found: {id}")]
    RecordNotFound {
        /// The missing record id.
        id: i64,
    },

    // === Input Errors ===
    /// A date or time argument could not be parsed.
    #[error("invalid time '{input}': expected YYYY-MM-DDTHH:MM, YYYY-MM-DD HH:MM or HH:MM")]
    InvalidTime {
        /// The rejected input.
        input: String,
    },

    /// A duration argument could not be parsed.
    #[error("invalid duration '{input}': expected minutes (90), 90m, 1h or 1h30m")]
    InvalidDuration {
        /// The rejected input.
        input: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for babycare operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new profile validation error.
    #[must_use]
    pub fn invalid_profile(message: impl Into<String>) -> Self {
        Self::InvalidProfile {
            message: message.into(),
        }
    }

    /// Create a new record validation error.
    #[must_use]
    pub fn invalid_record(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            message: message.into(),
        }
    }

    /// Create a baby-not-found error for a name or id.
    #[must_use]
    pub fn baby_not_found(key: impl Into<String>) -> Self {
        Self::BabyNotFound(key.into())
    }

    /// Check if this error means a lookup came back empty.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BabyNotFound(_) | Self::RecordNotFound { .. })
    }

    /// Check if this error was caused by bad user input rather than the system.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidProfile { .. }
                | Self::InvalidRecord { .. }
                | Self::InvalidTime { .. }
                | Self::InvalidDuration { .. }
                | Self::NoBabySelected
        )
    }
}
