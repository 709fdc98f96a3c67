//! Unified error type for the seeder.
//!
//! Missing parent references (an unknown country or language code) are not
//! errors: seeders skip them and count them in their summaries. Everything
//! here aborts the run.

use thiserror::Error;

/// Errors raised while loading fixtures or writing to the store
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid settings or command-line input
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Fixture data failed to parse or validate
    #[error("Fixture error: {message}")]
    Fixture {
        /// What was wrong
        message: String,
    },

    /// Batch size outside `1..=max` for the rows being written
    #[error("Invalid batch size {size}: must be between 1 and {max}")]
    InvalidBatchSize {
        /// The rejected size
        size: usize,
        /// Largest size the store accepts for these rows
        max: usize,
    },

    /// A seeder name that does not match any known seeder
    #[error("Unknown seeder: {name}")]
    UnknownSeeder {
        /// The name as given
        name: String,
    },

    /// Store failure, propagated as-is
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
