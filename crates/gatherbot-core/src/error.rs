//! GatherBot error taxonomy.
//!
//! Infrastructure faults only. Expected user input conditions (unknown
//! proposal id, malformed vote id) are plain outcomes in the proposals crate
//! and never travel through this enum.

use thiserror::Error;

/// All infrastructure errors GatherBot can produce.
#[derive(Debug, Error)]
pub enum GatherBotError {
    /// The backing store cannot be read or written, or the exclusive lock
    /// could not be acquired within the configured timeout.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Persisted proposal state exists but fails to deserialize.
    #[error("Corrupt proposal state: {0}")]
    CorruptState(String),

    /// Outbound channel failure (API call rejected, transport down).
    #[error("Channel error: {0}")]
    Channel(String),

    /// Channel credentials were rejected.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Configuration file unreadable or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatherBotError>;
