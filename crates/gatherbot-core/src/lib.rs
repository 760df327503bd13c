//! # GatherBot Core
//! Shared foundation: configuration, error taxonomy, message types, and the
//! outbound channel trait every other crate builds on.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::GatherBotConfig;
pub use error::{GatherBotError, Result};
pub use traits::Channel;
pub use types::{IncomingMessage, OutgoingMessage};
