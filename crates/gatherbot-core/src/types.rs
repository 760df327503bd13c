//! Message types shared between the gateway, the command router, and the
//! outbound channels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message received from the chat transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Transport that delivered the message ("whatsapp", "console", ...).
    pub channel: String,
    /// Opaque sender identifier, e.g. "whatsapp:+15551234567".
    pub sender_id: String,
    /// Raw message text.
    pub content: String,
    /// When the message was received.
    pub timestamp: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(channel: &str, sender_id: &str, content: &str) -> Self {
        Self {
            channel: channel.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// A message to broadcast to the configured group.
///
/// GatherBot targets exactly one recipient group; the destination lives in
/// the channel configuration, not on the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl OutgoingMessage {
    pub fn broadcast(content: &str) -> Self {
        Self {
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}
