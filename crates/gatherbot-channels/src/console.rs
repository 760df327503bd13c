//! Console channel: logs what would be sent.
//!
//! Used when Twilio is not configured, so the bot stays fully operable in
//! development and the message flow remains observable.

use async_trait::async_trait;

use gatherbot_core::error::Result;
use gatherbot_core::traits::Channel;
use gatherbot_core::types::OutgoingMessage;

/// Log-only channel, always connected.
#[derive(Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        tracing::info!("[console] Would send: {}", message.content);
        Ok(())
    }
}
