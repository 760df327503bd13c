//! The outbound channel seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::OutgoingMessage;

/// An outbound notification channel.
///
/// The proposal engine only ever calls `send`; delivery is fire-and-forget
/// from its point of view. Inbound messages arrive via the gateway webhook,
/// so there is no listen side here.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Short channel name for logs ("whatsapp", "console").
    fn name(&self) -> &str;

    /// Validate configuration and credentials before first use.
    async fn connect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Deliver a message to the configured group.
    async fn send(&self, message: OutgoingMessage) -> Result<()>;
}
