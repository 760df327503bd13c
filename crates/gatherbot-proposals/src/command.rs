//! Command protocol: parse inbound chat text into typed actions.
//!
//! The grammar is whitespace-tokenized:
//! ```text
//! propose <date> <time> [ignored...]
//! vote <id> yes|no|👍...|👎... [ignored...]
//! ```
//! Anything else is a no-op for the bot (the transport still acknowledges
//! receipt). Parsing is a pure function of the text; side effects live in
//! [`CommandRouter::handle`].

use std::sync::Arc;

use gatherbot_core::error::Result;
use gatherbot_core::traits::Channel;
use gatherbot_core::types::{IncomingMessage, OutgoingMessage};

use crate::engine::ProposalEngine;
use crate::messages;

/// Approve marker, matched as a prefix so variants with modifiers count.
pub const THUMBS_UP: &str = "\u{1F44D}";
/// Reject marker.
pub const THUMBS_DOWN: &str = "\u{1F44E}";

/// A parsed inbound command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Propose { date: String, time: String },
    Vote { proposal_id: u64, approve: bool },
    /// `vote` with a non-numeric id; answered with an error text, no engine call.
    InvalidProposalId,
    /// Anything the bot does not act on, including unknown vote tokens,
    /// which are silently ignored.
    Unrecognized,
}

impl Command {
    /// Parse a raw command string.
    pub fn parse(text: &str) -> Command {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < 3 {
            return Command::Unrecognized;
        }

        match tokens[0].to_ascii_lowercase().as_str() {
            "propose" => Command::Propose {
                date: tokens[1].to_string(),
                time: tokens[2].to_string(),
            },
            "vote" => {
                let Ok(proposal_id) = tokens[1].parse::<u64>() else {
                    return Command::InvalidProposalId;
                };
                let token = tokens[2];
                if token.eq_ignore_ascii_case("yes") || token.starts_with(THUMBS_UP) {
                    Command::Vote {
                        proposal_id,
                        approve: true,
                    }
                } else if token.eq_ignore_ascii_case("no") || token.starts_with(THUMBS_DOWN) {
                    Command::Vote {
                        proposal_id,
                        approve: false,
                    }
                } else {
                    Command::Unrecognized
                }
            }
            _ => Command::Unrecognized,
        }
    }
}

/// Stateless router: parses one message and drives the engine.
pub struct CommandRouter {
    engine: Arc<ProposalEngine>,
    notifier: Arc<dyn Channel>,
}

impl CommandRouter {
    pub fn new(engine: Arc<ProposalEngine>, notifier: Arc<dyn Channel>) -> Self {
        Self { engine, notifier }
    }

    /// Handle one inbound message end to end.
    ///
    /// User-facing conditions (unknown id, malformed id, unrecognized text)
    /// are answered or ignored here; only infrastructure faults propagate.
    pub async fn handle(&self, message: &IncomingMessage) -> Result<()> {
        match Command::parse(&message.content) {
            Command::Propose { date, time } => {
                self.engine
                    .propose(&date, &time, &message.sender_id)
                    .await?;
            }
            Command::Vote {
                proposal_id,
                approve,
            } => {
                self.engine
                    .vote(proposal_id, &message.sender_id, approve)
                    .await?;
            }
            Command::InvalidProposalId => {
                if let Err(e) = self
                    .notifier
                    .send(OutgoingMessage::broadcast(&messages::invalid_proposal_id()))
                    .await
                {
                    tracing::warn!("Notification delivery failed on {}: {e}", self.notifier.name());
                }
            }
            Command::Unrecognized => {
                tracing::debug!(
                    "Ignoring message from {}: {:?}",
                    message.sender_id,
                    message.content
                );
            }
        }
        Ok(())
    }
}
