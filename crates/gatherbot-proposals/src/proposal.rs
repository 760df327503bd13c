//! Proposal definitions: the core data model for scheduling candidates.

use serde::{Deserialize, Serialize};

/// Approve votes required to confirm a proposal.
pub const QUORUM: usize = 5;

/// A candidate date/time for the group event, with its vote tally and
/// confirmation status.
///
/// Vote lists carry set semantics: a voter appears in at most one of the two
/// lists, never twice in one. `confirmed` only ever flips false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique id, assigned in creation order starting at 1.
    pub id: u64,
    /// Proposed date, opaque (no validation, e.g. "2024-06-01").
    pub date: String,
    /// Proposed time, opaque (e.g. "18:00").
    pub time: String,
    /// Sender identifier of whoever proposed it.
    pub proposer: String,
    #[serde(default)]
    pub yes_votes: Vec<String>,
    #[serde(default)]
    pub no_votes: Vec<String>,
    #[serde(default)]
    pub confirmed: bool,
}

impl Proposal {
    pub fn new(id: u64, date: &str, time: &str, proposer: &str) -> Self {
        Self {
            id,
            date: date.to_string(),
            time: time.to_string(),
            proposer: proposer.to_string(),
            yes_votes: Vec::new(),
            no_votes: Vec::new(),
            confirmed: false,
        }
    }

    /// Record or change one voter's vote.
    ///
    /// The voter is removed from the opposite list and appended to the target
    /// list only if absent, so repeating the same vote is a no-op and
    /// changing a vote moves the voter exactly once.
    pub fn apply_vote(&mut self, voter: &str, approve: bool) {
        let (target, other) = if approve {
            (&mut self.yes_votes, &mut self.no_votes)
        } else {
            (&mut self.no_votes, &mut self.yes_votes)
        };
        other.retain(|v| v != voter);
        if !target.iter().any(|v| v == voter) {
            target.push(voter.to_string());
        }
    }

    /// Whether the approve count has reached quorum.
    pub fn has_quorum(&self) -> bool {
        self.yes_votes.len() >= QUORUM
    }
}
