//! Proposal engine: create proposals, record votes, detect quorum.
//!
//! Every mutation runs inside the store's exclusive scope; notifications are
//! emitted only after the mutated state is durably on disk. Delivery is
//! fire-and-forget: a failed send is logged and never fails the operation.

use std::sync::Arc;

use gatherbot_core::error::Result;
use gatherbot_core::traits::Channel;
use gatherbot_core::types::OutgoingMessage;

use crate::messages;
use crate::proposal::{Proposal, QUORUM};
use crate::store::ProposalStore;

/// Result of a vote operation.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// The referenced proposal does not exist; nothing was mutated.
    NotFound,
    /// The vote was recorded; `confirmed` is the proposal's current status.
    Recorded { confirmed: bool },
}

/// Outcome of the vote mutation, captured inside the exclusive scope.
struct VoteApplied {
    confirmed: bool,
    newly_confirmed: bool,
    date: String,
    time: String,
}

/// The scheduling business logic, operating only through the store.
pub struct ProposalEngine {
    store: ProposalStore,
    notifier: Arc<dyn Channel>,
}

impl ProposalEngine {
    pub fn new(store: ProposalStore, notifier: Arc<dyn Channel>) -> Self {
        Self { store, notifier }
    }

    /// Create a new proposal and announce it to the group.
    ///
    /// Date and time are opaque strings; there is no validation error path.
    pub async fn propose(&self, date: &str, time: &str, proposer: &str) -> Result<Proposal> {
        let proposal = self
            .store
            .with_exclusive(|proposals| {
                // Ids are never reclaimed (proposals are never deleted), so
                // max + 1 is a monotonic counter under the exclusive lock.
                let id = proposals.iter().map(|p| p.id).max().unwrap_or(0) + 1;
                let proposal = Proposal::new(id, date, time, proposer);
                proposals.push(proposal.clone());
                Ok(proposal)
            })
            .await?;

        tracing::info!("📅 Proposal {} created by {}", proposal.id, proposer);
        self.notify(&messages::announcement(&proposal)).await;
        Ok(proposal)
    }

    /// Record, or change, one voter's vote on a proposal.
    ///
    /// Idempotent per voter: repeating a vote changes nothing, switching
    /// sides moves the voter exactly once. The confirmation notification is
    /// emitted on the call where the yes-count first reaches [`QUORUM`] and
    /// never again; later reject votes are recorded but cannot revert it.
    pub async fn vote(&self, proposal_id: u64, voter: &str, approve: bool) -> Result<VoteOutcome> {
        let applied = self
            .store
            .with_exclusive(|proposals| {
                let Some(proposal) = proposals.iter_mut().find(|p| p.id == proposal_id) else {
                    return Ok(None);
                };
                proposal.apply_vote(voter, approve);
                let newly_confirmed = !proposal.confirmed && proposal.has_quorum();
                if newly_confirmed {
                    proposal.confirmed = true;
                }
                Ok(Some(VoteApplied {
                    confirmed: proposal.confirmed,
                    newly_confirmed,
                    date: proposal.date.clone(),
                    time: proposal.time.clone(),
                }))
            })
            .await?;

        match applied {
            None => {
                tracing::debug!("Vote on unknown proposal {proposal_id} by {voter}");
                self.notify(&messages::not_found(proposal_id)).await;
                Ok(VoteOutcome::NotFound)
            }
            Some(applied) => {
                tracing::info!(
                    "🗳️ Vote recorded: proposal {} {} by {}",
                    proposal_id,
                    if approve { "approved" } else { "rejected" },
                    voter
                );
                if applied.newly_confirmed {
                    tracing::info!("✅ Proposal {} confirmed ({QUORUM} approvals)", proposal_id);
                    self.notify(&messages::confirmation(&applied.date, &applied.time))
                        .await;
                }
                Ok(VoteOutcome::Recorded {
                    confirmed: applied.confirmed,
                })
            }
        }
    }

    /// All proposals that have reached quorum.
    pub async fn confirmed_proposals(&self) -> Result<Vec<Proposal>> {
        let proposals = self.store.load_all().await?;
        Ok(proposals.into_iter().filter(|p| p.confirmed).collect())
    }

    /// Broadcast a notification, logging delivery failures instead of
    /// propagating them. State is already persisted by the time this runs.
    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.send(OutgoingMessage::broadcast(text)).await {
            tracing::warn!("Notification delivery failed on {}: {e}", self.notifier.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingChannel, temp_store};

    fn engine_with(tag: &str) -> (ProposalEngine, Arc<RecordingChannel>, ProposalStore) {
        let store = temp_store(tag);
        let channel = RecordingChannel::new();
        let engine = ProposalEngine::new(store.clone(), channel.clone());
        (engine, channel, store)
    }

    #[tokio::test]
    async fn test_sequential_ids_without_gaps() {
        let (engine, channel, _) = engine_with("engine-ids");
        for n in 1..=3u64 {
            let p = engine.propose("2024-06-01", "18:00", "alice").await.unwrap();
            assert_eq!(p.id, n);
            assert!(!p.confirmed);
            assert!(p.yes_votes.is_empty() && p.no_votes.is_empty());
        }
        let sent = channel.messages();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].starts_with("Proposal 1:"));
        assert!(sent[2].starts_with("Proposal 3:"));
    }

    #[tokio::test]
    async fn test_concurrent_proposes_never_duplicate_ids() {
        let (engine, _, store) = engine_with("engine-concurrent");
        let engine = Arc::new(engine);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine.propose("2024-06-01", "18:00", "alice").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<u64> = store.load_all().await.unwrap().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_quorum_confirms_exactly_once() {
        let (engine, channel, store) = engine_with("engine-quorum");
        engine.propose("2024-06-01", "18:00", "alice").await.unwrap();

        for n in 0..4 {
            let outcome = engine.vote(1, &format!("voter{n}"), true).await.unwrap();
            assert_eq!(outcome, VoteOutcome::Recorded { confirmed: false });
        }
        let outcome = engine.vote(1, "voter4", true).await.unwrap();
        assert_eq!(outcome, VoteOutcome::Recorded { confirmed: true });

        // A reject vote after confirmation is recorded but changes nothing.
        let outcome = engine.vote(1, "bob", false).await.unwrap();
        assert_eq!(outcome, VoteOutcome::Recorded { confirmed: true });

        let confirmations: Vec<_> = channel
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Date confirmed:"))
            .collect();
        assert_eq!(confirmations, vec!["Date confirmed: 2024-06-01 18:00"]);

        let stored = store.load_all().await.unwrap();
        assert!(stored[0].confirmed);
        assert_eq!(stored[0].no_votes, vec!["bob"]);
    }

    #[tokio::test]
    async fn test_sixth_yes_vote_does_not_reconfirm() {
        let (engine, channel, _) = engine_with("engine-reconfirm");
        engine.propose("2024-06-01", "18:00", "alice").await.unwrap();
        for n in 0..6 {
            engine.vote(1, &format!("voter{n}"), true).await.unwrap();
        }
        let confirmations = channel
            .messages()
            .iter()
            .filter(|m| m.starts_with("Date confirmed:"))
            .count();
        assert_eq!(confirmations, 1);
    }

    #[tokio::test]
    async fn test_vote_change_decrements_yes_count() {
        let (engine, _, store) = engine_with("engine-change");
        engine.propose("2024-06-01", "18:00", "alice").await.unwrap();

        engine.vote(1, "alice", true).await.unwrap();
        let after_first = store.load_all().await.unwrap()[0].yes_votes.len();

        engine.vote(1, "alice", false).await.unwrap();
        let stored = store.load_all().await.unwrap();
        assert_eq!(stored[0].yes_votes.len(), after_first - 1);
        assert_eq!(stored[0].no_votes, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_vote_on_unknown_id_leaves_store_unchanged() {
        let (engine, channel, store) = engine_with("engine-notfound");
        engine.propose("2024-06-01", "18:00", "alice").await.unwrap();
        let before = store.load_all().await.unwrap();

        let outcome = engine.vote(99, "bob", true).await.unwrap();
        assert_eq!(outcome, VoteOutcome::NotFound);
        assert_eq!(store.load_all().await.unwrap(), before);
        assert!(channel.messages().contains(&"Proposal 99 not found.".to_string()));
    }

    #[tokio::test]
    async fn test_confirmed_proposals_filter() {
        let (engine, _, _) = engine_with("engine-confirmed");
        engine.propose("2024-06-01", "18:00", "alice").await.unwrap();
        engine.propose("2024-06-08", "19:00", "bob").await.unwrap();
        for n in 0..5 {
            engine.vote(2, &format!("voter{n}"), true).await.unwrap();
        }

        let confirmed = engine.confirmed_proposals().await.unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, 2);
    }
}
