//! # GatherBot Proposals
//!
//! The scheduling core: proposal/vote state machine, concurrency-safe flat
//! store, command protocol, and the daily reminder job.
//!
//! ## Architecture
//! ```text
//! Gateway webhook ──> CommandRouter ──> ProposalEngine ──> ProposalStore
//!                          │                  │               (exclusive
//!                          │                  │                read-modify-write)
//!                          └── notifications ─┴──> Channel (outbound sink)
//!
//! Reminder loop (schedule tick) ──> ProposalStore (read) ──> Channel
//! ```
//!
//! All mutations run inside [`store::ProposalStore::with_exclusive`];
//! notifications go out only after state is durably persisted.

pub mod command;
pub mod engine;
pub mod messages;
pub mod proposal;
pub mod reminder;
pub mod schedule;
pub mod store;

pub use command::{Command, CommandRouter};
pub use engine::{ProposalEngine, VoteOutcome};
pub use proposal::{Proposal, QUORUM};
pub use reminder::ReminderJob;
pub use store::ProposalStore;
