//! Notification text composition.
//!
//! Pure functions so the engine's decision logic and the exact wording can be
//! tested without a live transport. Delivery lives behind the `Channel` trait.

use crate::command::{THUMBS_DOWN, THUMBS_UP};
use crate::proposal::Proposal;

/// Announcement sent when a proposal is created.
pub fn announcement(proposal: &Proposal) -> String {
    format!(
        "Proposal {id}: {date} {time} by {proposer}\n\
         Reply 'vote {id} {THUMBS_UP}' to approve or 'vote {id} {THUMBS_DOWN}' to reject.",
        id = proposal.id,
        date = proposal.date,
        time = proposal.time,
        proposer = proposal.proposer,
    )
}

/// Sent once when a proposal reaches quorum.
pub fn confirmation(date: &str, time: &str) -> String {
    format!("Date confirmed: {date} {time}")
}

/// Sent when a vote references an unknown proposal id.
pub fn not_found(proposal_id: u64) -> String {
    format!("Proposal {proposal_id} not found.")
}

/// Sent when a vote command carries a non-numeric proposal id.
pub fn invalid_proposal_id() -> String {
    "Invalid proposal id".to_string()
}

/// Daily reminder for a confirmed proposal.
pub fn reminder(proposal: &Proposal) -> String {
    format!(
        "Reminder: {} {} (proposal {})",
        proposal.date, proposal.time, proposal.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_includes_vote_instructions() {
        let p = Proposal::new(3, "2024-06-01", "18:00", "whatsapp:+1555");
        let text = announcement(&p);
        assert!(text.starts_with("Proposal 3: 2024-06-01 18:00 by whatsapp:+1555"));
        assert!(text.contains("vote 3 \u{1F44D}"));
        assert!(text.contains("vote 3 \u{1F44E}"));
    }

    #[test]
    fn test_reminder_wording() {
        let mut p = Proposal::new(2, "2024-06-01", "18:00", "alice");
        p.confirmed = true;
        assert_eq!(reminder(&p), "Reminder: 2024-06-01 18:00 (proposal 2)");
    }
}
