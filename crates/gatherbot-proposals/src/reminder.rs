//! Daily reminder job for confirmed proposals.
//!
//! Pure read + notify: no mutation, no acknowledgement tracking. The read is
//! not linearized against in-flight votes; a reminder may lag a concurrent
//! mutation by one write, which is accepted.

use std::sync::Arc;

use chrono::Utc;

use gatherbot_core::error::Result;
use gatherbot_core::traits::Channel;
use gatherbot_core::types::OutgoingMessage;

use crate::messages;
use crate::schedule::Schedule;
use crate::store::ProposalStore;

/// Broadcasts one reminder per confirmed proposal on each trigger.
pub struct ReminderJob {
    store: ProposalStore,
    notifier: Arc<dyn Channel>,
}

impl ReminderJob {
    pub fn new(store: ProposalStore, notifier: Arc<dyn Channel>) -> Self {
        Self { store, notifier }
    }

    /// One reminder pass. Returns how many reminders were delivered;
    /// individual delivery failures are logged and skipped.
    pub async fn run_once(&self) -> Result<usize> {
        let proposals = self.store.load_all().await?;
        let mut delivered = 0;
        for proposal in proposals.iter().filter(|p| p.confirmed) {
            let text = messages::reminder(proposal);
            match self.notifier.send(OutgoingMessage::broadcast(&text)).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Reminder for proposal {} not delivered: {e}",
                    proposal.id
                ),
            }
        }
        Ok(delivered)
    }
}

/// Run the reminder loop forever; callers spawn this as a background task.
/// Failed runs are logged and the loop keeps going.
pub async fn run_reminder_loop(job: ReminderJob, schedule: Schedule) {
    tracing::info!("⏰ Reminder loop started ({})", schedule.expression());

    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_after(now) else {
            tracing::error!(
                "Schedule '{}' has no next occurrence, reminder loop stopped",
                schedule.expression()
            );
            return;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!("Next reminder run at {next}");
        tokio::time::sleep(wait).await;

        match job.run_once().await {
            Ok(0) => {}
            Ok(n) => tracing::info!("📣 Sent {n} reminder(s)"),
            Err(e) => tracing::warn!("Reminder run failed: {e}"),
        }
    }
}
