use serenity::all::ApplicationId;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::server::{
    discord::DiscordApi,
    model::clear::{DeletionTarget, Stage},
};

/// Coordinates of an interaction's original response.
///
/// The interaction token is valid for 15 minutes after the interaction was received; edits
/// after that fail and are logged by the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionWebhook {
    pub application_id: ApplicationId,
    pub token: String,
}

/// Pushes progress of a clear run into the deferred interaction response.
///
/// Reporting never fails from the caller's point of view: a failed edit is logged and
/// the run carries on. Clones share the live deleted count, which the engine updates after
/// every deletion whether or not a report is sent.
#[derive(Clone)]
pub struct ProgressReporter {
    api: Arc<dyn DiscordApi>,
    webhook: InteractionWebhook,
    target: DeletionTarget,
    last_deleted: Arc<AtomicU64>,
}

impl ProgressReporter {
    /// Creates a reporter for one clear run.
    ///
    /// # Arguments
    /// - `api` - Discord API used to edit the response
    /// - `webhook` - Interaction whose original response is edited
    /// - `target` - Requested amount, shown while preparing
    pub fn new(
        api: Arc<dyn DiscordApi>,
        webhook: InteractionWebhook,
        target: DeletionTarget,
    ) -> Self {
        Self {
            api,
            webhook,
            target,
            last_deleted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replaces the response content with the text for `stage`.
    ///
    /// # Arguments
    /// - `stage` - Current phase of the run
    /// - `deleted` - Messages deleted so far
    pub async fn report(&self, stage: &Stage, deleted: u64) {
        self.record(deleted);
        let content = render(stage, deleted, self.target);

        if let Err(e) = self
            .api
            .edit_original_response(self.webhook.application_id, &self.webhook.token, &content)
            .await
        {
            tracing::warn!("Failed to update clear progress ({:?}): {}", stage, e);
        }
    }

    /// Records the running total without editing the response.
    pub fn record(&self, deleted: u64) {
        self.last_deleted.store(deleted, Ordering::Relaxed);
    }

    /// Most recently recorded deleted count.
    pub fn last_deleted(&self) -> u64 {
        self.last_deleted.load(Ordering::Relaxed)
    }
}

/// Renders the user-facing progress text for a stage.
pub fn render(stage: &Stage, deleted: u64, target: DeletionTarget) -> String {
    match stage {
        Stage::Preparing => format!("🧹 Preparing to clear up to {} messages...", target),
        Stage::FastDeleting => format!(
            "🧹 Cleared {} messages... (fast-deleting recent ones)",
            deleted
        ),
        Stage::SlowDeleting => format!(
            "🧹 Cleared {} messages... (slow-deleting old ones)",
            deleted
        ),
        Stage::Done => format!(
            "✅ All done! Successfully deleted a total of **{}** messages.",
            deleted
        ),
        Stage::Error(reason) => format!(
            "❌ An error occurred while deleting messages. Some messages may remain. \
             Deleted **{}** before stopping.\n\n{}",
            deleted, reason
        ),
    }
}
