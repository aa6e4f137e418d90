use chrono::Utc;
use serenity::all::{ChannelId, MessageId};
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;

use crate::server::{
    discord::DiscordApi,
    error::discord::DiscordError,
    model::clear::{DeletionTarget, ProgressState, Stage},
    service::clear::{classifier::classify, progress::ProgressReporter},
};

/// Delays and reporting cadence for a clear run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearPacing {
    /// Pause between fetching consecutive pages.
    pub page_delay: Duration,

    /// Pause between consecutive single-message deletions. Individual deletes share a
    /// per-route rate limit that bulk deletes do not.
    pub delete_delay: Duration,

    /// Send an intermediate progress report every this many individual deletions.
    /// Zero disables intermediate reports; partition-end reports are always sent.
    pub progress_interval: u32,
}

impl ClearPacing {
    /// Pacing with no delays. Intended for tests.
    pub fn immediate() -> Self {
        Self {
            page_delay: Duration::ZERO,
            delete_delay: Duration::ZERO,
            progress_interval: 0,
        }
    }
}

impl Default for ClearPacing {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_secs(1),
            delete_delay: Duration::from_secs(1),
            progress_interval: 10,
        }
    }
}

/// Pages backward through a channel deleting messages until a target is met.
///
/// Each page is split by age: messages younger than 14 days go out in one bulk delete,
/// older ones are deleted one at a time with pacing in between. Pages, and the two
/// partitions of one page, are processed strictly in sequence.
pub struct DeletionEngine {
    api: Arc<dyn DiscordApi>,
    reporter: ProgressReporter,
    pacing: ClearPacing,
}

impl DeletionEngine {
    pub fn new(api: Arc<dyn DiscordApi>, reporter: ProgressReporter, pacing: ClearPacing) -> Self {
        Self {
            api,
            reporter,
            pacing,
        }
    }

    /// Runs a clear to completion, channel exhaustion, or the first fatal error.
    ///
    /// Errors are not returned: an aborted run reports `Stage::Error` with the count
    /// deleted so far, which is also reflected in the returned state.
    ///
    /// # Arguments
    /// - `channel_id` - Channel to clear
    /// - `target` - How many messages to delete
    ///
    /// # Returns
    /// - `ProgressState` - Final stage (`Done` or `Error`) and total deleted
    pub async fn run(&self, channel_id: ChannelId, target: DeletionTarget) -> ProgressState {
        let mut progress = ProgressState::new();
        self.reporter.report(&progress.stage, progress.deleted).await;

        match self.delete_until(channel_id, target, &mut progress).await {
            Ok(()) => {
                progress.stage = Stage::Done;
                tracing::info!(
                    "Cleared {} messages from channel {} (target: {})",
                    progress.deleted,
                    channel_id,
                    target
                );
            }
            Err(e) => {
                tracing::error!(
                    "Clear in channel {} aborted after {} messages: {}",
                    channel_id,
                    progress.deleted,
                    e
                );
                progress.stage = Stage::Error(e.to_string());
            }
        }

        self.reporter.report(&progress.stage, progress.deleted).await;

        progress
    }

    async fn delete_until(
        &self,
        channel_id: ChannelId,
        target: DeletionTarget,
        progress: &mut ProgressState,
    ) -> Result<(), DiscordError> {
        let mut before: Option<MessageId> = None;

        while !target.is_reached(progress.deleted) {
            let limit = target.page_limit(progress.deleted);
            let page = self.api.fetch_messages(channel_id, limit, before).await?;

            // Take the cursor before deleting anything on this page
            let Some(oldest) = page.last() else {
                break;
            };
            before = Some(oldest.id);

            let partition = classify(&page, Utc::now());
            tracing::debug!(
                "Fetched {} messages from channel {}: {} recent, {} old",
                page.len(),
                channel_id,
                partition.recent.len(),
                partition.old.len()
            );

            if !partition.recent.is_empty() {
                progress.deleted += self.delete_recent(channel_id, &partition.recent).await?;
                self.reporter.record(progress.deleted);
                progress.stage = Stage::FastDeleting;
                self.reporter.report(&progress.stage, progress.deleted).await;
            }

            if !partition.old.is_empty() {
                progress.stage = Stage::SlowDeleting;
                self.delete_old(channel_id, &partition.old, progress).await?;
                self.reporter.report(&progress.stage, progress.deleted).await;
            }

            if page.len() < usize::from(limit) {
                break;
            }

            sleep(self.pacing.page_delay).await;
        }

        Ok(())
    }

    /// Deletes messages younger than 14 days. The bulk endpoint needs at least two ids, so
    /// a lone message goes through the single-message endpoint.
    async fn delete_recent(
        &self,
        channel_id: ChannelId,
        ids: &[MessageId],
    ) -> Result<u64, DiscordError> {
        match ids {
            [] => Ok(0),
            [id] => {
                self.api.delete_message(channel_id, *id).await?;
                Ok(1)
            }
            ids => {
                self.api.bulk_delete_messages(channel_id, ids).await?;
                Ok(ids.len() as u64)
            }
        }
    }

    /// Deletes messages one at a time, skipping ones that are already gone.
    async fn delete_old(
        &self,
        channel_id: ChannelId,
        ids: &[MessageId],
        progress: &mut ProgressState,
    ) -> Result<(), DiscordError> {
        let interval = u64::from(self.pacing.progress_interval);
        let mut since_report = 0;

        for (index, id) in ids.iter().enumerate() {
            if index > 0 {
                sleep(self.pacing.delete_delay).await;
            }

            match self.api.delete_message(channel_id, *id).await {
                Ok(()) => {
                    progress.deleted += 1;
                    self.reporter.record(progress.deleted);
                    since_report += 1;
                }
                Err(e) if e.is_unknown_message() => {
                    tracing::warn!("Message {} in channel {} already deleted", id, channel_id);
                }
                Err(e) => return Err(e),
            }

            let is_last = index + 1 == ids.len();
            if interval > 0 && since_report >= interval && !is_last {
                self.reporter.report(&progress.stage, progress.deleted).await;
                since_report = 0;
            }
        }

        Ok(())
    }
}
