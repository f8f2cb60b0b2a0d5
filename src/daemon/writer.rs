//! The single writer of the usage log. Every interval the sampler closes arrives here over the
//! channel and becomes one `usage_log` row.

use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

use super::storage::{error::StoreError, usage_event::UsageEvent, usage_store::UsageStore};

/// What happened to the events of one daemon session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    /// Refused by validation. Retrying would not help.
    pub rejected: usize,
    /// Lost to a database failure. There is no retry.
    pub failed: usize,
}

pub struct StoreWriter<S: UsageStore> {
    receiver: Receiver<UsageEvent>,
    store: S,
}

impl<S: UsageStore> StoreWriter<S> {
    pub fn new(receiver: Receiver<UsageEvent>, store: S) -> Self {
        Self { receiver, store }
    }

    /// Appends events until the sampler drops its sender.
    pub async fn run(mut self) -> WriteSummary {
        let mut summary = WriteSummary::default();
        while let Some(event) = self.receiver.recv().await {
            let result = self
                .store
                .append_usage(&event.app_name, event.duration_seconds, event.date)
                .await;
            match result {
                Ok(entry) => {
                    debug!("Stored entry {} {:?}", entry.id, event);
                    summary.written += 1;
                }
                Err(e @ StoreError::Validation { .. }) => {
                    warn!("Rejected {:?}: {e}", event);
                    summary.rejected += 1;
                }
                Err(e) => {
                    error!("Lost {:?}: {e:?}", event);
                    summary.failed += 1;
                }
            }
        }
        info!("Usage channel closed {summary:?}");
        summary
    }
}
