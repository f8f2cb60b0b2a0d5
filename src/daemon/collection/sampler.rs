use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::{
    config::FailurePolicy,
    daemon::storage::usage_event::UsageEvent,
    utils::clock::Clock,
    window_api::ForegroundProvider,
};

use super::attribution::Attribution;

pub struct SamplerSettings {
    pub interval: Duration,
    pub self_name: Arc<str>,
    pub failure_policy: FailurePolicy,
    pub flush_on_shutdown: bool,
}

/// Polls the foreground app on a fixed interval and sends closed intervals to the store writer.
/// The only writer of usage in the daemon.
pub struct FocusSampler {
    next: mpsc::Sender<UsageEvent>,
    provider: Box<dyn ForegroundProvider>,
    shutdown: CancellationToken,
    attribution: Attribution,
    interval: Duration,
    failure_policy: FailurePolicy,
    flush_on_shutdown: bool,
    time_provider: Box<dyn Clock>,
}

impl FocusSampler {
    pub fn new(
        next: mpsc::Sender<UsageEvent>,
        provider: Box<dyn ForegroundProvider>,
        shutdown: CancellationToken,
        settings: SamplerSettings,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            provider,
            shutdown,
            attribution: Attribution::new(settings.self_name),
            interval: settings.interval,
            failure_policy: settings.failure_policy,
            flush_on_shutdown: settings.flush_on_shutdown,
            time_provider,
        }
    }

    /// Samples once. A failed query never writes and never fails the loop.
    fn tick(&mut self) -> Option<UsageEvent> {
        match self.provider.query() {
            Ok(app) => {
                let now = self.time_provider.local_time();
                self.attribution.observe(app.owner_process_name, now)
            }
            Err(e) => {
                error!("Encountered an error during sampling {:?}", e);
                match self.failure_policy {
                    FailurePolicy::Keep => {}
                    FailurePolicy::Reset => self.attribution.reset(),
                }
                None
            }
        }
    }

    async fn send(&self, event: UsageEvent) -> Result<()> {
        let span = info_span!("Sending attributed usage");
        debug!("Sending message {:?}", event);
        self.next
            .send(event)
            .instrument(span)
            .await
            .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
        Ok(())
    }

    /// Executes the sampler event loop until shutdown.
    pub async fn run(mut self) -> Result<()> {
        let mut sample_point = self.time_provider.instant();
        loop {
            sample_point += self.interval;

            if let Some(event) = self.tick() {
                self.send(event).await?;
                info!("Successfully sent message")
            }

            let cancelled = tokio::select! {
                _ = self.shutdown.cancelled() => true,
                _ = self.time_provider.sleep_until(sample_point) => false,
            };
            // Cancelation means we stop execution of the event loop. Which means we also drop
            // the sender channel and consequently stop the store writer.
            if cancelled {
                return self.stop().await;
            }
        }
    }

    async fn stop(mut self) -> Result<()> {
        if !self.flush_on_shutdown {
            warn!("Dropping the open interval on shutdown");
            return Ok(());
        }
        let now = self.time_provider.local_time();
        if let Some(event) = self.attribution.finish(now) {
            info!("Flushing open interval on shutdown");
            self.send(event).await?;
        }
        Ok(())
    }
}
