use std::path::PathBuf;

use anyhow::Result;
use collection::{
    identity::resolve_self_name,
    sampler::{FocusSampler, SamplerSettings},
};
use shutdown::ShutdownListener;
use storage::{usage_event::UsageEvent, usage_store::UsageStore};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use writer::StoreWriter;

use crate::{
    config::TrackerConfig,
    utils::clock::{Clock, DefaultClock},
    window_api::{ForegroundProvider, GenericForegroundProvider},
};

pub mod args;
pub mod collection;
pub mod shutdown;
pub mod storage;
pub mod writer;

const CHANNEL_CAPACITY: usize = 10;

/// Represents the starting point for the daemon
pub async fn start_daemon(dir: PathBuf) -> Result<()> {
    let config = TrackerConfig::load(&dir)?;
    let store = storage::open_in_app_dir(&dir)?;
    let self_name = resolve_self_name(config.self_name.as_deref())?;
    info!("Tracking foreground apps, excluding {self_name}");

    std::env::set_current_dir("/")?;

    let (sender, receiver) = mpsc::channel::<UsageEvent>(CHANNEL_CAPACITY);
    let provider = GenericForegroundProvider::new()?;

    let shutdown_token = CancellationToken::new();
    let shutdown_listener = ShutdownListener::install()?;

    let settings = SamplerSettings {
        interval: config.sample_interval(),
        self_name,
        failure_policy: config.failure_policy,
        flush_on_shutdown: config.flush_on_shutdown,
    };
    let sampler = create_sampler(sender, provider, &shutdown_token, settings, DefaultClock);

    let writer = create_writer(store, receiver);

    let (_, sampling_result, summary) = tokio::join!(
        shutdown_listener.wait(shutdown_token),
        sampler.run(),
        writer.run(),
    );

    if let Err(sampling_result) = sampling_result {
        error!("Sampling module got an error {:?}", sampling_result);
    }

    if summary.rejected > 0 || summary.failed > 0 {
        warn!("Not every interval was stored {summary:?}");
    }

    Ok(())
}

fn create_sampler(
    sender: mpsc::Sender<UsageEvent>,
    provider: impl ForegroundProvider + 'static,
    shutdown_token: &CancellationToken,
    settings: SamplerSettings,
    clock: impl Clock,
) -> FocusSampler {
    FocusSampler::new(
        sender,
        Box::new(provider),
        shutdown_token.clone(),
        settings,
        Box::new(clock),
    )
}

fn create_writer<S: UsageStore>(store: S, receiver: mpsc::Receiver<UsageEvent>) -> StoreWriter<S> {
    StoreWriter::new(receiver, store)
}
