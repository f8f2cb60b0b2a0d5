use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Watches for the signals that end the daemon. Listeners are registered in [Self::install], so a
/// signal that arrives before [Self::wait] is polled is not lost.
///
/// `studytrack stop` sends SIGTERM on unix. On Windows detached processes can't receive signals,
/// so `stop` kills them instead and the open interval is lost.
pub struct ShutdownListener {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownListener {
    pub fn install() -> Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    /// Cancels `cancelation` on ctrl-c or SIGTERM. Returns early if it gets cancelled elsewhere.
    pub async fn wait(mut self, cancelation: CancellationToken) {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(_) => info!("Received interrupt signal"),
                    Err(e) => error!("Failed to listen for interrupt signal {e:?}"),
                }
                cancelation.cancel();
            },
            _ = self.terminated() => {
                info!("Received terminate signal");
                cancelation.cancel();
            },
            _ = cancelation.cancelled() => {},
        };
    }

    #[cfg(unix)]
    async fn terminated(&mut self) {
        self.terminate.recv().await;
    }

    #[cfg(not(unix))]
    async fn terminated(&mut self) {
        std::future::pending::<()>().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use tokio_util::sync::CancellationToken;

    use crate::utils::logging::TEST_LOGGING;

    use super::ShutdownListener;

    #[tokio::test]
    async fn external_cancel_ends_wait() -> Result<()> {
        *TEST_LOGGING;
        let token = CancellationToken::new();
        let listener = ShutdownListener::install()?;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(5), listener.wait(token.clone())).await?;
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn terminate_signal_cancels_token() -> Result<()> {
        *TEST_LOGGING;
        let token = CancellationToken::new();
        let listener = ShutdownListener::install()?;
        let waiting = tokio::spawn(listener.wait(token.clone()));

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()?;
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), token.cancelled()).await?;
        waiting.await?;
        Ok(())
    }
}
