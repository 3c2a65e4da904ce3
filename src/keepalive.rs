use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Periodically calls the service's own health endpoint so hosting
/// platforms that idle out quiet services keep it running.
///
/// The task is owned by the process lifecycle: [`KeepAlive::start`] at boot,
/// [`KeepAlive::stop`] at shutdown. Failures are logged and never stop the
/// loop.
pub struct KeepAlive {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl KeepAlive {
    /// Spawn the ping loop. The first ping happens one `interval` after start.
    pub fn start(client: reqwest::Client, url: String, interval: Duration) -> Self {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        tracing::info!("Keep-alive pinging {} every {:?}", url, interval);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => ping(&client, &url).await,
                }
            }

            tracing::info!("Keep-alive stopped");
        });

        Self { shutdown, handle }
    }

    /// Signal the loop to exit and wait for it.
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("Keep-alive task ended abnormally: {e}");
        }
    }
}

async fn ping(client: &reqwest::Client, url: &str) {
    let result = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status());

    match result {
        Ok(response) => match response.text().await {
            Ok(body) => tracing::info!("Ping successful: {}", body),
            Err(e) => tracing::warn!("Ping body unreadable: {e}"),
        },
        Err(e) => tracing::warn!("Ping failed: {e}"),
    }
}
