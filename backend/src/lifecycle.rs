//! Start-up and shutdown hooks around the HTTP server.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::AppState;
use crate::error::Result;
use crate::services::bootstrap_service::{provision_bootstrap_user, BootstrapOutcome};
use crate::services::queue_consumer::{MessageSource, QueueConsumer};

/// Background work owned by the running process.
#[derive(Default)]
pub struct Lifecycle {
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when `on_shutdown` runs.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Provision the bootstrap user and start the queue consumer.
    ///
    /// Without a message source the consumer is not started.
    pub async fn on_init(
        &mut self,
        state: &AppState,
        source: Option<Arc<dyn MessageSource>>,
    ) -> Result<()> {
        if let BootstrapOutcome::Created(user) =
            provision_bootstrap_user(&state.users, &state.config).await?
        {
            tracing::info!(user_id = %user.id, "Created user {}", user.email);
        }

        match source {
            Some(source) => {
                let consumer = QueueConsumer::new(source, &state.config);
                let token = self.shutdown.clone();
                self.tasks.push(tokio::spawn(async move {
                    let stats = consumer.run(token).await;
                    tracing::debug!(
                        batches = stats.batches,
                        messages = stats.messages,
                        errors = stats.errors,
                        "queue consumer stopped"
                    );
                }));
            }
            None => tracing::warn!("SQS_QUEUE_URL is not set, queue consumer disabled"),
        }

        Ok(())
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn on_shutdown(self) {
        tracing::info!("shutdown..");
        self.shutdown.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::error!("background task failed: {}", e);
            }
        }
        tracing::info!("shutdown done");
    }
}

/// Resolves on SIGINT, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db;
    use crate::services::queue_consumer::QueueMessage;
    use crate::telemetry::capture::CapturedLogs;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MessageSource for CountingSource {
        async fn receive(&self, _: i32, _: i32) -> Result<Vec<QueueMessage>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(Vec::new())
        }
    }

    async fn state(vars: &[(&str, &str)]) -> AppState {
        let config = Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap();
        let pool = db::create_pool("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        AppState::new(config, pool)
    }

    #[tokio::test]
    async fn test_init_creates_bootstrap_user() {
        let state = state(&[("USER_EMAIL", "boot@example.com"), ("USER_PASSWORD", "pw")]).await;
        let mut lifecycle = Lifecycle::new();
        lifecycle.on_init(&state, None).await.unwrap();

        let user = state
            .users
            .find_by_email("boot@example.com")
            .await
            .unwrap()
            .expect("bootstrap user should exist");
        assert!(user.is_verified);
        assert!(!user.is_superuser);

        lifecycle.on_shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_consumer() {
        let state = state(&[]).await;
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });

        let mut lifecycle = Lifecycle::new();
        let token = lifecycle.shutdown_token();
        let dyn_source: Arc<dyn MessageSource> = source.clone();
        lifecycle.on_init(&state, Some(dyn_source)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        tokio::time::timeout(Duration::from_secs(5), lifecycle.on_shutdown())
            .await
            .expect("shutdown should not hang");
        assert!(token.is_cancelled());
        assert!(source.calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_shutdown_log_order() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let state = state(&[]).await;
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let dyn_source: Arc<dyn MessageSource> = source;

        let mut lifecycle = Lifecycle::new();
        lifecycle.on_init(&state, Some(dyn_source)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        lifecycle.on_shutdown().await;

        let begin = logs.position("shutdown..").expect("shutdown start not logged");
        let poller = logs.position("sqs_poller done").expect("consumer exit not logged");
        let end = logs.position("shutdown done").expect("shutdown end not logged");
        assert!(begin < poller && poller < end, "unexpected order: {:?}", logs.lines());
    }
}
