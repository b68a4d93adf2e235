//! Background SQS consumer.
//!
//! Long-polls the configured queue and logs every message it receives until
//! the shutdown token is cancelled. Messages are not deleted; they become
//! visible again once their visibility timeout expires.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::error::DisplayErrorContext;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Back-off after a failed receive call.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// A message pulled from the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub id: String,
    pub body: String,
}

/// Something that can hand out batches of queue messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Receive up to `max_messages`, waiting at most `wait_seconds` for the
    /// first one to arrive. An empty batch is a normal outcome.
    async fn receive(&self, max_messages: i32, wait_seconds: i32) -> Result<Vec<QueueMessage>>;
}

/// `MessageSource` backed by Amazon SQS.
pub struct SqsMessageSource {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsMessageSource {
    pub fn new(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    /// Build a client from the default AWS provider chain
    /// (environment, profile, instance metadata).
    pub async fn from_default_chain(queue_url: impl Into<String>) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(aws_sdk_sqs::Client::new(&sdk_config), queue_url)
    }
}

#[async_trait]
impl MessageSource for SqsMessageSource {
    async fn receive(&self, max_messages: i32, wait_seconds: i32) -> Result<Vec<QueueMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_seconds)
            .send()
            .await
            .map_err(|e| AppError::Queue(DisplayErrorContext(e).to_string()))?;

        Ok(output
            .messages()
            .iter()
            .map(|m| QueueMessage {
                id: m.message_id().unwrap_or_default().to_string(),
                body: m.body().unwrap_or_default().to_string(),
            })
            .collect())
    }
}

/// Counters reported when the consumer stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    pub batches: u64,
    pub messages: u64,
    pub errors: u64,
}

/// Polling loop around a `MessageSource`.
pub struct QueueConsumer {
    source: Arc<dyn MessageSource>,
    max_messages: i32,
    wait_seconds: i32,
    retry_delay: Duration,
}

impl QueueConsumer {
    pub fn new(source: Arc<dyn MessageSource>, config: &Config) -> Self {
        Self {
            source,
            max_messages: config.sqs_max_messages,
            wait_seconds: config.sqs_wait_time_seconds,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Poll until `shutdown` is cancelled.
    ///
    /// Receive errors are logged and retried after the back-off; they never
    /// end the loop.
    pub async fn run(self, shutdown: CancellationToken) -> ConsumerStats {
        let mut stats = ConsumerStats::default();

        while !shutdown.is_cancelled() {
            let received = tokio::select! {
                _ = shutdown.cancelled() => break,
                r = self.source.receive(self.max_messages, self.wait_seconds) => r,
            };

            match received {
                Ok(messages) => {
                    stats.batches += 1;
                    for msg in &messages {
                        tracing::info!("Got SQS message: id={} body=\"{}\"", msg.id, msg.body);
                        stats.messages += 1;
                    }
                }
                Err(e) => {
                    stats.errors += 1;
                    tracing::warn!("SQS receive failed, retrying in {:?}: {}", self.retry_delay, e);
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }

        tracing::info!("sqs_poller done");
        stats
    }
}
