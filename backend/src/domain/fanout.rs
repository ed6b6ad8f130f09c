//! Fan-out worker applying feed deliveries off the request path.
//!
//! The worker owns retry policy (jittered exponential backoff per delivery)
//! and failure isolation: a delivery that exhausts its attempts is logged
//! and dropped without blocking the deliveries behind it. At-least-once
//! processing is safe because feed appends deduplicate by message id.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::feed::FeedAppend;
use super::ports::{FanoutDelivery, FeedRepository};

/// Worker configuration controlling retry behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutWorkerConfig {
    /// Maximum append attempts per delivery (including the first).
    pub max_attempts: u32,
    /// Initial retry backoff.
    pub initial_backoff: Duration,
    /// Maximum retry backoff cap.
    pub max_backoff: Duration,
}

impl Default for FanoutWorkerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Async clock-independent sleeping abstraction for retries.
#[async_trait]
pub trait DeliverySleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the Tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl DeliverySleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry backoff jitter abstraction.
pub trait BackoffJitter: Send + Sync {
    /// Return a jittered delay from the exponential base delay.
    fn jittered_delay(&self, base: Duration, attempt: u32) -> Duration;
}

/// Half-jitter: the base delay is kept, the other half is randomised, so
/// concurrent retries spread out without collapsing below a useful floor.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl BackoffJitter for RandomJitter {
    fn jittered_delay(&self, base: Duration, _attempt: u32) -> Duration {
        let half = base / 2;
        let mut rng = SmallRng::from_entropy();
        let jitter_ms = rng.gen_range(0..=half.as_millis().max(1));
        half + Duration::from_millis(u64::try_from(jitter_ms).unwrap_or(u64::MAX))
    }
}

/// Worker consuming fan-out deliveries and applying them to feed caches.
pub struct FanoutWorker {
    feeds: Arc<dyn FeedRepository>,
    sleeper: Arc<dyn DeliverySleeper>,
    jitter: Arc<dyn BackoffJitter>,
    config: FanoutWorkerConfig,
}

impl FanoutWorker {
    /// Build a worker using the production sleeper and jitter.
    pub fn new(feeds: Arc<dyn FeedRepository>, config: FanoutWorkerConfig) -> Self {
        Self::with_runtime(
            feeds,
            Arc::new(TokioSleeper),
            Arc::new(RandomJitter),
            config,
        )
    }

    /// Build a worker with injected runtime abstractions (tests).
    pub fn with_runtime(
        feeds: Arc<dyn FeedRepository>,
        sleeper: Arc<dyn DeliverySleeper>,
        jitter: Arc<dyn BackoffJitter>,
        config: FanoutWorkerConfig,
    ) -> Self {
        Self {
            feeds,
            sleeper,
            jitter,
            config,
        }
    }

    /// Consume deliveries until the channel closes.
    ///
    /// Deliveries are applied sequentially per worker; spawn one task per
    /// worker. Per-recipient ordering does not depend on arrival order
    /// (the feed store inserts by timestamp), so a single worker is correct
    /// and more workers only add throughput.
    pub async fn run(&self, mut deliveries: mpsc::UnboundedReceiver<FanoutDelivery>) {
        while let Some(delivery) = deliveries.recv().await {
            self.deliver(delivery).await;
        }
        debug!("fan-out channel closed; worker exiting");
    }

    /// Apply one delivery, retrying transient feed store failures.
    pub async fn deliver(&self, delivery: FanoutDelivery) {
        let recipient = delivery.recipient;
        let message_id = delivery.entry.message_id;
        let mut attempt: u32 = 1;
        loop {
            match self
                .feeds
                .append(&recipient, delivery.entry.clone())
                .await
            {
                Ok(FeedAppend::Appended) => {
                    debug!(%recipient, %message_id, attempt, "fan-out delivery applied");
                    return;
                }
                Ok(FeedAppend::Duplicate) => {
                    debug!(%recipient, %message_id, "duplicate fan-out delivery ignored");
                    return;
                }
                Err(err) if attempt >= self.config.max_attempts => {
                    error!(
                        %recipient,
                        %message_id,
                        attempts = attempt,
                        error = %err,
                        "fan-out delivery abandoned"
                    );
                    return;
                }
                Err(err) => {
                    let delay = self.jitter.jittered_delay(self.backoff_base(attempt), attempt);
                    warn!(
                        %recipient,
                        %message_id,
                        attempt,
                        error = %err,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "fan-out delivery failed; retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn backoff_base(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1).min(16));
        self.config
            .initial_backoff
            .saturating_mul(factor)
            .min(self.config.max_backoff)
    }
}
