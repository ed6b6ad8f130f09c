//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without real
//! infrastructure behind them.

use std::sync::Arc;

use mockable::DefaultClock;
use tokio::sync::mpsc;

use crate::domain::ports::FanoutDelivery;
use crate::domain::{AccountService, FanoutWorker, FanoutWorkerConfig, TimelineService};
use crate::outbound::memory::{
    MemoryFeedRepository, MemoryFollowGraph, MemoryMessageStore, MemoryUserRepository,
};
use crate::outbound::password::Argon2PasswordHasher;
use crate::outbound::queue::fanout_channel;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login use-cases.
    pub accounts: Arc<AccountService>,
    /// Posting, following, and timeline reads.
    pub timelines: Arc<TimelineService>,
}

impl HttpState {
    /// Construct state from already-wired services.
    pub fn new(accounts: Arc<AccountService>, timelines: Arc<TimelineService>) -> Self {
        Self {
            accounts,
            timelines,
        }
    }

    /// Build a fully in-memory application: state, its fan-out worker, and
    /// the delivery channel the worker consumes.
    ///
    /// Used when no database is configured and by integration tests. The
    /// caller spawns `worker.run(deliveries)` on its runtime; dropping the
    /// state (and with it the queue sender) lets the worker drain and exit.
    pub fn in_memory() -> (
        Self,
        FanoutWorker,
        mpsc::UnboundedReceiver<FanoutDelivery>,
    ) {
        let users = Arc::new(MemoryUserRepository::default());
        let follows = Arc::new(MemoryFollowGraph::default());
        let messages = Arc::new(MemoryMessageStore::default());
        let feeds = Arc::new(MemoryFeedRepository::default());
        let (queue, deliveries) = fanout_channel();

        let accounts = AccountService::new(users.clone(), Arc::new(Argon2PasswordHasher));
        let timelines = TimelineService::new(
            users,
            follows,
            messages,
            feeds.clone(),
            Arc::new(queue),
            Arc::new(DefaultClock),
        );
        let worker = FanoutWorker::new(feeds, FanoutWorkerConfig::default());
        (
            Self::new(Arc::new(accounts), Arc::new(timelines)),
            worker,
            deliveries,
        )
    }
}
