//! Assemble application state from configuration.
//!
//! With a database pool the Diesel adapters back every port; without one the
//! in-memory stores do, which is the local-development mode.

use std::sync::Arc;

use chirp::domain::ports::FanoutDelivery;
use chirp::domain::{AccountService, FanoutWorker, FanoutWorkerConfig, TimelineService};
use chirp::inbound::http::state::HttpState;
use chirp::outbound::password::Argon2PasswordHasher;
use chirp::outbound::persistence::{
    DbPool, DieselFeedRepository, DieselFollowGraph, DieselMessageStore, DieselUserRepository,
};
use chirp::outbound::queue::fanout_channel;
use mockable::DefaultClock;
use tokio::sync::mpsc;

use super::ServerConfig;

/// Application state plus the fan-out worker it feeds.
pub(crate) struct AppState {
    pub(crate) http_state: HttpState,
    pub(crate) worker: FanoutWorker,
    pub(crate) deliveries: mpsc::UnboundedReceiver<FanoutDelivery>,
}

/// Build the application state according to the configuration.
pub(crate) fn build_app_state(config: &ServerConfig) -> AppState {
    match &config.db_pool {
        Some(pool) => build_database_state(pool.clone()),
        None => {
            let (http_state, worker, deliveries) = HttpState::in_memory();
            AppState {
                http_state,
                worker,
                deliveries,
            }
        }
    }
}

fn build_database_state(pool: DbPool) -> AppState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let follows = Arc::new(DieselFollowGraph::new(pool.clone()));
    let messages = Arc::new(DieselMessageStore::new(pool.clone()));
    let feeds = Arc::new(DieselFeedRepository::new(pool));
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
    AppState {
        http_state: HttpState::new(Arc::new(accounts), Arc::new(timelines)),
        worker,
        deliveries,
    }
}
