use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::deck::{Catalog, ProgressionPolicy};
use crate::middleware::rate_limit::RateLimitState;
use crate::services::pronunciation::Pronouncer;
use crate::services::tts_provider::TtsProvider;
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<SessionStore>,
    catalog: &'static Catalog,
    pronouncer: Arc<Pronouncer>,
    policy: ProgressionPolicy,
    rate_limit: Arc<RateLimitState>,
    config: Arc<Config>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<SessionStore>,
        catalog: &'static Catalog,
        config: &Config,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Self {
        let pronouncer = Arc::new(Pronouncer::new(TtsProvider::new(&config.tts)));
        let rate_limit = Arc::new(RateLimitState::new(
            &config.rate_limit,
            &config.unlock_rate_limit,
        ));

        Self {
            store,
            catalog,
            pronouncer,
            policy: config.deck.policy(),
            rate_limit,
            config: Arc::new(config.clone()),
            shutdown_tx,
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn pronouncer(&self) -> &Pronouncer {
        &self.pronouncer
    }

    pub fn policy(&self) -> &ProgressionPolicy {
        &self.policy
    }

    pub fn rate_limit(&self) -> &Arc<RateLimitState> {
        &self.rate_limit
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
