use std::sync::Arc;

use axum::Router;
use tokio::sync::broadcast;

use flashcard_study::config::{
    Config, DeckPolicyConfig, RateLimitConfig, SessionConfig, TtsConfig, WorkerConfig,
};
use flashcard_study::deck::Catalog;
use flashcard_study::routes::build_router;
use flashcard_study::state::AppState;
use flashcard_study::store::SessionStore;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

/// Knobs the integration tests vary; everything else is fixed.
#[derive(Debug, Clone)]
pub struct TestOptions {
    pub api_limit: u64,
    pub unlock_limit: u64,
    pub max_sessions: usize,
    pub tts: TtsConfig,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            api_limit: 1000,
            unlock_limit: 100,
            max_sessions: 100,
            tts: TtsConfig {
                enabled: false,
                mock: true,
                api_url: String::new(),
                timeout_secs: 2,
            },
        }
    }
}

pub fn test_config(options: &TestOptions) -> Config {
    // 直接构造 Config，避免 set_var 在多线程测试里互相干扰
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        trust_proxy: false,
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: options.api_limit,
        },
        unlock_rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: options.unlock_limit,
        },
        session: SessionConfig {
            idle_ttl_secs: 3600,
            max_active: options.max_sessions,
        },
        worker: WorkerConfig { is_leader: false },
        tts: options.tts.clone(),
        deck: DeckPolicyConfig::default(),
    }
}

pub async fn spawn_with(options: TestOptions) -> TestApp {
    let config = test_config(&options);
    let store = Arc::new(SessionStore::new(&config.session));
    let (shutdown_tx, _) = broadcast::channel::<()>(8);

    let state = AppState::new(store, Catalog::builtin(), &config, shutdown_tx);
    let app = build_router(state.clone());

    TestApp { app, state, config }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with(TestOptions::default()).await
}

pub async fn spawn_test_server_with_limits(api_limit: u64, unlock_limit: u64) -> TestApp {
    spawn_with(TestOptions {
        api_limit,
        unlock_limit,
        ..TestOptions::default()
    })
    .await
}
