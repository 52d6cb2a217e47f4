use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_FORGOTTEN_REQUEUE_DEPTH, DEFAULT_GRADUATION_LEVEL, DEFAULT_MAX_ACTIVE_SESSIONS,
    DEFAULT_SESSION_IDLE_TTL_SECS, DEFAULT_VISIBLE_WINDOW,
};
use crate::deck::ProgressionPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub trust_proxy: bool,
    pub rate_limit: RateLimitConfig,
    pub unlock_rate_limit: RateLimitConfig,
    pub session: SessionConfig,
    pub worker: WorkerConfig,
    pub tts: TtsConfig,
    pub deck: DeckPolicyConfig,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub idle_ttl_secs: u64,
    pub max_active: usize,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub is_leader: bool,
}

#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub enabled: bool,
    pub mock: bool,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DeckPolicyConfig {
    pub graduation_level: u32,
    pub forgotten_requeue_depth: usize,
    pub visible_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: DEFAULT_SESSION_IDLE_TTL_SECS,
            max_active: DEFAULT_MAX_ACTIVE_SESSIONS,
        }
    }
}

impl Default for DeckPolicyConfig {
    fn default() -> Self {
        Self {
            graduation_level: DEFAULT_GRADUATION_LEVEL,
            forgotten_requeue_depth: DEFAULT_FORGOTTEN_REQUEUE_DEPTH,
            visible_window: DEFAULT_VISIBLE_WINDOW,
        }
    }
}

impl DeckPolicyConfig {
    pub fn policy(&self) -> ProgressionPolicy {
        ProgressionPolicy {
            graduation_level: self.graduation_level.max(1),
            forgotten_requeue_depth: self.forgotten_requeue_depth,
            visible_window: self.visible_window.max(1),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            trust_proxy: env_or_bool("TRUST_PROXY", false),
            rate_limit: RateLimitConfig {
                window_secs: env_or_parse("RATE_LIMIT_WINDOW_SECS", 900_u64),
                max_requests: env_or_parse("RATE_LIMIT_MAX", 1000_u64),
            },
            unlock_rate_limit: RateLimitConfig {
                window_secs: env_or_parse("UNLOCK_RATE_LIMIT_WINDOW_SECS", 900_u64),
                max_requests: env_or_parse("UNLOCK_RATE_LIMIT_MAX", 30_u64),
            },
            session: SessionConfig {
                idle_ttl_secs: env_or_parse("SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS),
                max_active: env_or_parse("SESSION_MAX_ACTIVE", DEFAULT_MAX_ACTIVE_SESSIONS),
            },
            worker: WorkerConfig {
                is_leader: env_or_bool("WORKER_LEADER", true),
            },
            tts: TtsConfig {
                enabled: env_or_bool("TTS_ENABLED", false),
                mock: env_or_bool("TTS_MOCK", true),
                api_url: env_or("TTS_API_URL", ""),
                timeout_secs: env_or_parse("TTS_TIMEOUT_SECS", 10_u64),
            },
            deck: DeckPolicyConfig {
                graduation_level: env_or_parse("DECK_GRADUATION_LEVEL", DEFAULT_GRADUATION_LEVEL),
                forgotten_requeue_depth: env_or_parse(
                    "DECK_FORGOTTEN_REQUEUE_DEPTH",
                    DEFAULT_FORGOTTEN_REQUEUE_DEPTH,
                ),
                visible_window: env_or_parse("DECK_VISIBLE_WINDOW", DEFAULT_VISIBLE_WINDOW),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "HOST",
            "PORT",
            "RUST_LOG",
            "RATE_LIMIT_MAX",
            "TTS_ENABLED",
            "TTS_MOCK",
            "TTS_TIMEOUT_SECS",
            "DECK_GRADUATION_LEVEL",
            "DECK_FORGOTTEN_REQUEUE_DEPTH",
            "DECK_VISIBLE_WINDOW",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.rate_limit.max_requests, 1000);
        assert!(!cfg.tts.enabled);
        assert_eq!(cfg.deck.policy(), ProgressionPolicy::default());
    }

    #[test]
    fn parses_numeric_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "4000");
        env::set_var("TTS_TIMEOUT_SECS", "3");
        env::set_var("DECK_FORGOTTEN_REQUEUE_DEPTH", "8");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.tts.timeout_secs, 3);
        assert_eq!(cfg.deck.policy().forgotten_requeue_depth, 8);
        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "bad");
        env::set_var("DECK_GRADUATION_LEVEL", "-1");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.deck.graduation_level, DEFAULT_GRADUATION_LEVEL);
        clear_keys(managed_keys());
    }

    #[test]
    fn degenerate_policy_values_are_clamped() {
        let cfg = DeckPolicyConfig {
            graduation_level: 0,
            forgotten_requeue_depth: 0,
            visible_window: 0,
        };
        let policy = cfg.policy();
        assert_eq!(policy.graduation_level, 1);
        assert_eq!(policy.visible_window, 1);
        assert_eq!(policy.forgotten_requeue_depth, 0);
    }

    #[test]
    fn feature_flags_isolation() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("TTS_ENABLED", "true");
        env::set_var("TTS_MOCK", "off");

        let cfg = Config::from_env();
        assert!(cfg.tts.enabled);
        assert!(!cfg.tts.mock);
        clear_keys(managed_keys());
    }
}
