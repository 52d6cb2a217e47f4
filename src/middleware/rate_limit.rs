use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{broadcast, Mutex};

use crate::config::RateLimitConfig;
use crate::response::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
struct WindowEntry {
    count: u64,
    window_start: Instant,
}

/// Fixed-window per-IP counter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window_secs: u64,
    max_requests: u64,
    entries: Arc<Mutex<HashMap<IpAddr, WindowEntry>>>,
}

#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: u64,
    pub retry_after_secs: u64,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window_secs: config.window_secs,
            max_requests: config.max_requests,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn check(&self, ip: IpAddr) -> RateLimitResult {
        let now = Instant::now();
        let mut map = self.entries.lock().await;

        let entry = map.entry(ip).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= self.window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        let allowed = entry.count < self.max_requests;
        if allowed {
            entry.count += 1;
        }

        let elapsed = now.duration_since(entry.window_start).as_secs();
        let retry_after_secs = self.window_secs.saturating_sub(elapsed);
        let reset_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            + retry_after_secs;

        RateLimitResult {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_at,
            retry_after_secs,
        }
    }

    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut map = self.entries.lock().await;
        let before = map.len();
        map.retain(|_, value| {
            now.duration_since(value.window_start).as_secs() <= self.window_secs * 2
        });
        before - map.len()
    }
}

/// General API limiter plus a stricter one for access-code attempts.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub api: RateLimiter,
    pub unlock: RateLimiter,
}

impl RateLimitState {
    pub fn new(api: &RateLimitConfig, unlock: &RateLimitConfig) -> Self {
        Self {
            api: RateLimiter::new(api),
            unlock: RateLimiter::new(unlock),
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let ip = extract_client_ip(req.headers(), state.config().trust_proxy);
    let result = state.rate_limit().api.check(ip).await;

    if !result.allowed {
        let mut response = AppError::too_many_requests("Too many requests").into_response();
        apply_rate_limit_headers(&mut response, &result);
        return response;
    }

    let mut response = next.run(req).await;
    apply_rate_limit_headers(&mut response, &result);
    response
}

/// Count one access-code attempt for the caller.
pub async fn check_unlock_attempt(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let ip = extract_client_ip(headers, state.config().trust_proxy);
    let result = state.rate_limit().unlock.check(ip).await;
    if result.allowed {
        Ok(())
    } else {
        tracing::warn!(
            %ip,
            retry_after_secs = result.retry_after_secs,
            "Unlock attempts rate limited"
        );
        Err(AppError::too_many_requests(
            "Too many unlock attempts, please wait before trying again",
        ))
    }
}

fn apply_rate_limit_headers(response: &mut Response, result: &RateLimitResult) {
    let headers = response.headers_mut();
    if let Ok(v) = result.limit.to_string().parse() {
        headers.insert("ratelimit-limit", v);
    }
    if let Ok(v) = result.remaining.to_string().parse() {
        headers.insert("ratelimit-remaining", v);
    }
    if let Ok(v) = result.reset_at.to_string().parse() {
        headers.insert("ratelimit-reset", v);
    }
    if !result.allowed {
        if let Ok(v) = result.retry_after_secs.to_string().parse() {
            headers.insert("retry-after", v);
        }
    }
}

pub fn extract_client_ip(headers: &HeaderMap, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            if let Some(first) = forwarded.split(',').next() {
                if let Ok(ip) = first.trim().parse() {
                    return ip;
                }
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<IpAddr>().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

pub async fn rate_limit_cleanup_loop(
    limits: Arc<RateLimitState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(300));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let pruned = limits.api.cleanup().await + limits.unlock.cleanup().await;
                if pruned > 0 {
                    tracing::debug!(pruned, "rate limit buckets pruned");
                }
            }
            _ = shutdown_rx.recv() => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window_secs: 60,
            max_requests,
        })
    }

    #[tokio::test]
    async fn within_limit_is_allowed() {
        let limiter = limiter(2);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(limiter.check(ip).await.allowed);
        let second = limiter.check(ip).await;
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);
        assert!(!limiter.check(ip).await.allowed);
    }

    #[tokio::test]
    async fn limits_are_per_ip() {
        let limiter = limiter(1);
        assert!(limiter.check("10.0.0.1".parse().unwrap()).await.allowed);
        assert!(limiter.check("10.0.0.2".parse().unwrap()).await.allowed);
        assert!(!limiter.check("10.0.0.1".parse().unwrap()).await.allowed);
    }

    #[tokio::test]
    async fn cleanup_keeps_fresh_windows() {
        let limiter = limiter(5);
        limiter.check(IpAddr::V4(Ipv4Addr::LOCALHOST)).await;
        assert_eq!(limiter.cleanup().await, 0);
    }

    #[test]
    fn extract_ip_fallbacks() {
        let headers = HeaderMap::new();
        let ip = extract_client_ip(&headers, false);
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn forwarded_for_only_when_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(
            extract_client_ip(&headers, true),
            "203.0.113.9".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            extract_client_ip(&headers, false),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
    }
}
