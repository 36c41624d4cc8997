//! Per-client sliding-window rate limiting.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::ApiError;
use crate::server::AppState;

/// Sliding-window limiter keyed by an arbitrary client identifier.
///
/// Each key keeps the instants of its accepted requests inside the window.
/// Expired instants are dropped on every check, and keys left with no
/// instants are evicted so idle clients do not accumulate.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self { max_requests, window, clients: Mutex::new(HashMap::new()) }
    }

    /// Record a request for `key` if it is within budget.
    ///
    /// Returns the time until the next request would be admitted when the
    /// budget is exhausted.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now()).await
    }

    pub async fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut clients = self.clients.lock().await;
        let window = self.window;
        clients.retain(|_, hits| {
            prune(hits, now, window);
            !hits.is_empty()
        });

        let hits = clients.entry(key.to_string()).or_default();
        if hits.len() >= self.max_requests {
            return Err(self.wait_for(hits, now));
        }
        hits.push_back(now);
        Ok(())
    }

    /// Time until `key` may make another request, without recording one.
    #[cfg(test)]
    async fn remaining_time_at(&self, key: &str, now: Instant) -> Duration {
        let mut clients = self.clients.lock().await;
        let Some(hits) = clients.get_mut(key) else {
            return Duration::ZERO;
        };
        prune(hits, now, self.window);
        if hits.len() < self.max_requests { Duration::ZERO } else { self.wait_for(hits, now) }
    }

    /// Number of clients currently holding unexpired requests.
    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn wait_for(&self, hits: &VecDeque<Instant>, now: Instant) -> Duration {
        hits.front()
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or(Duration::ZERO)
    }
}

fn prune(hits: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while hits.front().is_some_and(|t| now.saturating_duration_since(*t) >= window) {
        hits.pop_front();
    }
}

/// Identify the caller: first `X-Forwarded-For` hop, else the peer address.
pub fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Axum middleware rejecting over-budget clients with 429.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(limiter) = state.limiter.as_deref() else {
        return next.run(request).await;
    };

    let key = client_key(&request);
    match limiter.check(&key).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!(client = %key, retry_after_ms = retry_after.as_millis() as u64, "rate limit exceeded");
            ApiError::RateLimited { retry_after }.into_response()
        }
    }
}
