//! Rate limiting middleware
//!
//! Token bucket rate limiter keyed by client IP. Each IP starts with a full
//! bucket of `requests_per_minute` tokens that refills continuously.

use std::{
    collections::HashMap,
    future::Future,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, Request},
    response::{IntoResponse, Response},
};
use tokio::{sync::RwLock, time::Instant};
use tower::{Layer, Service};
use tracing::debug;

use crate::error::ApiError;

/// Rate limiter configuration
#[derive(Clone, Debug)]
pub struct RateLimiterConfig {
    /// Bucket size and refill per minute
    pub requests_per_minute: u32,
    /// Enable rate limiting
    pub enabled: bool,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            enabled: true,
        }
    }
}

/// Token bucket entry for a single IP
#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(max_tokens: f64) -> Self {
        Self {
            tokens: max_tokens,
            last_update: Instant::now(),
        }
    }

    /// Refill for the elapsed time, then take one token if available
    fn try_consume(&mut self, tokens_per_second: f64, max_tokens: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = elapsed
            .mul_add(tokens_per_second, self.tokens)
            .min(max_tokens);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Shared rate limiter state
#[derive(Debug)]
pub struct RateLimiterState {
    buckets: RwLock<HashMap<IpAddr, TokenBucket>>,
    tokens_per_second: f64,
    max_tokens: f64,
}

impl RateLimiterState {
    /// Create a new rate limiter state
    #[must_use]
    pub fn new(requests_per_minute: u32) -> Self {
        let max_tokens = f64::from(requests_per_minute.max(1));
        Self {
            buckets: RwLock::new(HashMap::new()),
            tokens_per_second: max_tokens / 60.0,
            max_tokens,
        }
    }

    /// Check if a request from the given IP is allowed
    pub async fn check(&self, ip: IpAddr) -> bool {
        let mut buckets = self.buckets.write().await;
        buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.max_tokens))
            .try_consume(self.tokens_per_second, self.max_tokens)
    }

    /// Drop buckets idle for longer than `older_than`
    pub async fn cleanup(&self, older_than: Duration) -> usize {
        let mut buckets = self.buckets.write().await;
        let before = buckets.len();
        let cutoff = Instant::now()
            .checked_sub(older_than)
            .unwrap_or_else(Instant::now);

        buckets.retain(|_, bucket| bucket.last_update > cutoff);
        before - buckets.len()
    }

    /// Number of tracked client IPs
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.read().await.len()
    }
}

/// Layer that applies rate limiting
#[derive(Clone, Debug)]
pub struct RateLimiterLayer {
    state: Arc<RateLimiterState>,
    enabled: bool,
    excluded_paths: Vec<String>,
}

impl RateLimiterLayer {
    /// Create a new rate limiter layer; the health endpoint is never limited
    #[must_use]
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            state: Arc::new(RateLimiterState::new(config.requests_per_minute)),
            enabled: config.enabled,
            excluded_paths: vec!["/api/v1/health".to_string()],
        }
    }

    /// Get a reference to the rate limiter state for cleanup tasks
    #[must_use]
    pub fn state(&self) -> Arc<RateLimiterState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            state: Arc::clone(&self.state),
            enabled: self.enabled,
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Middleware service for rate limiting
#[derive(Clone, Debug)]
pub struct RateLimiter<S> {
    inner: S,
    state: Arc<RateLimiterState>,
    enabled: bool,
    excluded_paths: Vec<String>,
}

impl<S> Service<Request> for RateLimiter<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let enabled = self.enabled;
        let state = Arc::clone(&self.state);
        let excluded = self
            .excluded_paths
            .iter()
            .any(|p| req.uri().path().starts_with(p.as_str()));
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if !enabled || excluded {
                return inner.call(req).await;
            }

            let client_ip = extract_client_ip(&req);
            if state.check(client_ip).await {
                inner.call(req).await
            } else {
                debug!(client_ip = %client_ip, "Rate limit exceeded");
                Ok(ApiError::RateLimited.into_response())
            }
        })
    }
}

/// First `X-Forwarded-For` entry, then the peer address, then localhost
fn extract_client_ip(req: &Request) -> IpAddr {
    if let Some(ip) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
    {
        return ip;
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::LOCALHOST), |info| info.0.ip())
}
