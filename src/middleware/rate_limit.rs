use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use schoolhub_config::RateLimitConfig;
use schoolhub_core::AppError;
use tracing::warn;

use crate::metrics::track_rate_limited;
use crate::state::AppState;

const AUTH_PREFIX: &str = "/api/auth";

/// Per client IP token buckets. `/api/auth/*` draws from its own stricter
/// bucket.
#[derive(Clone)]
pub struct RateLimiters {
    enabled: bool,
    general: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    auth: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RateLimiters {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            general: Arc::new(RateLimiter::keyed(config.general_quota())),
            auth: Arc::new(RateLimiter::keyed(config.auth_quota())),
        }
    }

    /// Drops buckets that have refilled completely.
    pub fn retain_recent(&self) {
        self.general.retain_recent();
        self.auth.retain_recent();
    }

    fn check(&self, path: &str, ip: IpAddr) -> Result<(), &'static str> {
        let (bucket, limiter) = if path.starts_with(AUTH_PREFIX) {
            ("auth", &self.auth)
        } else {
            ("general", &self.general)
        };
        limiter.check_key(&ip).map_err(|_| bucket)
    }
}

fn client_ip(req: &Request) -> IpAddr {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !state.limiters.enabled {
        return next.run(req).await;
    }

    let ip = client_ip(&req);
    if let Err(bucket) = state.limiters.check(req.uri().path(), ip) {
        track_rate_limited(bucket);
        warn!(client.ip = %ip, bucket, "Rate limit exceeded");
        return AppError::too_many_requests("Too many requests, please try again later")
            .into_response();
    }

    next.run(req).await
}
