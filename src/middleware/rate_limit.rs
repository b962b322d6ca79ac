use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;

use crate::{config::Config, error::AppError};

/// 基于 Redis 的固定窗口限流，按客户端 IP 计数
#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    window_secs: u64,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(redis: redis::Client, config: &Config) -> Self {
        Self {
            redis: Arc::new(redis),
            window_secs: config.rate_limit_window().as_secs(),
            max_requests: config.rate_limit_requests,
        }
    }

    pub fn from_config(config: &Config) -> Result<Option<Self>, redis::RedisError> {
        config
            .redis_url
            .as_deref()
            .map(|url| redis::Client::open(url).map(|client| Self::new(client, config)))
            .transpose()
    }

    pub async fn check_rate_limit(&self, req: Request<Body>, next: Next) -> Result<Response, AppError> {
        let ip = client_ip(&req);
        tracing::debug!("rate limit check for ip: {}", ip);

        let key = format!("rate_limit:{}", ip);
        let mut conn = self
            .redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("redis connection failed: {e}")))?;

        // 使用 Redis 的 INCR 和 EXPIRE 命令实现计数器
        let count: u32 = conn
            .incr(&key, 1)
            .await
            .map_err(|e| AppError::Internal(format!("redis INCR failed: {e}")))?;

        if count == 1 {
            let _: () = conn
                .expire(&key, self.window_secs as i64)
                .await
                .map_err(|e| AppError::Internal(format!("redis EXPIRE failed: {e}")))?;
        }

        if count > self.max_requests {
            tracing::warn!(%ip, count, "Rate limit exceeded");
            return Err(AppError::RateLimited(self.window_secs));
        }

        Ok(next.run(req).await)
    }
}

/// `x-real-ip`, then the first `x-forwarded-for` entry, then the socket address.
fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    limiter.check_rate_limit(req, next).await
}
