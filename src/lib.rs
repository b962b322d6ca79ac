use std::sync::Arc;

use axum::Router;
use config::Config;
use database::{AddressRepository, CreditCardRepository, UserRepository};
use middleware::{RateLimiter, rate_limit};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub credit_cards: Arc<dyn CreditCardRepository>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
    pub config: Config,
}

impl AppState {
    /// 三个仓储共用同一个存储实现
    pub fn with_store<S>(store: Arc<S>, config: Config) -> Self
    where
        S: UserRepository + AddressRepository + CreditCardRepository + 'static,
    {
        Self {
            users: store.clone(),
            addresses: store.clone(),
            credit_cards: store,
            rate_limiter: None,
            config,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(Arc::new(limiter));
        self
    }
}

/// Builds the full application: routes under `api_base_uri` plus middleware.
pub fn app(state: AppState) -> Router {
    let base_uri = state.config.api_base_uri.clone();
    let router = if base_uri.is_empty() {
        routes::router()
    } else {
        Router::new().nest(&base_uri, routes::router())
    };

    // 请求日志；5xx 的细节由 AppError 自己记录
    let router = router.layer(TraceLayer::new_for_http());

    let router = match state.rate_limiter.clone() {
        Some(limiter) => router.layer(axum::middleware::from_fn_with_state(limiter, rate_limit)),
        None => router,
    };

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
