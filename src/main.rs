use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use ecommerce_api::{
    AppState, app,
    config::Config,
    database::{MemoryStore, PgStore},
    middleware::RateLimiter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env();

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置数据存储
    let state = match config.database_url.clone() {
        Some(database_url) => {
            let store = PgStore::connect(&config, &database_url)
                .await
                .expect("Failed to connect to Postgres");
            if config.run_migrations {
                store.migrate().await.expect("Failed to run migrations");
                tracing::info!("Database migrations applied");
            }
            AppState::with_store(Arc::new(store), config.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
            AppState::with_store(Arc::new(MemoryStore::new()), config.clone())
        }
    };

    // 设置限流器
    let state = match RateLimiter::from_config(&config).expect("Failed to create Redis client") {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled");
            state.with_rate_limiter(limiter)
        }
        None => {
            tracing::info!("REDIS_URL not set, rate limiting disabled");
            state
        }
    };

    let router = app(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
