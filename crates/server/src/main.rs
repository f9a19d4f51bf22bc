/// GCP VM Dashboard - Server
///
/// 后端服务器主程序，将 Compute Engine 实例管理代理为 REST API

mod api;
mod app_state;
mod config;
mod gcp;
mod services;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let cfg = config::Config::from_env()?;

    // 初始化日志，RUST_LOG 未设置时回退到配置的日志级别
    tracing_subscriber::fmt()
        .with_target(false)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.log_level.clone())),
        )
        .init();

    info!("🚀 启动 GCP VM Dashboard Server...");
    info!("✅ 配置加载成功，项目: {}", cfg.gcp_project);

    if cfg.gcp_access_token.is_empty() {
        warn!("⚠️ 未设置 GCP_ACCESS_TOKEN / GCP_TOKEN_FILE，对提供商的调用将失败");
    }

    // 设置 CORS，只放行配置的单一来源
    let cors = CorsLayer::new()
        .allow_origin(cfg.cors_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any);

    // 创建应用状态
    let app_state = AppState::new(cfg.clone());

    // 构建应用路由
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // 启动服务器
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server_port));
    info!("🎯 服务器监听在 http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> &'static str {
    "GCP VM Dashboard Server API v1"
}

async fn health_handler() -> &'static str {
    "OK"
}
