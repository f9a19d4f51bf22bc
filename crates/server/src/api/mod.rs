pub mod vms;

use axum::Router;

use crate::app_state::AppState;

/// 所有 API 路由（统一入口）
///
/// 该边界上没有认证、授权和限流
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/vms", vms::vm_routes())
}
