/// 虚拟机管理接口

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use common::models::{VmResponse, VmStatus};

use crate::app_state::AppState;
use crate::services::vm_service::VmService;

/// API 错误响应
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<common::Error> for ApiError {
    fn from(err: common::Error) -> Self {
        match err {
            common::Error::InvalidArgument(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// 电源切换查询参数
///
/// current_status 无法解析为三种状态之一时，axum 直接以 400 拒绝
#[derive(Debug, Deserialize)]
pub struct TogglePowerQuery {
    pub zone: String,
    pub current_status: VmStatus,
}

/// 连接命令查询参数
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub zone: String,
    pub ip_external: Option<String>,
}

/// 电源操作响应
#[derive(Debug, Serialize)]
pub struct PowerResponse {
    pub mensaje: String,
}

/// 连接命令响应
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub mensaje: String,
    pub comando_ssh: String,
}

/// VM 路由
pub fn vm_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vms))
        .route("/:vm_name/toggle_power", post(toggle_power))
        .route("/:vm_name/connect", post(connect_vm))
}

/// 获取虚拟机列表
///
/// GET /api/vms
async fn list_vms(State(state): State<AppState>) -> Result<Json<Vec<VmResponse>>, ApiError> {
    let service = VmService::new(state.clone());
    let vms = service.list_vms().await?;

    Ok(Json(vms))
}

/// 切换虚拟机电源
///
/// POST /api/vms/:vm_name/toggle_power?zone=xxx&current_status=Running
async fn toggle_power(
    State(state): State<AppState>,
    Path(vm_name): Path<String>,
    Query(query): Query<TogglePowerQuery>,
) -> Result<Json<PowerResponse>, ApiError> {
    let service = VmService::new(state.clone());
    let mensaje = service
        .toggle_power(&vm_name, &query.zone, query.current_status)
        .await?;

    Ok(Json(PowerResponse { mensaje }))
}

/// 生成虚拟机 SSH 连接命令
///
/// POST /api/vms/:vm_name/connect?zone=xxx&ip_external=yyy
async fn connect_vm(
    State(state): State<AppState>,
    Path(vm_name): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let service = VmService::new(state.clone());
    let cmd = service.connect(&vm_name, &query.zone, query.ip_external.as_deref());

    Ok(Json(ConnectResponse {
        mensaje: cmd.mensaje,
        comando_ssh: cmd.comando_ssh,
    }))
}
