/// Compute Engine REST API 线上类型
///
/// 只声明本服务用到的字段，其余字段反序列化时忽略

use std::collections::BTreeMap;

use serde::Deserialize;

/// 实例聚合列表响应
///
/// items 的键形如 "zones/us-central1-a"，使用 BTreeMap 保证稳定顺序
#[derive(Debug, Default, Deserialize)]
pub struct AggregatedListResponse {
    #[serde(default)]
    pub items: BTreeMap<String, InstancesScopedList>,
}

/// 按可用区分组的实例列表
///
/// 没有实例的可用区只带 warning，不带 instances 字段
#[derive(Debug, Default, Deserialize)]
pub struct InstancesScopedList {
    #[serde(default)]
    pub instances: Vec<Instance>,
}

/// Compute Engine 实例
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// 完整资源 URL，展示时取最后一段
    #[serde(default)]
    pub machine_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
}

/// 实例网络接口
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(rename = "networkIP")]
    pub network_ip: Option<String>,
    #[serde(default)]
    pub access_configs: Vec<AccessConfig>,
}

/// 访问配置（外网 IP 挂在这里）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    #[serde(rename = "natIP")]
    pub nat_ip: Option<String>,
}

/// 可用区操作（start/stop 返回）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub status: String,
    pub error: Option<OperationError>,
}

/// 操作级错误
#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationErrorDetail {
    #[serde(default)]
    pub message: String,
}

/// 非 2xx 响应的错误信封
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// 取资源路径最后一段（"zones/us-central1-a" -> "us-central1-a"）
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
