/// 共享数据模型
///
/// 定义对前端暴露的 VM 记录与电源操作类型

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// 虚拟机状态
///
/// 对外只暴露三种状态，序列化值与变体名一致（Running/Stopped/Provisioning）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VmStatus {
    Running,
    Stopped,
    Provisioning,
}

impl VmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VmStatus::Running => "Running",
            VmStatus::Stopped => "Stopped",
            VmStatus::Provisioning => "Provisioning",
        }
    }

    /// 从 GCP 实例状态映射
    ///
    /// RUNNING -> Running；PROVISIONING/STAGING -> Provisioning；
    /// 其余状态（TERMINATED、STOPPING、SUSPENDED 等）统一归为 Stopped
    pub fn from_provider(status: &str) -> Self {
        match status {
            "RUNNING" => VmStatus::Running,
            "PROVISIONING" | "STAGING" => VmStatus::Provisioning,
            _ => VmStatus::Stopped,
        }
    }

    /// 根据当前状态推导电源操作
    ///
    /// Running -> Stop，Stopped -> Start；Provisioning 不允许切换
    pub fn power_action(&self) -> Result<PowerAction> {
        match self {
            VmStatus::Running => Ok(PowerAction::Stop),
            VmStatus::Stopped => Ok(PowerAction::Start),
            VmStatus::Provisioning => Err(Error::InvalidArgument(
                "No se puede cambiar el estado de una VM en estado 'Provisioning'.".to_string(),
            )),
        }
    }
}

/// 电源操作
///
/// 按当前状态推导，不落库
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    Start,
    Stop,
}

impl PowerAction {
    /// GCP 实例 API 的操作动词
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Start => "start",
            PowerAction::Stop => "stop",
        }
    }
}

/// VM 响应 DTO
///
/// 缺失的内外网 IP 序列化为显式 null，不省略字段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VmResponse {
    pub id: String,
    pub name: String,
    pub zone_region: String,
    pub ip_external: Option<String>,
    pub ip_internal: Option<String>,
    pub machine_type: String,
    pub status: VmStatus,
}
