/// GCP VM Dashboard - 公共库
///
/// 提供 Server 使用的数据模型与统一错误处理

pub mod errors;
pub mod models;

// 重新导出常用类型
pub use errors::{Error, Result};
pub use models::{PowerAction, VmResponse, VmStatus};
