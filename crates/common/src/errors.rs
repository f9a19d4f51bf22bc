use thiserror::Error;

/// 统一错误类型
///
/// 错误消息使用西班牙语，与 API 对外文案保持一致
#[derive(Error, Debug)]
pub enum Error {
    #[error("Error del proveedor: {0}")]
    Provider(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Error interno: {0}")]
    Internal(String),

    #[error("Error inesperado: {0}")]
    Other(#[from] anyhow::Error),
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, Error>;
