/// 配置管理

use std::fs;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// GCP 项目 ID（参考实现中是编译期常量，这里外置到环境变量）
    pub gcp_project: String,
    /// Compute Engine REST API 根地址，测试时可覆盖
    pub gcp_api_base: String,
    /// Bearer 访问令牌，来自 GCP_ACCESS_TOKEN 或 GCP_TOKEN_FILE
    pub gcp_access_token: String,
    /// 允许的唯一跨域来源
    pub cors_origin: String,
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let gcp_project = std::env::var("GCP_PROJECT_ID")
            .unwrap_or_else(|_| "puestos-de-trabajo-potentes".to_string());

        let gcp_api_base = std::env::var("GCP_API_BASE")
            .unwrap_or_else(|_| "https://compute.googleapis.com/compute/v1".to_string());

        let gcp_access_token = match std::env::var("GCP_ACCESS_TOKEN") {
            Ok(token) => token,
            Err(_) => match std::env::var("GCP_TOKEN_FILE") {
                Ok(path) => fs::read_to_string(&path)?.trim().to_string(),
                Err(_) => String::new(),
            },
        };

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let log_level = std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "debug".to_string());

        Ok(Self {
            server_port,
            gcp_project,
            gcp_api_base,
            gcp_access_token,
            cors_origin,
            log_level,
        })
    }
}
