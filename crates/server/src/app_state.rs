/// 应用全局状态

use crate::config::Config;

/// 应用状态
///
/// 请求之间不共享可变领域状态；reqwest::Client 只是共享连接池，
/// 每个请求在它之上构造自己的 ComputeClient
#[derive(Clone)]
pub struct AppState {
    /// 服务配置
    pub config: Config,
    /// 共享 HTTP 连接池
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// 获取服务配置
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 获取 HTTP 客户端（克隆）
    pub fn http(&self) -> reqwest::Client {
        self.http.clone()
    }
}
