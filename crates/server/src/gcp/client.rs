/// Compute Engine REST 客户端
///
/// 每个请求构造一个客户端句柄，失败不重试，错误原样向上传递

use common::errors::{Error, Result};
use common::models::PowerAction;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::gcp::types::{AggregatedListResponse, ApiErrorEnvelope, Operation};

/// wait 接口单次最多阻塞约两分钟，限制轮询次数避免死循环
const MAX_WAIT_CALLS: u32 = 10;

pub struct ComputeClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ComputeClient {
    pub fn new(http: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// 列出项目下所有可用区的实例（聚合列表，单次请求）
    pub async fn aggregated_list(&self, project: &str) -> Result<AggregatedListResponse> {
        let url = format!("{}/projects/{}/aggregated/instances", self.base_url, project);
        debug!("请求实例聚合列表: {}", url);

        let request = self.http.get(&url).bearer_auth(&self.token);
        Self::execute(request).await
    }

    /// 对实例执行 start/stop，返回可用区操作
    pub async fn power(
        &self,
        project: &str,
        zone: &str,
        instance: &str,
        action: PowerAction,
    ) -> Result<Operation> {
        let url = format!(
            "{}/projects/{}/zones/{}/instances/{}/{}",
            self.base_url,
            project,
            zone,
            instance,
            action.as_str()
        );
        info!("对实例 {} 执行 '{}': {}", instance, action.as_str(), url);

        let request = self.http.post(&url).bearer_auth(&self.token);
        Self::execute(request).await
    }

    /// 同步等待可用区操作完成
    ///
    /// wait 接口服务端阻塞直到操作完成或超时返回当前状态，循环直到 DONE
    pub async fn wait_for_operation(&self, project: &str, zone: &str, operation: &str) -> Result<()> {
        let url = format!(
            "{}/projects/{}/zones/{}/operations/{}/wait",
            self.base_url, project, zone, operation
        );

        for _ in 0..MAX_WAIT_CALLS {
            debug!("等待操作完成: {}", url);
            let request = self.http.post(&url).bearer_auth(&self.token);
            let op: Operation = Self::execute(request).await?;

            if let Some(error) = op.error {
                let detail = error
                    .errors
                    .iter()
                    .map(|e| e.message.clone())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::Provider(detail));
            }

            if op.status == "DONE" {
                return Ok(());
            }
        }

        Err(Error::Provider(format!(
            "La operación '{}' no finalizó a tiempo.",
            operation
        )))
    }

    /// 发送请求并解析响应；非 2xx 时提取提供商的错误消息
    async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => format!("HTTP {}: {}", status.as_u16(), body),
            };
            return Err(Error::Provider(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Provider(e.to_string()))
    }
}
