/// 虚拟机目录与电源控制服务

use common::errors::Result;
use common::models::{VmResponse, VmStatus};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::gcp::types::{last_segment, AggregatedListResponse, Instance};
use crate::gcp::ComputeClient;

/// connect 接口的返回内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectCommand {
    pub mensaje: String,
    pub comando_ssh: String,
}

pub struct VmService {
    state: AppState,
}

impl VmService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// 本次请求使用的提供商客户端句柄
    fn client(&self) -> ComputeClient {
        let cfg = self.state.config();
        ComputeClient::new(self.state.http(), &cfg.gcp_api_base, &cfg.gcp_access_token)
    }

    /// 获取项目下所有虚拟机，按可用区展平为统一记录
    ///
    /// 没有实例时返回空列表（参考实现返回伪造的占位 VM，属于遗留调试行为）
    pub async fn list_vms(&self) -> Result<Vec<VmResponse>> {
        let project = &self.state.config().gcp_project;
        let aggregated = self.client().aggregated_list(project).await?;

        let vms = flatten_aggregated(aggregated);
        if vms.is_empty() {
            warn!("项目 {} 下未找到任何实例", project);
        } else {
            info!("项目 {} 下找到 {} 台实例", project, vms.len());
        }

        Ok(vms)
    }

    /// 根据调用方提供的当前状态切换电源
    ///
    /// 状态不重新查询；Provisioning 在发起任何提供商调用之前被拒绝
    pub async fn toggle_power(
        &self,
        vm_name: &str,
        zone: &str,
        current_status: VmStatus,
    ) -> Result<String> {
        let action = current_status.power_action()?;

        let project = &self.state.config().gcp_project;
        let client = self.client();

        let operation = client.power(project, zone, vm_name, action).await?;
        client
            .wait_for_operation(project, zone, &operation.name)
            .await?;

        info!("VM {} 的 '{}' 操作已完成", vm_name, action.as_str());
        Ok(format!(
            "Operación '{}' de la VM '{}' completada exitosamente.",
            action.as_str(),
            vm_name
        ))
    }

    /// 生成 SSH 连接命令，纯文本，不发起任何提供商调用
    pub fn connect(&self, vm_name: &str, zone: &str, ip_external: Option<&str>) -> ConnectCommand {
        let project = &self.state.config().gcp_project;

        let comando_ssh = match ip_external {
            Some(ip) => format!(
                "gcloud compute ssh {} --zone={} --project={} --external-ip={}",
                vm_name, zone, project, ip
            ),
            None => format!(
                "gcloud compute ssh {} --zone={} --project={} # IP externa no disponible, intenta conexión interna o Cloud Shell",
                vm_name, zone, project
            ),
        };

        ConnectCommand {
            mensaje: format!(
                "Para conectar a {}, usa el siguiente comando (o Cloud Shell):",
                vm_name
            ),
            comando_ssh,
        }
    }
}

/// 将聚合列表展平为有序的统一记录序列
fn flatten_aggregated(aggregated: AggregatedListResponse) -> Vec<VmResponse> {
    let mut vms = Vec::new();

    for (zone_key, scoped) in aggregated.items {
        for instance in scoped.instances {
            vms.push(instance_to_record(&zone_key, instance));
        }
    }

    vms
}

/// 将提供商实例映射为统一记录
///
/// 内网 IP 取第一个网络接口，外网 IP 取其第一个访问配置
fn instance_to_record(zone_key: &str, instance: Instance) -> VmResponse {
    let primary = instance.network_interfaces.first();
    let ip_internal = primary.and_then(|nic| nic.network_ip.clone());
    let ip_external = primary
        .and_then(|nic| nic.access_configs.first())
        .and_then(|ac| ac.nat_ip.clone());

    VmResponse {
        id: instance.id,
        name: instance.name,
        zone_region: last_segment(zone_key).to_string(),
        ip_external,
        ip_internal,
        machine_type: last_segment(&instance.machine_type).to_string(),
        status: VmStatus::from_provider(&instance.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::routing::post;
    use axum::{Json, Router};

    use crate::config::Config;

    fn test_state_with_base(gcp_api_base: &str) -> AppState {
        AppState::new(Config {
            server_port: 3000,
            gcp_project: "proyecto-test".to_string(),
            gcp_api_base: gcp_api_base.to_string(),
            gcp_access_token: "token-test".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            log_level: "debug".to_string(),
        })
    }

    fn test_state() -> AppState {
        test_state_with_base("http://127.0.0.1:1")
    }

    /// 假提供商的电源接口，记录收到的操作动词
    async fn fake_power(
        Path((_project, _zone, _instance, action)): Path<(String, String, String, String)>,
        State(calls): State<Arc<Mutex<Vec<String>>>>,
    ) -> Json<serde_json::Value> {
        calls.lock().unwrap().push(action);
        Json(serde_json::json!({ "name": "operation-1", "status": "RUNNING" }))
    }

    /// 假提供商的 wait 接口，直接返回 DONE
    async fn fake_wait(
        Path((_project, _zone, operation)): Path<(String, String, String)>,
    ) -> Json<serde_json::Value> {
        Json(serde_json::json!({ "name": operation, "status": "DONE" }))
    }

    /// 在随机端口启动假提供商，返回其根地址
    async fn spawn_fake_provider(calls: Arc<Mutex<Vec<String>>>) -> String {
        let app = Router::new()
            .route(
                "/projects/:project/zones/:zone/instances/:instance/:action",
                post(fake_power),
            )
            .route(
                "/projects/:project/zones/:zone/operations/:operation/wait",
                post(fake_wait),
            )
            .with_state(calls);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn sample_aggregated() -> AggregatedListResponse {
        serde_json::from_value(serde_json::json!({
            "items": {
                "zones/us-central1-a": {
                    "instances": [{
                        "id": "111",
                        "name": "vm-a",
                        "machineType": "projects/p/zones/us-central1-a/machineTypes/e2-small",
                        "status": "RUNNING",
                        "networkInterfaces": [{
                            "networkIP": "10.0.0.2",
                            "accessConfigs": [{ "natIP": "34.1.2.3" }]
                        }]
                    }]
                },
                "zones/europe-west1-b": {
                    "instances": [{
                        "id": "222",
                        "name": "vm-b",
                        "machineType": "projects/p/zones/europe-west1-b/machineTypes/e2-medium",
                        "status": "TERMINATED",
                        "networkInterfaces": [{ "networkIP": "10.0.1.2" }]
                    }, {
                        "id": "333",
                        "name": "vm-c",
                        "machineType": "projects/p/zones/europe-west1-b/machineTypes/n1-standard-1",
                        "status": "STAGING"
                    }]
                },
                "zones/asia-east1-a": {
                    "warning": { "code": "NO_RESULTS_ON_PAGE" }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_flatten_aggregated() {
        let vms = flatten_aggregated(sample_aggregated());

        // BTreeMap 按可用区键排序
        assert_eq!(vms.len(), 3);
        assert_eq!(vms[0].name, "vm-b");
        assert_eq!(vms[1].name, "vm-c");
        assert_eq!(vms[2].name, "vm-a");

        assert_eq!(vms[2].zone_region, "us-central1-a");
        assert_eq!(vms[2].machine_type, "e2-small");
        assert_eq!(vms[2].status, VmStatus::Running);
        assert_eq!(vms[2].ip_internal.as_deref(), Some("10.0.0.2"));
        assert_eq!(vms[2].ip_external.as_deref(), Some("34.1.2.3"));

        // 没有访问配置 -> 外网 IP 为 None；没有网络接口 -> 两个都为 None
        assert_eq!(vms[0].status, VmStatus::Stopped);
        assert_eq!(vms[0].ip_internal.as_deref(), Some("10.0.1.2"));
        assert_eq!(vms[0].ip_external, None);
        assert_eq!(vms[1].status, VmStatus::Provisioning);
        assert_eq!(vms[1].ip_internal, None);
        assert_eq!(vms[1].ip_external, None);
    }

    #[test]
    fn test_flatten_empty_inventory_returns_empty_list() {
        let vms = flatten_aggregated(AggregatedListResponse::default());
        assert!(vms.is_empty());
    }

    #[test]
    fn test_all_statuses_in_enum_range() {
        for vm in flatten_aggregated(sample_aggregated()) {
            assert!(matches!(
                vm.status,
                VmStatus::Running | VmStatus::Stopped | VmStatus::Provisioning
            ));
        }
    }

    #[test]
    fn test_connect_with_external_ip() {
        let service = VmService::new(test_state());
        let cmd = service.connect("vm1", "us-central1-a", Some("34.1.2.3"));

        assert_eq!(
            cmd.comando_ssh,
            "gcloud compute ssh vm1 --zone=us-central1-a --project=proyecto-test --external-ip=34.1.2.3"
        );
        assert_eq!(
            cmd.mensaje,
            "Para conectar a vm1, usa el siguiente comando (o Cloud Shell):"
        );
    }

    #[test]
    fn test_connect_without_external_ip() {
        let service = VmService::new(test_state());
        let cmd = service.connect("vm1", "us-central1-a", None);

        assert!(cmd.comando_ssh.starts_with("gcloud compute ssh vm1 --zone=us-central1-a"));
        assert!(!cmd.comando_ssh.contains("--external-ip"));
        assert!(cmd.comando_ssh.contains("# IP externa no disponible"));
    }

    #[tokio::test]
    async fn test_toggle_power_running_issues_stop() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_fake_provider(calls.clone()).await;

        let service = VmService::new(test_state_with_base(&base));
        let mensaje = service
            .toggle_power("vm1", "us-central1-a", VmStatus::Running)
            .await
            .unwrap();

        assert_eq!(
            mensaje,
            "Operación 'stop' de la VM 'vm1' completada exitosamente."
        );
        assert_eq!(*calls.lock().unwrap(), vec!["stop".to_string()]);
    }

    #[tokio::test]
    async fn test_toggle_power_stopped_issues_start() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_fake_provider(calls.clone()).await;

        let service = VmService::new(test_state_with_base(&base));
        let mensaje = service
            .toggle_power("vm2", "europe-west1-b", VmStatus::Stopped)
            .await
            .unwrap();

        assert_eq!(
            mensaje,
            "Operación 'start' de la VM 'vm2' completada exitosamente."
        );
        assert_eq!(*calls.lock().unwrap(), vec!["start".to_string()]);
    }

    #[tokio::test]
    async fn test_toggle_power_provisioning_rejected_without_provider_call() {
        // gcp_api_base 指向不可达地址，若发起了提供商调用测试会失败在错误类型上
        let service = VmService::new(test_state());
        let err = service
            .toggle_power("vm1", "us-central1-a", VmStatus::Provisioning)
            .await
            .unwrap_err();

        assert!(matches!(err, common::Error::InvalidArgument(_)));
        assert!(err.to_string().contains("Provisioning"));
    }
}
