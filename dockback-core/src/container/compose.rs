use super::types::DockerCli;
use crate::{DockbackError, Result};
use std::path::Path;
use tracing::debug;

/// compose 级别的服务控制
///
/// 以项目名定位服务，`working_dir` 存在时在该目录下执行，
/// 使 compose 能读取项目的 `.env` 与 compose 文件。
#[allow(async_fn_in_trait)]
pub trait ComposeController {
    async fn stop_service(
        &self,
        project: &str,
        service: &str,
        working_dir: Option<&Path>,
    ) -> Result<()>;

    async fn start_service(
        &self,
        project: &str,
        service: &str,
        working_dir: Option<&Path>,
    ) -> Result<()>;
}

impl DockerCli {
    async fn compose_service_action(
        &self,
        action: &str,
        project: &str,
        service: &str,
        working_dir: Option<&Path>,
    ) -> Result<()> {
        debug!(
            "执行: docker compose -p {} {} {} (目录: {:?})",
            project, action, service, working_dir
        );

        let output = self
            .run_compose_command(&["-p", project, action, service], working_dir)
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DockbackError::compose(format!(
                "{action} 服务 {project}/{service} 失败: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl ComposeController for DockerCli {
    async fn stop_service(
        &self,
        project: &str,
        service: &str,
        working_dir: Option<&Path>,
    ) -> Result<()> {
        self.compose_service_action("stop", project, service, working_dir)
            .await
    }

    async fn start_service(
        &self,
        project: &str,
        service: &str,
        working_dir: Option<&Path>,
    ) -> Result<()> {
        self.compose_service_action("start", project, service, working_dir)
            .await
    }
}
