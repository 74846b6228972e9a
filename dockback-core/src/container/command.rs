use super::types::DockerCli;
use crate::constants::command;
use crate::{DockbackError, Result};
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

impl DockerCli {
    /// 创建新的 docker CLI 运行时
    pub fn new() -> Self {
        Self {
            docker_bin: command::DOCKER.to_string(),
            compose_bin: command::DOCKER_COMPOSE_STANDALONE.to_string(),
        }
    }

    /// 检查 Docker 状态
    pub async fn check_docker_status(&self) -> Result<()> {
        if which::which(&self.docker_bin).is_err() {
            return Err(DockbackError::docker("Docker 未安装或不在 PATH 中"));
        }

        let output = self.run_docker_command(&["info"]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DockbackError::docker(format!("Docker 服务未运行: {stderr}")));
        }

        Ok(())
    }

    /// 执行 docker-compose 命令
    pub(crate) async fn run_compose_command(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<Output> {
        // 尝试使用 docker compose（新语法）
        let mut cmd_args = vec!["compose"];
        cmd_args.extend(args);
        let plugin = match self.spawn(&self.docker_bin, &cmd_args, working_dir).await {
            Ok(output) if output.status.success() => return Ok(output),
            other => other,
        };

        // 回退到 docker-compose（旧语法）；未安装时保留 docker compose 的结果
        match self.spawn(&self.compose_bin, args, working_dir).await {
            Ok(output) => Ok(output),
            Err(e) => {
                debug!("docker-compose 不可用: {}", e);
                plugin
            }
        }
    }

    /// 执行 docker 命令
    pub(crate) async fn run_docker_command(&self, args: &[&str]) -> Result<Output> {
        self.spawn(&self.docker_bin, args, None).await
    }

    /// 执行 docker 命令，非零退出码视为错误并返回标准输出
    pub(crate) async fn docker_stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.run_docker_command(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DockbackError::docker(format!(
                "docker {} 失败: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn spawn(&self, program: &str, args: &[&str], working_dir: Option<&Path>) -> Result<Output> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

        // compose 项目目录可能已被删除，此时仍以项目名执行
        if let Some(dir) = working_dir.filter(|dir| dir.is_dir()) {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await?;
        Ok(output)
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(docker_bin: &str, compose_bin: &str) -> DockerCli {
        DockerCli {
            docker_bin: docker_bin.to_string(),
            compose_bin: compose_bin.to_string(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compose_falls_back_when_plugin_exits_nonzero() {
        // `false compose ...` 失败，`true ...` 成功
        let output = cli("false", "true")
            .run_compose_command(&["-p", "app", "stop", "db"], None)
            .await
            .unwrap();
        assert!(output.status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compose_keeps_plugin_result_without_standalone() {
        let output = cli("false", "/nonexistent/docker-compose")
            .run_compose_command(&["-p", "app", "stop", "db"], None)
            .await
            .unwrap();
        assert!(!output.status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compose_plugin_success_is_used() {
        let output = cli("true", "false")
            .run_compose_command(&["-p", "app", "start", "db"], None)
            .await
            .unwrap();
        assert!(output.status.success());
    }
}
