use super::policy;
use super::state::StateStore;
use super::types::{
    ContainerRecord, PrepareResult, QuiesceMethod, QuiesceRecord, ResumeResult,
};
use crate::Result;
use crate::constants::graceful::POST_COMMAND_SETTLE_SECS;
use crate::container::{ComposeAssociation, ComposeController, ContainerRuntime};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 优雅停机编排器
///
/// `prepare` 与 `resume` 之间不共享内存状态，只通过 [`StateStore`] 衔接，
/// 两者可以在不同进程中执行。容器按顺序逐个处理。
pub struct Orchestrator<R, C, S> {
    runtime: R,
    compose: C,
    store: S,
    settle_delay: Duration,
}

impl<R, C, S> Orchestrator<R, C, S>
where
    R: ContainerRuntime,
    C: ComposeController,
    S: StateStore,
{
    pub fn new(runtime: R, compose: C, store: S) -> Self {
        Self {
            runtime,
            compose,
            store,
            settle_delay: Duration::from_secs(POST_COMMAND_SETTLE_SECS),
        }
    }

    /// 设置执行 post 命令前的等待时间
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 备份前停机所有容器
    ///
    /// 状态记录在触碰任何容器之前写入；写入失败时直接返回错误，不做任何停机。
    /// 单个容器停机失败只计入 `failed_containers`，该容器仍保留记录以便恢复。
    pub async fn prepare(
        &self,
        containers: Vec<ContainerRecord>,
        default_timeout: u64,
    ) -> Result<PrepareResult> {
        self.recover_interrupted_cycle().await?;

        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(containers.len());
        for container in containers {
            if !seen.insert(container.name.clone()) {
                warn!("容器 {} 重复出现，忽略", container.name);
                continue;
            }
            let policy = policy::resolve(&container, default_timeout);
            pending.push(QuiesceRecord {
                container_name: container.name,
                policy,
                was_running: container.is_running,
                compose: container.compose,
            });
        }

        if pending.is_empty() {
            info!("没有需要停机的容器");
            return Ok(PrepareResult::default());
        }

        self.store.record(&pending)?;
        info!("已记录 {} 个容器的停机状态", pending.len());

        let mut result = PrepareResult::default();
        let mut stopped_services = HashSet::new();

        for record in &pending {
            if self.quiesce(record, &mut stopped_services).await {
                result.prepared_count += 1;
            } else {
                result.failed_containers.push(record.container_name.clone());
            }
        }

        if result.is_clean() {
            info!("✅ {} 个容器已停机", result.prepared_count);
        } else {
            warn!(
                "⚠️  {} 个容器已停机，{} 个失败: {}",
                result.prepared_count,
                result.failed_containers.len(),
                result.failed_containers.join(", ")
            );
        }

        Ok(result)
    }

    /// 备份后恢复之前停机的所有容器
    ///
    /// 无论单个容器是否恢复成功，处理完成后都会清除状态存储；
    /// 清除失败只记录错误，不影响本次结果。
    pub async fn resume(&self) -> Result<ResumeResult> {
        let records = self.store.load()?;
        if records.is_empty() {
            debug!("状态存储为空，无需恢复");
            return Ok(ResumeResult::default());
        }

        info!("开始恢复 {} 个容器", records.len());

        let mut result = ResumeResult::default();
        let mut seen = HashSet::new();
        let mut started_services = HashSet::new();

        for record in &records {
            if !seen.insert(record.container_name.as_str()) {
                warn!("状态记录中容器 {} 重复，忽略", record.container_name);
                continue;
            }
            if self.restore(record, &mut started_services).await {
                result.restored_count += 1;
            } else {
                result.failed_containers.push(record.container_name.clone());
            }
        }

        if let Err(e) = self.store.clear() {
            error!("清除状态存储失败，下一轮备份前需要手动处理: {}", e);
        }

        if result.is_clean() {
            info!("✅ {} 个容器已恢复", result.restored_count);
        } else {
            warn!(
                "⚠️  {} 个容器已恢复，{} 个失败: {}",
                result.restored_count,
                result.failed_containers.len(),
                result.failed_containers.join(", ")
            );
        }

        Ok(result)
    }

    /// 上一轮 prepare 之后未执行 resume（进程被中断）时，先恢复遗留的容器
    async fn recover_interrupted_cycle(&self) -> Result<()> {
        let leftover = self.store.load()?;
        if leftover.is_empty() {
            return Ok(());
        }

        warn!(
            "发现上一轮未恢复的 {} 条停机记录，先执行恢复",
            leftover.len()
        );
        let result = self.resume().await?;
        if !result.is_clean() {
            warn!(
                "遗留容器恢复失败: {}",
                result.failed_containers.join(", ")
            );
        }
        Ok(())
    }

    /// 停机单个容器，返回是否成功
    async fn quiesce(
        &self,
        record: &QuiesceRecord,
        stopped_services: &mut HashSet<(String, String)>,
    ) -> bool {
        let name = &record.container_name;
        let policy = &record.policy;

        if !record.was_running {
            info!("容器 {} 未在运行，无需停机", name);
            return true;
        }

        // pre 命令在 compose 与直接停机两条路径之前都执行一次
        if let Some(cmd) = &policy.pre_command {
            info!("容器 {} 执行 pre 命令: {}", name, cmd);
            if let Err(e) = self.runtime.exec(name, cmd).await {
                warn!("容器 {} 的 pre 命令失败，继续停机: {}", name, e);
            }
        }

        if policy.method == QuiesceMethod::Stop {
            if let Some(compose) = &record.compose {
                if self
                    .compose_action(compose, stopped_services, ComposeAction::Stop)
                    .await
                {
                    info!(
                        "容器 {} 已通过 compose 停止 ({}/{})",
                        name, compose.project, compose.service
                    );
                    return true;
                }
            }
        }

        let outcome = match policy.method {
            QuiesceMethod::Stop => {
                info!("停止容器 {} (超时 {} 秒)", name, policy.timeout_secs);
                self.runtime.stop(name, policy.timeout_secs).await
            }
            QuiesceMethod::Pause => {
                info!("暂停容器 {}", name);
                self.runtime.pause(name).await
            }
            QuiesceMethod::Command => {
                info!("容器 {} 使用 command 方式，不做运行时操作", name);
                Ok(())
            }
        };

        match outcome {
            Ok(()) => true,
            Err(e) => {
                error!("容器 {} 停机失败: {}", name, e);
                false
            }
        }
    }

    /// 恢复单个容器，返回是否成功
    async fn restore(
        &self,
        record: &QuiesceRecord,
        started_services: &mut HashSet<(String, String)>,
    ) -> bool {
        let name = &record.container_name;
        let policy = &record.policy;

        if !record.was_running {
            info!("容器 {} 停机前未在运行，保持原状", name);
            return true;
        }

        let mut restored = false;
        if policy.method == QuiesceMethod::Stop {
            if let Some(compose) = &record.compose {
                if self
                    .compose_action(compose, started_services, ComposeAction::Start)
                    .await
                {
                    info!(
                        "容器 {} 已通过 compose 启动 ({}/{})",
                        name, compose.project, compose.service
                    );
                    restored = true;
                } else {
                    warn!("容器 {} 的 compose 启动失败，改为直接启动", name);
                }
            }
        }

        if !restored {
            let outcome = match policy.method {
                QuiesceMethod::Stop => {
                    info!("启动容器 {}", name);
                    self.runtime.start(name).await
                }
                QuiesceMethod::Pause => {
                    info!("恢复暂停的容器 {}", name);
                    self.runtime.unpause(name).await
                }
                QuiesceMethod::Command => {
                    debug!("容器 {} 使用 command 方式，不自动重启", name);
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                error!("容器 {} 恢复失败: {}", name, e);
                return false;
            }
        }

        if let Some(cmd) = &policy.post_command {
            if !self.settle_delay.is_zero() {
                tokio::time::sleep(self.settle_delay).await;
            }
            info!("容器 {} 执行 post 命令: {}", name, cmd);
            if let Err(e) = self.runtime.exec(name, cmd).await {
                warn!("容器 {} 的 post 命令失败: {}", name, e);
            }
        }

        true
    }

    /// 以 compose 服务为单位停止或启动，同一轮内每个服务只操作一次
    async fn compose_action(
        &self,
        compose: &ComposeAssociation,
        handled: &mut HashSet<(String, String)>,
        action: ComposeAction,
    ) -> bool {
        let key = (compose.project.clone(), compose.service.clone());
        if handled.contains(&key) {
            debug!(
                "compose 服务 {}/{} 本轮已处理",
                compose.project, compose.service
            );
            return true;
        }

        let working_dir = compose.working_dir.as_deref();
        let outcome = match action {
            ComposeAction::Stop => {
                self.compose
                    .stop_service(&compose.project, &compose.service, working_dir)
                    .await
            }
            ComposeAction::Start => {
                self.compose
                    .start_service(&compose.project, &compose.service, working_dir)
                    .await
            }
        };

        match outcome {
            Ok(()) => {
                handled.insert(key);
                true
            }
            Err(e) => {
                warn!(
                    "compose 服务 {}/{} 操作失败，回退到容器级操作: {}",
                    compose.project, compose.service, e
                );
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ComposeAction {
    Stop,
    Start,
}
