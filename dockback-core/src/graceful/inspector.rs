use super::types::ContainerRecord;
use crate::Result;
use crate::container::ContainerRuntime;
use tracing::{debug, info, warn};

/// 发现带有标记标签（值为 `true`）的运行中容器
///
/// 单个容器 inspect 失败（例如在列出后被删除）只记录警告并跳过。
pub async fn discover<R: ContainerRuntime>(runtime: &R, marker: &str) -> Result<Vec<ContainerRecord>> {
    let filter = format!("{marker}=true");
    let names = runtime.list_running(&filter).await?;

    if names.is_empty() {
        info!("没有发现带 {} 标记的运行中容器", filter);
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(names.len());
    for name in names {
        match runtime.inspect(&name).await {
            Ok(details) => {
                debug!(
                    container = %name,
                    running = details.running,
                    compose = ?details.compose,
                    "容器信息"
                );
                records.push(ContainerRecord {
                    name: details.name,
                    is_running: details.running,
                    compose: details.compose,
                    labels: details.labels,
                });
            }
            Err(e) => {
                warn!("检查容器 {} 失败，跳过: {}", name, e);
            }
        }
    }

    info!("发现 {} 个需要优雅停机的容器", records.len());
    Ok(records)
}
