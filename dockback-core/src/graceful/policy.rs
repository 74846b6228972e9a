use super::types::{ContainerRecord, QuiesceMethod, QuiescePolicy};
use crate::constants::labels;
use tracing::warn;

/// 根据容器标签解析停机策略
///
/// 纯函数：只读取标签与进程级默认超时。
/// - 方式区分大小写，仅识别 `stop`/`pause`/`command`，其余一律回退为 `stop`
/// - 超时优先取容器标签，无效值回退为默认值
/// - 空的 pre/post 命令视为未配置
pub fn resolve(record: &ContainerRecord, default_timeout: u64) -> QuiescePolicy {
    let method = match record.labels.get(labels::METHOD).map(String::as_str) {
        None | Some("") => QuiesceMethod::Stop,
        Some(raw) => QuiesceMethod::parse(raw).unwrap_or_else(|| {
            warn!(
                "容器 {} 的停机方式 '{}' 无法识别，使用默认方式 stop",
                record.name, raw
            );
            QuiesceMethod::Stop
        }),
    };

    let timeout_secs = match record.labels.get(labels::TIMEOUT) {
        None => default_timeout,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "容器 {} 的超时 '{}' 无效，使用默认值 {} 秒",
                    record.name, raw, default_timeout
                );
                default_timeout
            }
        },
    };

    QuiescePolicy {
        method,
        pre_command: command_label(record, labels::PRE_COMMAND),
        post_command: command_label(record, labels::POST_COMMAND),
        timeout_secs,
    }
}

fn command_label(record: &ContainerRecord, key: &str) -> Option<String> {
    record
        .labels
        .get(key)
        .map(|cmd| cmd.trim())
        .filter(|cmd| !cmd.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record_with(labels: &[(&str, &str)]) -> ContainerRecord {
        ContainerRecord {
            name: "db".to_string(),
            is_running: true,
            compose: None,
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_defaults_without_labels() {
        let policy = resolve(&record_with(&[]), 30);
        assert_eq!(
            policy,
            QuiescePolicy {
                method: QuiesceMethod::Stop,
                pre_command: None,
                post_command: None,
                timeout_secs: 30,
            }
        );
    }

    #[test]
    fn test_explicit_labels() {
        let policy = resolve(
            &record_with(&[
                ("dockback.graceful.method", "pause"),
                ("dockback.graceful.timeout", "45"),
                ("dockback.graceful.pre", "redis-cli save"),
                ("dockback.graceful.post", "echo resumed"),
            ]),
            30,
        );
        assert_eq!(policy.method, QuiesceMethod::Pause);
        assert_eq!(policy.timeout_secs, 45);
        assert_eq!(policy.pre_command.as_deref(), Some("redis-cli save"));
        assert_eq!(policy.post_command.as_deref(), Some("echo resumed"));
    }

    #[test]
    fn test_method_is_case_sensitive() {
        let policy = resolve(&record_with(&[("dockback.graceful.method", "Pause")]), 30);
        assert_eq!(policy.method, QuiesceMethod::Stop);

        let policy = resolve(&record_with(&[("dockback.graceful.method", "freeze")]), 30);
        assert_eq!(policy.method, QuiesceMethod::Stop);

        let policy = resolve(&record_with(&[("dockback.graceful.method", "command")]), 30);
        assert_eq!(policy.method, QuiesceMethod::Command);
    }

    #[test]
    fn test_empty_commands_are_absent() {
        let policy = resolve(
            &record_with(&[("dockback.graceful.pre", ""), ("dockback.graceful.post", "   ")]),
            30,
        );
        assert!(policy.pre_command.is_none());
        assert!(policy.post_command.is_none());
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let policy = resolve(&record_with(&[("dockback.graceful.timeout", "0")]), 20);
        assert_eq!(policy.timeout_secs, 20);

        let policy = resolve(&record_with(&[("dockback.graceful.timeout", "soon")]), 20);
        assert_eq!(policy.timeout_secs, 20);
    }
}
