use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::backup::TIMESTAMP_FORMAT;

/// 远程某个备份类别下的一个带时间戳的备份批次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionCandidate {
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// 选出超出保留数量、需要删除的备份
///
/// 按时间从新到旧排序，保留前 `keep` 个，返回其余的路径。
/// `keep` 必须至少为 1，由配置校验保证。
pub fn select_for_deletion(mut candidates: Vec<RetentionCandidate>, keep: usize) -> Vec<String> {
    if candidates.len() <= keep {
        return Vec::new();
    }

    candidates.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    candidates
        .into_iter()
        .skip(keep)
        .map(|c| c.path)
        .collect()
}

/// 生成备份批次目录名
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// 解析备份批次目录名，格式不符时返回 None
pub fn parse_timestamp(name: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(name, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn candidates(count: usize) -> Vec<RetentionCandidate> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        // 乱序构造，验证排序
        (0..count)
            .rev()
            .map(|day| {
                let ts = base + Duration::days(day as i64);
                RetentionCandidate {
                    path: format!("volumes/{}", format_timestamp(&ts)),
                    timestamp: ts,
                }
            })
            .collect()
    }

    #[test]
    fn test_keep_seven_of_ten_deletes_three_oldest() {
        let mut deleted = select_for_deletion(candidates(10), 7);
        deleted.sort();

        assert_eq!(
            deleted,
            vec![
                "volumes/2024-01-01_02-00-00",
                "volumes/2024-01-02_02-00-00",
                "volumes/2024-01-03_02-00-00",
            ]
        );
    }

    #[test]
    fn test_below_threshold_deletes_nothing() {
        assert!(select_for_deletion(candidates(5), 7).is_empty());
        assert!(select_for_deletion(candidates(7), 7).is_empty());
        assert!(select_for_deletion(Vec::new(), 1).is_empty());
    }

    #[test]
    fn test_keep_one() {
        let deleted = select_for_deletion(candidates(3), 1);
        assert_eq!(deleted.len(), 2);
        assert!(!deleted.contains(&"volumes/2024-01-03_02-00-00".to_string()));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 23, 5, 7).unwrap();
        let name = format_timestamp(&ts);
        assert_eq!(name, "2024-03-09_23-05-07");
        assert_eq!(parse_timestamp(&name), Some(ts));
        assert_eq!(parse_timestamp("latest"), None);
    }
}
