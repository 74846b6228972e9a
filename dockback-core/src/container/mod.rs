// 模块声明
mod command;
mod compose;
mod runtime;
mod types;
mod volumes;

// 重新导出公共API
pub use compose::ComposeController;
pub use runtime::ContainerRuntime;
pub use types::{ComposeAssociation, ContainerDetails, DockerCli, VolumeDetails};

#[cfg(test)]
mod tests {
    use super::runtime::{parse_container_inspect, parse_name_lines};
    use super::volumes::parse_volume_inspect;
    use std::path::PathBuf;

    #[test]
    fn test_container_inspect_parsing() {
        let json_output = r#"[{
            "Id": "4f2c",
            "Name": "/app-db-1",
            "State": {"Status": "running", "Running": true, "Paused": false},
            "Config": {
                "Image": "postgres:16",
                "Labels": {
                    "com.docker.compose.project": "app",
                    "com.docker.compose.service": "db",
                    "com.docker.compose.project.working_dir": "/opt/stacks/app",
                    "dockback.graceful": "true",
                    "dockback.graceful.timeout": "45"
                }
            }
        }]"#;

        let details = parse_container_inspect(json_output).unwrap();
        assert_eq!(details.name, "app-db-1");
        assert!(details.running);
        assert_eq!(details.labels.get("dockback.graceful.timeout").unwrap(), "45");

        let compose = details.compose.unwrap();
        assert_eq!(compose.project, "app");
        assert_eq!(compose.service, "db");
        assert_eq!(compose.working_dir, Some(PathBuf::from("/opt/stacks/app")));
    }

    #[test]
    fn test_container_inspect_without_labels() {
        let json_output = r#"[{"Name":"/db","State":{"Running":false},"Config":{"Labels":null}}]"#;

        let details = parse_container_inspect(json_output).unwrap();
        assert_eq!(details.name, "db");
        assert!(!details.running);
        assert!(details.labels.is_empty());
        assert!(details.compose.is_none());
    }

    #[test]
    fn test_compose_requires_project_and_service() {
        let json_output = r#"[{"Name":"/web","State":{"Running":true},
            "Config":{"Labels":{"com.docker.compose.project":"app"}}}]"#;

        let details = parse_container_inspect(json_output).unwrap();
        assert!(details.compose.is_none());
    }

    #[test]
    fn test_empty_inspect_is_error() {
        assert!(parse_container_inspect("[]").is_err());
    }

    #[test]
    fn test_volume_inspect_parsing() {
        let json_output = r#"[{
            "CreatedAt": "2024-05-01T10:00:00Z",
            "Driver": "local",
            "Labels": {"com.docker.compose.project": "app", "com.docker.compose.volume": "pgdata"},
            "Mountpoint": "/var/lib/docker/volumes/app_pgdata/_data",
            "Name": "app_pgdata",
            "Scope": "local"
        }]"#;

        let volume = parse_volume_inspect(json_output).unwrap();
        assert_eq!(volume.name, "app_pgdata");
        assert_eq!(volume.created_at.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(
            volume.mountpoint,
            Some(PathBuf::from("/var/lib/docker/volumes/app_pgdata/_data"))
        );
        assert_eq!(volume.labels.len(), 2);
    }

    #[test]
    fn test_name_lines() {
        let names = parse_name_lines("db\n\n  web \n");
        assert_eq!(names, vec!["db".to_string(), "web".to_string()]);
    }
}
