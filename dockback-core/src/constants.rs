/// 容器与卷标签常量
pub mod labels {
    /// 参与优雅备份的容器标记（值为 "true" 时生效）
    pub const GRACEFUL_MARKER: &str = "dockback.graceful";

    /// 停机方式: stop / pause / command
    pub const METHOD: &str = "dockback.graceful.method";

    /// 停机前在容器内执行的命令
    pub const PRE_COMMAND: &str = "dockback.graceful.pre";

    /// 恢复后在容器内执行的命令
    pub const POST_COMMAND: &str = "dockback.graceful.post";

    /// 容器级停止超时（秒）
    pub const TIMEOUT: &str = "dockback.graceful.timeout";

    /// docker compose 写入的标准标签
    pub const COMPOSE_PROJECT: &str = "com.docker.compose.project";
    pub const COMPOSE_SERVICE: &str = "com.docker.compose.service";
    pub const COMPOSE_WORKING_DIR: &str = "com.docker.compose.project.working_dir";
    pub const COMPOSE_VOLUME: &str = "com.docker.compose.volume";
}

/// 优雅停机相关常量
pub mod graceful {
    /// 默认停止超时（秒）
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// 执行 post 命令前等待容器进程初始化的时间（秒）
    pub const POST_COMMAND_SETTLE_SECS: u64 = 5;

    /// 默认状态文件路径
    pub const DEFAULT_STATE_FILE: &str = "/var/lib/dockback/graceful-state.json";

    /// 状态文件格式版本
    pub const STATE_FORMAT_VERSION: u32 = 1;
}

/// 备份相关常量
pub mod backup {
    /// 备份类别：卷
    pub const CLASS_VOLUMES: &str = "volumes";

    /// 备份类别：compose 目录
    pub const CLASS_STACKS: &str = "stacks";

    /// 备份批次目录名的时间格式（UTC）
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

    /// 归档文件扩展名
    pub const ARCHIVE_EXTENSION: &str = "tar.gz";

    /// 卷描述文件扩展名
    pub const MANIFEST_EXTENSION: &str = "json";

    /// 默认 Docker 卷目录
    pub const DEFAULT_VOLUMES_DIR: &str = "/var/lib/docker/volumes";

    /// 默认 compose 项目根目录
    pub const DEFAULT_STACKS_DIR: &str = "/opt/stacks";

    /// 默认本地暂存目录
    pub const DEFAULT_STAGING_DIR: &str = "/var/tmp/dockback";

    /// 默认远程根路径
    pub const DEFAULT_BASE_PATH: &str = "dockback";

    /// 默认保留批次数
    pub const DEFAULT_KEEP: u32 = 7;

    /// 默认 gzip 压缩级别
    pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

    /// 判断目录是否为 compose 项目的文件名
    pub const COMPOSE_FILE_NAMES: [&str; 4] = [
        "compose.yaml",
        "compose.yml",
        "docker-compose.yaml",
        "docker-compose.yml",
    ];
}

/// 配置文件相关常量
pub mod config {
    use std::path::PathBuf;

    /// 按优先级查找的配置文件
    pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
        "dockback.toml",
        ".dockback.toml",
        "/etc/dockback/dockback.toml",
    ];

    /// 默认日志目录
    pub const DEFAULT_LOG_DIR: &str = "/var/log/dockback";

    /// `init` 默认写入的配置文件
    pub fn get_default_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_CANDIDATES[0])
    }
}

/// 外部命令名称
pub mod command {
    pub const DOCKER: &str = "docker";
    pub const DOCKER_COMPOSE_STANDALONE: &str = "docker-compose";
    pub const RCLONE: &str = "rclone";
}
