// 私有模块声明
mod app;
mod cli;
mod commands;
mod init;
pub mod project_info;
mod utils;

// 通过 pub use 精确控制对外暴露的接口
pub use app::{CliApp, load_config};
pub use cli::{BackupClass, BackupCommand, Cli, Commands, GracefulCommand, RestoreCommand};
pub use init::run_init;
pub use utils::{log_file_path, setup_logging};
