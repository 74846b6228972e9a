mod backup;
mod graceful;
mod restore;

// Graceful commands
pub use graceful::{run_graceful_list, run_graceful_start, run_graceful_stop};

// Backup commands
pub use backup::{run_backup_stacks, run_backup_volumes, run_list_backups, run_list_volumes, run_prune};

// Restore commands
pub use restore::{run_restore_stack, run_restore_volume};
