pub mod archive;
pub mod backup;
pub mod config;
pub mod constants;
pub mod container;
pub mod error;
pub mod graceful;
pub mod retention;
pub mod storage;
pub mod volume;

pub use error::{DockbackError, Result};
