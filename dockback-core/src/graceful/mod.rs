//! 优雅备份编排：发现需要停机的容器、解析策略、持久化停机状态，
//! 并在备份前后执行 prepare / resume 两阶段协议。

pub mod inspector;
pub mod orchestrator;
pub mod policy;
pub mod state;
mod types;

pub use inspector::discover;
pub use orchestrator::Orchestrator;
pub use state::{FileStateStore, StateStore};
pub use types::{
    ContainerRecord, PrepareResult, QuiesceMethod, QuiescePolicy, QuiesceRecord, ResumeResult,
};
