//! taskpoll worker
//!
//! Pull-based task workers for a Conductor-style orchestrator. A
//! `TaskRunner` polls the orchestrator for every task type in a
//! `WorkerRegistry`, executes claimed tasks on a bounded pool of slots, and
//! reports exactly one `TaskResult` per claimed task.

pub mod config;
pub mod error;
pub mod handlers;
pub mod profile;
pub mod registry;
pub mod runner;

pub use config::WorkerConfig;
pub use error::{HandlerError, RegistryError, RunnerError};
pub use handlers::{DeleteRecordHandler, InsertRecordHandler, QueryRecordHandler, TaskHandler};
pub use profile::{build_registry, ServiceProfile, TaskNames};
pub use registry::WorkerRegistry;
pub use runner::TaskRunner;
