//! taskpoll Core Data Contracts
//!
//! This crate contains the types shared by every taskpoll crate, with no
//! dependencies on:
//! - Network/HTTP
//! - Database
//! - Runtime specifics
//!
//! The orchestrator wire shapes (`Task`, `TaskResult`) and the catalog
//! record types live here.

pub mod error;
pub mod ids;
pub mod record;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::{TaskId, WorkerId};
pub use record::{Catalog, NewRecord, Record};
pub use status::TaskStatus;
pub use task::{InputData, OutputData, Task, TaskResult};
