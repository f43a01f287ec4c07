//! Application services (use cases).
//!
//! These services layer the consistency properties the remote store does
//! not provide: client-side sequence allocation, diff-based idempotent
//! updates, per-entity operations with client-side filtering and joins,
//! and the tool-dispatch and workflow orchestration built on top.

pub mod reconcile;
pub mod records;
pub mod registry;
pub mod sequence;
pub mod workflow;

pub use registry::{Tool, ToolRegistry};
pub use workflow::{GeneratedOrders, WorkflowOrchestrator};
