//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams to the two external collaborators: the remote
//! record-table store and the structured-inference service. Adapters
//! implement them; the application layer consumes them through
//! `Arc<dyn _>` so tests can substitute fakes.

pub mod inference;
pub mod store;

pub use inference::{InferenceRequest, StructuredInference, ToolSchema};
pub use store::TableStore;
