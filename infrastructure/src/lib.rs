//! Infrastructure layer for screening-quorum
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: an in-memory review store, hook orchestrators for
//! logging and auditing workflow notifications, and TOML configuration
//! loading.

pub mod config;
pub mod hooks;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileProjectConfig, ProjectConfigError};
pub use hooks::{
    CompositeHookOrchestrator, JsonlHookOrchestrator, RecordingHookOrchestrator,
    TracingHookOrchestrator,
};
pub use store::InMemoryReviewStore;
