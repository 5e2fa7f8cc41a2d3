//! Hook orchestrator adapters.
//!
//! Implementations of the [`HookOrchestrator`](screening_application::HookOrchestrator)
//! port:
//!
//! - [`TracingHookOrchestrator`]: logs each notification through `tracing`
//! - [`JsonlHookOrchestrator`]: appends each notification to a JSONL audit log
//! - [`RecordingHookOrchestrator`]: keeps notifications in memory
//! - [`CompositeHookOrchestrator`]: fans out to several orchestrators in order

mod composite;
mod jsonl;
mod recording;
mod tracing_hooks;

pub use composite::CompositeHookOrchestrator;
pub use jsonl::JsonlHookOrchestrator;
pub use recording::RecordingHookOrchestrator;
pub use tracing_hooks::TracingHookOrchestrator;
