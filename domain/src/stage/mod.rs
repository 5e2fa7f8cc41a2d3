//! Review stages
//!
//! - [`ReviewStage`]: a live instance of a stage definition with its assignments
//! - [`StageTransition`]: a conflict-state change produced by quorum evaluation

pub mod entities;

pub use entities::{ReviewStage, StageTransition, role_counts};
