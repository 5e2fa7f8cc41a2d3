//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod analytics;
pub mod review_workflow;
pub(crate) mod shared;
