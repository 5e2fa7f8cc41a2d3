//! Application-level configuration.
//!
//! This module provides configuration types that control how the review
//! workflow behaves.

/// Review workflow behavior configuration.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Create a follow-up consensus stage when a stage escalates.
    pub auto_escalate: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            auto_escalate: true,
        }
    }
}

impl WorkflowConfig {
    /// Creates a WorkflowConfig that leaves escalated stages without a
    /// follow-up stage.
    pub fn without_auto_escalation() -> Self {
        Self {
            auto_escalate: false,
        }
    }
}
