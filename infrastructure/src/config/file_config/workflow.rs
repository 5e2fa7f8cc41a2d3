//! Workflow configuration from TOML (`[workflow]` section)

use screening_application::WorkflowConfig;
use serde::{Deserialize, Serialize};

/// Raw workflow configuration from TOML
///
/// # Example
///
/// ```toml
/// [workflow]
/// auto_escalate = true        # open a consensus stage when reviewers disagree
/// actor = "coordinator"       # user recorded on every notification
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkflowConfig {
    /// Create a follow-up stage for escalated disagreement
    pub auto_escalate: bool,
    /// Acting user stamped on hook contexts
    pub actor: String,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        Self {
            auto_escalate: true,
            actor: "coordinator".to_string(),
        }
    }
}

impl FileWorkflowConfig {
    pub fn to_workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            auto_escalate: self.auto_escalate,
        }
    }
}
