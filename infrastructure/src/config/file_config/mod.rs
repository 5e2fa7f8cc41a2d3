//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and application
//! types after validation.

mod logging;
mod project;
mod workflow;

pub use logging::FileLoggingConfig;
pub use project::{FileConsensusConfig, FileProjectConfig, FileStageConfig, ProjectConfigError};
pub use workflow::FileWorkflowConfig;

use screening_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Workflow behavior
    pub workflow: FileWorkflowConfig,
    /// Log level, audit trail and log files
    pub logging: FileLoggingConfig,
    /// Review project catalog; the CLI falls back to a built-in sample
    pub project: Option<FileProjectConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. The logging level
    /// 2. The acting user
    /// 3. The project catalog (stage types, roles, counts, consensus thresholds)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.logging.parse_level().1);

        if self.workflow.actor.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingValue {
                    field: "workflow.actor".to_string(),
                },
                "workflow.actor is empty; notifications will carry no actor",
            ));
        }

        if let Some(project) = &self.project {
            issues.extend(project.validate());
        }

        issues
    }

    /// The configured project, or the built-in sample
    pub fn project_or_sample(&self) -> FileProjectConfig {
        self.project.clone().unwrap_or_else(FileProjectConfig::sample)
    }
}
