//! Logging configuration from TOML (`[logging]` section)

use screening_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Raw logging configuration from TOML
///
/// # Example
///
/// ```toml
/// [logging]
/// level = "info"                       # used when no -v flag is given
/// audit_log = "screening-audit.jsonl"  # JSONL trail of workflow notifications
/// log_dir = "logs"                     # daily-rotated log files
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub level: String,
    pub audit_log: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            audit_log: None,
            log_dir: None,
        }
    }
}

impl FileLoggingConfig {
    /// Parse the level into a filter directive, returning warnings on failure.
    pub fn parse_level(&self) -> (&str, Vec<ConfigIssue>) {
        let level = self.level.trim().to_lowercase();
        match LEVELS.iter().find(|l| **l == level) {
            Some(valid) => (*valid, vec![]),
            None => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "logging.level".to_string(),
                        value: self.level.clone(),
                        valid_values: LEVELS.iter().map(|l| l.to_string()).collect(),
                    },
                    format!(
                        "logging.level: unknown value '{}', falling back to 'info'",
                        self.level
                    ),
                );
                ("info", vec![issue])
            }
        }
    }
}
