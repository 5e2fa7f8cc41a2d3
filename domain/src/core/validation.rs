//! Structured validation issues for review configuration.
//!
//! Configuration sources (TOML files, APIs) describe stage catalogs with
//! loosely-typed values. Validating them yields a list of [`ConfigIssue`]s
//! rather than failing on the first problem.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot be used at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A field holds a value outside its accepted set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A required field is blank.
    MissingValue { field: String },
    /// The project declares no stage definitions.
    NoStages,
    /// Two stage definitions share the same id.
    DuplicateStageId { id: String },
    /// A stage definition requests no reviewers.
    EmptyRequirement { stage: String },
    /// A role requests zero reviewers.
    ZeroReviewerCount { stage: String, role: String },
    /// The consensus threshold cannot be met by the requirement.
    UnreachableConsensus {
        stage: String,
        minimum_agreements: usize,
        total_required: usize,
    },
    /// Escalation is enabled but the project has no stage to escalate into.
    NoEscalationTarget,
}

/// A detected issue in a review configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    /// Create a warning-level issue
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
