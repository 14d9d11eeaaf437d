//! Diagnostic types for analysis results

use crate::rule::ScopeKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Warning - policy should be followed
    #[default]
    Warning,
    /// Error - policy is mandatory
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "verbose" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// Where in the process tree a diagnostic was raised
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Snapshot file the project was loaded from
    pub file: Option<PathBuf>,
    /// Workflow name, for workflow and activity scopes
    pub workflow: Option<String>,
    /// Activity display names from the root down
    pub activity_path: Vec<String>,
}

impl Location {
    pub fn project() -> Self {
        Self::default()
    }

    pub fn workflow(name: &str) -> Self {
        Self {
            workflow: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn activity(workflow: &str, path: &[&str]) -> Self {
        Self {
            workflow: Some(workflow.to_string()),
            activity_path: path.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn in_file(mut self, file: PathBuf) -> Self {
        self.file = Some(file);
        self
    }

    /// Human-readable scope path, e.g. `Main > Sequence > Log Start`
    pub fn path(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(wf) = &self.workflow {
            parts.push(wf);
        }
        parts.extend(self.activity_path.iter().map(String::as_str));
        parts.join(" > ")
    }
}

/// A failed rule invocation, as reported to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule ID that triggered this diagnostic
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Scope the rule was evaluated against
    pub scope: ScopeKind,
    /// Project the scope belongs to
    pub project: String,
    /// Position inside the project
    pub location: Location,
    /// One entry per violation found by the invocation
    pub messages: Vec<String>,
    /// What to do about it
    pub recommendation: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(rule_id: &str, severity: Severity, scope: ScopeKind, project: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            scope,
            project: project.to_string(),
            location: Location::default(),
            messages: Vec::new(),
            recommendation: None,
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.messages.push(message.to_string());
        self
    }

    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn with_recommendation(mut self, recommendation: &str) -> Self {
        self.recommendation = Some(recommendation.to_string());
        self
    }

    /// First message, used by one-line formatters
    pub fn headline(&self) -> &str {
        self.messages.first().map(String::as_str).unwrap_or("")
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}
