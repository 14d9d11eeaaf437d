//! Inspection results and message aggregation
//!
//! Checks report raw [`Findings`]; the rule turns them into one
//! [`InspectionResult`] carrying its severity and recommendation.

use crate::diagnostic::Severity;
use serde::Serialize;

/// Messages produced by one check invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    messages: Vec<String>,
    note: Option<String>,
}

impl Findings {
    /// Nothing to report
    pub fn none() -> Self {
        Self::default()
    }

    /// A single violation
    pub fn one(message: String) -> Self {
        Self {
            messages: vec![message],
            note: None,
        }
    }

    pub fn push(&mut self, message: String) {
        self.messages.push(message);
    }

    /// Extra line appended to the rule's recommendation when reporting
    pub fn with_note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

/// Outcome of running one rule against one scope instance
///
/// `has_errors` is true exactly when there is at least one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionResult {
    has_errors: bool,
    messages: Vec<String>,
    recommendation: Option<String>,
    severity: Option<Severity>,
}

impl InspectionResult {
    /// A passing result
    pub fn pass() -> Self {
        Self {
            has_errors: false,
            messages: Vec::new(),
            recommendation: None,
            severity: None,
        }
    }

    /// Bundle findings under a severity and recommendation
    ///
    /// Empty findings always produce a passing result.
    pub fn from_findings(findings: Findings, recommendation: &str, severity: Severity) -> Self {
        if findings.is_empty() {
            return Self::pass();
        }

        let recommendation = match findings.note {
            Some(note) if recommendation.is_empty() => note,
            Some(note) => format!("{}\n{}", recommendation, note),
            None => recommendation.to_string(),
        };

        Self {
            has_errors: true,
            messages: findings.messages,
            recommendation: Some(recommendation),
            severity: Some(severity),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn recommendation(&self) -> Option<&str> {
        self.recommendation.as_deref()
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }
}
