//! Compact output formatter
//!
//! One line per message, minimal output for scripting.

use super::{origin, OutputFormatter};
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Compact one-line-per-message formatter
pub struct CompactFormatter {
    /// Show severity prefix
    pub show_severity: bool,
    /// Show rule ID
    pub show_rule: bool,
}

impl CompactFormatter {
    /// Create a new compact formatter
    pub fn new() -> Self {
        Self {
            show_severity: true,
            show_rule: true,
        }
    }

    /// Hide severity prefix
    pub fn without_severity(mut self) -> Self {
        self.show_severity = false;
        self
    }

    /// Hide rule ID
    pub fn without_rule(mut self) -> Self {
        self.show_rule = false;
        self
    }
}

impl Default for CompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CompactFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
        }

        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut prefix = vec![origin(diagnostic)];
        if self.show_severity {
            prefix.push(diagnostic.severity.to_string());
        }
        if self.show_rule {
            prefix.push(diagnostic.rule_id.clone());
        }
        let prefix = prefix.join(": ");

        diagnostic
            .messages
            .iter()
            .map(|message| format!("{}: {}\n", prefix, message))
            .collect()
    }
}
