//! Human-readable text output formatter

use super::{origin, OutputFormatter};
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show the rule recommendation under each diagnostic
    pub show_help: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_help: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
            Severity::Info => s.blue(),
        }
    }

    fn gutter(&self, mark: &str) -> String {
        if self.colored {
            mark.blue().to_string()
        } else {
            mark.to_string()
        }
    }

    fn count(&self, n: usize, singular: &str, plural: &str, paint: fn(&str) -> ColoredString) -> String {
        let s = format!("{} {}", n, if n == 1 { singular } else { plural });
        if self.colored {
            paint(&s).to_string()
        } else {
            s
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        // Diagnostics arrive grouped by project already
        let mut current: Option<&str> = None;
        for diag in &result.diagnostics {
            if current != Some(diag.project.as_str()) {
                if current.is_some() {
                    output.push('\n');
                }
                let title = format!("Project {}", diag.project);
                if self.colored {
                    output.push_str(&format!("{}\n", title.underline()));
                } else {
                    output.push_str(&format!("{}\n", title));
                }
                current = Some(diag.project.as_str());
            }
            output.push_str(&self.format_diagnostic(diag));
        }

        if self.show_stats {
            output.push_str(&format!(
                "\n{} {} inspected",
                result.projects_processed,
                if result.projects_processed == 1 {
                    "project"
                } else {
                    "projects"
                }
            ));

            let mut counts = Vec::new();
            if result.error_count > 0 {
                counts.push(self.count(result.error_count, "error", "errors", |s| s.red()));
            }
            if result.warning_count > 0 {
                counts.push(self.count(result.warning_count, "warning", "warnings", |s| s.yellow()));
            }
            if result.info_count > 0 {
                counts.push(self.count(result.info_count, "info", "infos", |s| s.blue()));
            }

            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                result.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}: {}[{}]: {}\n",
            origin(diag),
            self.severity_str(diag.severity),
            if self.colored {
                diag.rule_id.cyan().to_string()
            } else {
                diag.rule_id.clone()
            },
            diag.headline()
        ));

        for message in diag.messages.iter().skip(1) {
            output.push_str(&format!("   {} {}\n", self.gutter("|"), message));
        }

        if self.show_help {
            if let Some(help) = &diag.recommendation {
                let mut lines = help.lines();
                if let Some(first) = lines.next() {
                    output.push_str(&format!("   {} help: {}\n", self.gutter("="), first));
                }
                for line in lines {
                    output.push_str(&format!("   {} note: {}\n", self.gutter("="), line));
                }
            }
        }

        output
    }
}
