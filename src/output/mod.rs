//! Output formatters for lint results

mod compact;
mod json;
mod text;

pub use compact::CompactFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::config::OutputFormat;
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire lint result
    fn format(&self, result: &LintResult) -> String;

    /// Format a single diagnostic
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}

/// Pick a formatter for a configured output format
pub fn formatter_for(format: OutputFormat, colored: bool, show_stats: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::new();
            formatter.colored = colored;
            formatter.show_stats = show_stats;
            Box::new(formatter)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
        OutputFormat::Compact => Box::new(CompactFormatter::new()),
    }
}

/// `file` or project name, then the scope path when there is one
fn origin(diag: &Diagnostic) -> String {
    let head = match &diag.location.file {
        Some(file) => file.display().to_string(),
        None => diag.project.clone(),
    };
    let path = diag.location.path();
    if path.is_empty() {
        head
    } else {
        format!("{}: {}", head, path)
    }
}
