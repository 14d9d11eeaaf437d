//! Activity kind catalog
//!
//! Maps implementation type names to designer metadata, so default display
//! names are known without loading the activity packages themselves.

use crate::typename::bare_type_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Designer metadata for an activity implementation type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityKind {
    /// Simple type name, e.g. "LogMessage"
    pub type_name: String,

    /// Explicit designer display name; when absent the type name is humanized
    #[serde(default)]
    pub display_name: Option<String>,

    /// Toolbox category
    #[serde(default)]
    pub category: Option<String>,
}

impl ActivityKind {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            display_name: None,
            category: None,
        }
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// The name the designer gives a freshly dropped activity
    pub fn default_display_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| humanize(&self.type_name))
    }
}

/// Lookup table of known activity kinds, keyed by simple type name
#[derive(Debug, Clone, Default)]
pub struct ActivityCatalog {
    kinds: HashMap<String, ActivityKind>,
}

impl ActivityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of common workflow and automation activities
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let entries = [
            // Workflow primitives
            ("Sequence", None, "Control"),
            ("Flowchart", None, "Control"),
            ("If", None, "Control"),
            ("While", None, "Control"),
            ("DoWhile", Some("Do While"), "Control"),
            ("ForEach", Some("For Each"), "Control"),
            ("Switch", None, "Control"),
            ("Assign", None, "Primitives"),
            ("Delay", None, "Primitives"),
            ("WriteLine", Some("Write Line"), "Primitives"),
            ("InvokeMethod", None, "Primitives"),
            ("TryCatch", Some("Try Catch"), "Error Handling"),
            ("Throw", None, "Error Handling"),
            ("Rethrow", None, "Error Handling"),
            ("StateMachine", Some("State Machine"), "State Machine"),
            ("State", None, "State Machine"),
            // Automation system activities
            ("LogMessage", None, "System"),
            ("InputDialog", None, "System"),
            ("MessageBox", Some("Message Box"), "System"),
            ("InvokeWorkflowFile", None, "System"),
            ("GetCredential", Some("Get Credential"), "System"),
            ("AddQueueItem", None, "Orchestrator"),
            ("GetTransactionItem", None, "Orchestrator"),
            ("SetTransactionStatus", None, "Orchestrator"),
            ("ReadRange", Some("Read Range"), "Spreadsheet"),
            ("WriteRange", Some("Write Range"), "Spreadsheet"),
            ("ExcelApplicationScope", Some("Excel Application Scope"), "Spreadsheet"),
            ("ExcelProcessScopeX", Some("Excel Process Scope"), "Spreadsheet"),
            ("GetOutlookMailMessages", None, "Mail"),
            ("SendOutlookMailMessage", None, "Mail"),
            ("TypeInto", Some("Type Into"), "UI Automation"),
            ("Click", None, "UI Automation"),
            ("ElementExists", Some("Element Exists"), "UI Automation"),
        ];

        for (type_name, display_name, category) in entries {
            let mut kind = ActivityKind::new(type_name).with_category(category);
            if let Some(name) = display_name {
                kind = kind.with_display_name(name);
            }
            catalog.insert(kind);
        }
        catalog
    }

    /// Add or replace a kind
    pub fn insert(&mut self, kind: ActivityKind) {
        self.kinds.insert(kind.type_name.clone(), kind);
    }

    /// Resolve a full type identifier to its catalog entry
    pub fn resolve(&self, type_id: &str) -> Option<&ActivityKind> {
        let name = bare_type_name(type_id)?;
        self.kinds.get(name)
    }

    /// Default display name for a type identifier, if the type is known
    pub fn default_display_name(&self, type_id: &str) -> Option<String> {
        self.resolve(type_id).map(ActivityKind::default_display_name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Turn a PascalCase type name into title-cased words
///
/// `GetOutlookMailMessages` becomes `Get Outlook Mail Messages`, acronyms stay
/// together (`HTTPRequest` becomes `HTTP Request`) and underscores split words.
pub fn humanize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let boundary = i > 0 && !current.is_empty() && {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_uppercase() && prev.is_uppercase() && next_lower)
                || (c.is_ascii_digit() && prev.is_alphabetic())
        };

        if boundary {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().chain(cs).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("LogMessage"), "Log Message");
        assert_eq!(humanize("GetOutlookMailMessages"), "Get Outlook Mail Messages");
        assert_eq!(humanize("HTTPRequest"), "HTTP Request");
        assert_eq!(humanize("Delay"), "Delay");
        assert_eq!(humanize("invoke_workflow"), "Invoke Workflow");
        assert_eq!(humanize("Base64Encode"), "Base 64 Encode");
    }

    #[test]
    fn test_resolve_strips_namespace_and_generics() {
        let catalog = ActivityCatalog::builtin();
        assert_eq!(
            catalog.default_display_name("UiPath.Core.Activities.LogMessage, UiPath.System.Activities"),
            Some("Log Message".to_string())
        );
        assert_eq!(
            catalog.default_display_name(
                "System.Activities.Statements.ForEach`1[[System.String, mscorlib]]"
            ),
            Some("For Each".to_string())
        );
    }

    #[test]
    fn test_unknown_type_is_none() {
        let catalog = ActivityCatalog::builtin();
        assert!(catalog.resolve("Acme.Custom.DoStuff").is_none());
        assert!(catalog.default_display_name("").is_none());
    }

    #[test]
    fn test_insert_overrides() {
        let mut catalog = ActivityCatalog::new();
        catalog.insert(ActivityKind::new("DoStuff"));
        assert_eq!(catalog.default_display_name("Acme.DoStuff"), Some("Do Stuff".into()));

        catalog.insert(ActivityKind::new("DoStuff").with_display_name("Stuff"));
        assert_eq!(catalog.default_display_name("Acme.DoStuff"), Some("Stuff".into()));
        assert_eq!(catalog.len(), 1);
    }
}
