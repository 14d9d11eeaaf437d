//! Rule descriptors
//!
//! A [`Rule`] binds an identifier, a scope, a severity and a recommendation
//! to a [`Check`] and the parameters that configure it.

use crate::catalog::ActivityCatalog;
use crate::checks::Check;
use crate::diagnostic::Severity;
use crate::inspection::InspectionResult;
use crate::model::{Activity, Project, Workflow};
use crate::params::{Parameter, ParameterStore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model level a rule is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Project,
    Workflow,
    Activity,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Project => write!(f, "project"),
            ScopeKind::Workflow => write!(f, "workflow"),
            ScopeKind::Activity => write!(f, "activity"),
        }
    }
}

/// A scope instance handed to a check
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Project(&'a Project),
    Workflow(&'a Workflow),
    Activity {
        workflow: &'a Workflow,
        activity: &'a Activity,
    },
}

impl<'a> Scope<'a> {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Project(_) => ScopeKind::Project,
            Scope::Workflow(_) => ScopeKind::Workflow,
            Scope::Activity { .. } => ScopeKind::Activity,
        }
    }

    pub fn display_name(&self) -> &'a str {
        match self {
            Scope::Project(p) => &p.name,
            Scope::Workflow(w) => &w.name,
            Scope::Activity { activity, .. } => &activity.name,
        }
    }
}

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    /// Naming conventions
    Naming,
    /// Type usage
    Usage,
    /// Documentation and logging
    Maintainability,
    /// Handling of credentials and sensitive data
    Security,
    /// General design guidance
    #[default]
    BestPractice,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Naming => write!(f, "naming"),
            RuleCategory::Usage => write!(f, "usage"),
            RuleCategory::Maintainability => write!(f, "maintainability"),
            RuleCategory::Security => write!(f, "security"),
            RuleCategory::BestPractice => write!(f, "best-practice"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naming" | "nmg" => Ok(RuleCategory::Naming),
            "usage" | "usg" => Ok(RuleCategory::Usage),
            "maintainability" | "maint" => Ok(RuleCategory::Maintainability),
            "security" | "sec" => Ok(RuleCategory::Security),
            "best-practice" | "bestpractice" | "bp" => Ok(RuleCategory::BestPractice),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A rule definition
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique rule identifier (e.g., "project-naming")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Scope the rule is evaluated against
    pub scope: ScopeKind,

    /// Default severity level
    pub severity: Severity,

    /// Rule category
    pub category: RuleCategory,

    /// Shown with every failing result
    pub recommendation: String,

    /// Configurable parameters
    pub parameters: ParameterStore,

    /// Inspection performed by the rule
    pub check: Check,

    /// Whether this rule is enabled by default
    pub enabled: bool,

    /// Tags for filtering
    pub tags: Vec<String>,
}

impl Rule {
    /// Create a new rule; the scope is taken from the check
    pub fn new(id: &str, name: &str, check: Check) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            scope: check.scope(),
            severity: Severity::Warning,
            category: RuleCategory::default(),
            recommendation: String::new(),
            parameters: ParameterStore::new(),
            check,
            enabled: true,
            tags: Vec::new(),
        }
    }

    /// Bind the rule to a scope explicitly
    pub fn with_scope(mut self, scope: ScopeKind) -> Self {
        self.scope = scope;
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the rule category
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_recommendation(mut self, text: &str) -> Self {
        self.recommendation = text.to_string();
        self
    }

    /// Declare a parameter with its default value
    pub fn with_parameter(mut self, key: &str, default_value: &str, label: &str) -> Self {
        self.parameters
            .insert(Parameter::new(key, default_value, label));
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Disable by default
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Run the rule against one scope instance
    ///
    /// A scope of the wrong kind is not an error, it simply passes.
    pub fn inspect(&self, scope: Scope<'_>, catalog: &ActivityCatalog) -> InspectionResult {
        if scope.kind() != self.scope {
            return InspectionResult::pass();
        }
        let findings = self.check.inspect(scope, &self.parameters, catalog);
        InspectionResult::from_findings(findings, &self.recommendation, self.severity)
    }
}
