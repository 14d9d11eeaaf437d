//! Flowlint - Workflow Analyzer
//!
//! A static analyzer for automation process definitions. A project is a set
//! of workflows, each a tree of activities; rules inspect the project, each
//! workflow or each activity and report policy violations.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Engine -> RuleRegistry -> Rule -> Check -> Project model
//! ```
//!
//! The engine applies configuration to the registry, walks every project it
//! is given and turns failing [`InspectionResult`]s into [`Diagnostic`]s.
//!
//! # Example
//!
//! ```
//! use flowlint::{ActivityDraft, Config, Engine, Project, Workflow};
//!
//! let main = Workflow::new(
//!     "Main",
//!     Vec::new(),
//!     ActivityDraft::new("Wait", "System.Activities.Statements.Delay"),
//! );
//! let project = Project::new("FIN_Invoices").with_workflow(main);
//!
//! let engine = Engine::new(Config::new()).unwrap();
//! let result = engine.lint_project(&project, None);
//! assert!(result.diagnostics.iter().any(|d| d.rule_id == "no-delay-activity"));
//! ```

pub mod builtin;
pub mod catalog;
pub mod checks;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod inspection;
pub mod loader;
pub mod model;
pub mod output;
pub mod params;
pub mod registry;
pub mod rule;
pub mod typename;

// Re-export main types
pub use catalog::{ActivityCatalog, ActivityKind};
pub use checks::Check;
pub use config::Config;
pub use diagnostic::{Diagnostic, Location, Severity};
pub use engine::{Engine, LintResult, RuleTiming};
pub use inspection::{Findings, InspectionResult};
pub use loader::{load_project, parse_project, LoadError, SnapshotFormat};
pub use model::{Activity, ActivityDraft, ActivityId, Argument, Project, Property, Variable, Workflow};
pub use params::{Parameter, ParameterStore};
pub use registry::{RegistryError, RuleRegistry};
pub use rule::{Rule, RuleCategory, Scope, ScopeKind};
pub use typename::TypeName;
