//! Inspection algorithms
//!
//! Every check kind is a variant of [`Check`]. A check is a pure function of
//! the scope instance, the rule's parameters and the activity catalog; it
//! never fails; it reports violations as [`Findings`].

mod counting;
mod naming;
mod properties;
mod security;
mod typing;

use crate::catalog::ActivityCatalog;
use crate::inspection::Findings;
use crate::model::{Activity, Argument, Variable};
use crate::params::ParameterStore;
use crate::rule::{Scope, ScopeKind};
use crate::typename::{bare_type_name, TypeName};

/// Which named elements a naming or typing check scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTarget {
    /// The project display name
    Project,
    /// Public arguments of a workflow
    WorkflowArguments,
    /// Variables declared on an activity
    ActivityVariables,
    /// Arguments of an activity
    ActivityArguments,
}

impl NameTarget {
    fn scope(self) -> ScopeKind {
        match self {
            NameTarget::Project => ScopeKind::Project,
            NameTarget::WorkflowArguments => ScopeKind::Workflow,
            NameTarget::ActivityVariables | NameTarget::ActivityArguments => ScopeKind::Activity,
        }
    }
}

/// How an activity is recognized as a given kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Simple name of the implementation type
    Type(String),
    /// Toolbox name, compared case-insensitively
    Toolbox(String),
}

impl NodeKind {
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Type(name) | NodeKind::Toolbox(name) => name,
        }
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        match self {
            NodeKind::Type(name) => bare_type_name(&activity.type_id) == Some(name.as_str()),
            NodeKind::Toolbox(name) => activity.toolbox_name.eq_ignore_ascii_case(name),
        }
    }
}

/// Predicate counted by [`Check::SubtreeCount`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePredicate {
    /// Non-blank annotation text
    Annotated,
    /// Toolbox name, compared case-insensitively
    Toolbox(String),
}

impl NodePredicate {
    fn matches(&self, activity: &Activity) -> bool {
        match self {
            NodePredicate::Annotated => activity.is_annotated(),
            NodePredicate::Toolbox(name) => activity.toolbox_name.eq_ignore_ascii_case(name),
        }
    }
}

/// One boolean property gated by [`Check::PropertyFlag`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagGate {
    /// Property name, matched case-insensitively
    pub property: String,
    /// Treat a value that is not a boolean literal as set
    pub unparseable_fails: bool,
}

impl FlagGate {
    pub fn new(property: &str, unparseable_fails: bool) -> Self {
        Self {
            property: property.to_string(),
            unparseable_fails,
        }
    }
}

/// The set of inspection algorithms a rule can be bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Full-match names against a pattern, then check capture group 1
    /// against an allow-list
    NameFormat {
        target: NameTarget,
        pattern_key: String,
        allowed_key: String,
    },
    /// Names must start with one of the listed prefixes
    NamePrefix {
        target: NameTarget,
        prefixes_key: String,
    },
    /// Type names must not contain any denied fragment
    DeniedTypeFragment {
        target: NameTarget,
        denied_key: String,
    },
    /// Count matching nodes under the workflow root against a minimum
    SubtreeCount {
        predicate: NodePredicate,
        minimum_key: String,
        zero_disables: bool,
        noun: String,
    },
    /// The project must contain every named workflow
    RequiredWorkflows { names: Vec<String> },
    /// The activity still carries its default display name
    DefaultDisplayName,
    /// Variables with a sensitive word in the name must use a secure type
    SensitiveNameSecureType { words_key: String, secure_type: String },
    /// A secure-input flag and a secure result variable must agree
    SecureInputCorrelation {
        kind: NodeKind,
        flag_property: String,
        result_argument: String,
        secure_type: String,
    },
    /// Boolean properties that must not be true
    PropertyFlag { gates: Vec<FlagGate> },
    /// A property of a kind must equal an expected literal
    PropertyEquals {
        kind: NodeKind,
        property: String,
        expected: String,
    },
    /// At least one of two arguments must be bound
    EitherArgument {
        kind: NodeKind,
        arguments: [String; 2],
    },
    /// Argument expressions must not reference sensitive words
    SensitiveText {
        kinds: Vec<NodeKind>,
        words_key: String,
    },
    /// The kind must not be used at all
    ForbiddenKind { kind: NodeKind },
}

impl Check {
    /// Scope the check is written against
    pub fn scope(&self) -> ScopeKind {
        match self {
            Check::NameFormat { target, .. }
            | Check::NamePrefix { target, .. }
            | Check::DeniedTypeFragment { target, .. } => target.scope(),
            Check::SubtreeCount { .. } => ScopeKind::Workflow,
            Check::RequiredWorkflows { .. } => ScopeKind::Project,
            Check::DefaultDisplayName
            | Check::SensitiveNameSecureType { .. }
            | Check::SecureInputCorrelation { .. }
            | Check::PropertyFlag { .. }
            | Check::PropertyEquals { .. }
            | Check::EitherArgument { .. }
            | Check::SensitiveText { .. }
            | Check::ForbiddenKind { .. } => ScopeKind::Activity,
        }
    }

    /// Parameter keys the check reads
    pub fn parameter_keys(&self) -> Vec<&str> {
        match self {
            Check::NameFormat {
                pattern_key,
                allowed_key,
                ..
            } => vec![pattern_key.as_str(), allowed_key.as_str()],
            Check::NamePrefix { prefixes_key, .. } => vec![prefixes_key.as_str()],
            Check::DeniedTypeFragment { denied_key, .. } => vec![denied_key.as_str()],
            Check::SubtreeCount { minimum_key, .. } => vec![minimum_key.as_str()],
            Check::SensitiveNameSecureType { words_key, .. }
            | Check::SensitiveText { words_key, .. } => vec![words_key.as_str()],
            _ => Vec::new(),
        }
    }

    /// Run the check against one scope instance
    pub fn inspect(
        &self,
        scope: Scope<'_>,
        params: &ParameterStore,
        catalog: &ActivityCatalog,
    ) -> Findings {
        if scope.kind() != self.scope() {
            return Findings::none();
        }

        match self {
            Check::NameFormat {
                target,
                pattern_key,
                allowed_key,
            } => naming::name_format(&elements(*target, scope), params, pattern_key, allowed_key),
            Check::NamePrefix {
                target,
                prefixes_key,
            } => naming::name_prefix(&elements(*target, scope), params, prefixes_key),
            Check::DeniedTypeFragment { target, denied_key } => {
                typing::denied_type_fragment(&elements(*target, scope), params, denied_key)
            }
            Check::SubtreeCount {
                predicate,
                minimum_key,
                zero_disables,
                noun,
            } => match scope {
                Scope::Workflow(workflow) => counting::subtree_count(
                    workflow,
                    predicate,
                    params,
                    minimum_key,
                    *zero_disables,
                    noun,
                ),
                _ => Findings::none(),
            },
            Check::RequiredWorkflows { names } => match scope {
                Scope::Project(project) => counting::required_workflows(project, names),
                _ => Findings::none(),
            },
            Check::DefaultDisplayName => match scope {
                Scope::Activity { activity, .. } => naming::default_display_name(activity, catalog),
                _ => Findings::none(),
            },
            Check::SensitiveNameSecureType {
                words_key,
                secure_type,
            } => match scope {
                Scope::Activity { activity, .. } => {
                    security::sensitive_name_secure_type(activity, params, words_key, secure_type)
                }
                _ => Findings::none(),
            },
            Check::SecureInputCorrelation {
                kind,
                flag_property,
                result_argument,
                secure_type,
            } => match scope {
                Scope::Activity { workflow, activity } => security::secure_input_correlation(
                    workflow,
                    activity,
                    kind,
                    flag_property,
                    result_argument,
                    secure_type,
                ),
                _ => Findings::none(),
            },
            Check::PropertyFlag { gates } => match scope {
                Scope::Activity { activity, .. } => properties::property_flag(activity, gates),
                _ => Findings::none(),
            },
            Check::PropertyEquals {
                kind,
                property,
                expected,
            } => match scope {
                Scope::Activity { activity, .. } => {
                    properties::property_equals(activity, kind, property, expected)
                }
                _ => Findings::none(),
            },
            Check::EitherArgument { kind, arguments } => match scope {
                Scope::Activity { activity, .. } => {
                    properties::either_argument(activity, kind, arguments)
                }
                _ => Findings::none(),
            },
            Check::SensitiveText { kinds, words_key } => match scope {
                Scope::Activity { activity, .. } => {
                    security::sensitive_text(activity, kinds, params, words_key)
                }
                _ => Findings::none(),
            },
            Check::ForbiddenKind { kind } => match scope {
                Scope::Activity { activity, .. } => properties::forbidden_kind(activity, kind),
                _ => Findings::none(),
            },
        }
    }
}

/// A named, optionally typed element collected for a scan
struct Element<'a> {
    name: &'a str,
    type_name: Option<&'a TypeName>,
    noun: &'static str,
}

impl<'a> Element<'a> {
    fn variable(v: &'a Variable) -> Self {
        Self {
            name: &v.name,
            type_name: Some(&v.type_name),
            noun: "Variable",
        }
    }

    fn argument(a: &'a Argument) -> Self {
        Self {
            name: &a.name,
            type_name: Some(&a.type_name),
            noun: "Argument",
        }
    }
}

fn elements<'a>(target: NameTarget, scope: Scope<'a>) -> Vec<Element<'a>> {
    match (target, scope) {
        (NameTarget::Project, Scope::Project(project)) => vec![Element {
            name: &project.name,
            type_name: None,
            noun: "Project",
        }],
        (NameTarget::WorkflowArguments, Scope::Workflow(workflow)) => {
            workflow.arguments.iter().map(Element::argument).collect()
        }
        (NameTarget::ActivityVariables, Scope::Activity { activity, .. }) => {
            activity.variables.iter().map(Element::variable).collect()
        }
        (NameTarget::ActivityArguments, Scope::Activity { activity, .. }) => {
            activity.arguments.iter().map(Element::argument).collect()
        }
        _ => Vec::new(),
    }
}

/// Parse a boolean literal the way property definitions store it
///
/// Expressions and sentinels such as "Same as project" are not literals.
pub fn parse_bool_literal(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
