//! Built-in rule set

use crate::checks::{Check, FlagGate, NameTarget, NodeKind, NodePredicate};
use crate::diagnostic::Severity;
use crate::rule::{Rule, RuleCategory};

/// Default pattern for `Prefix_Description` names
pub const PREFIXED_NAME: &str = "([A-Za-z0-9]+)_([A-Za-z0-9]+)";

/// Workflows every framework-based project is expected to contain
pub const FRAMEWORK_WORKFLOWS: &[&str] = &[
    "InitAllSettings",
    "InitAllApplications",
    "KillAllProcesses",
    "CloseAllApplications",
];

/// Get all built-in rules, in reporting order
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "project-naming",
            "Project naming convention",
            Check::NameFormat {
                target: NameTarget::Project,
                pattern_key: "pattern".into(),
                allowed_key: "departments".into(),
            },
        )
        .with_category(RuleCategory::Naming)
        .with_recommendation("Name the project Department_MeaningfulDescription.")
        .with_parameter("pattern", PREFIXED_NAME, "Project name format")
        .with_parameter("departments", "FIN|HR|IT", "Departments, separated by '|'"),

        Rule::new(
            "variable-naming",
            "Variable naming convention",
            Check::NameFormat {
                target: NameTarget::ActivityVariables,
                pattern_key: "pattern".into(),
                allowed_key: "types".into(),
            },
        )
        .with_category(RuleCategory::Naming)
        .with_recommendation("Name variables VariableType_MeaningfulDescription.")
        .with_parameter("pattern", PREFIXED_NAME, "Variable name format")
        .with_parameter(
            "types",
            "dt|list|dict|str|int|dbl|arr|bool|dr|date|dec",
            "Variable type prefixes, separated by '|'",
        ),

        Rule::new(
            "argument-direction-prefix",
            "Arguments start with their direction",
            Check::NamePrefix {
                target: NameTarget::WorkflowArguments,
                prefixes_key: "prefixes".into(),
            },
        )
        .with_category(RuleCategory::Naming)
        .with_recommendation("Start argument names with their direction.")
        .with_parameter("prefixes", "in_|out_|io_", "Direction prefixes, separated by '|'"),

        Rule::new(
            "variable-type-explicit",
            "Variables use explicit types",
            Check::DeniedTypeFragment {
                target: NameTarget::ActivityVariables,
                denied_key: "invalid-types".into(),
            },
        )
        .with_category(RuleCategory::Usage)
        .with_recommendation(
            "Declare variables with the most specific type available instead of a catch-all type.",
        )
        .with_parameter("invalid-types", "Object|GenericValue", "Catch-all types, separated by '|'"),

        Rule::new(
            "argument-type-explicit",
            "Arguments use explicit types",
            Check::DeniedTypeFragment {
                target: NameTarget::WorkflowArguments,
                denied_key: "invalid-types".into(),
            },
        )
        .with_category(RuleCategory::Usage)
        .with_recommendation(
            "Declare arguments with the most specific type available instead of a catch-all type.",
        )
        .with_parameter("invalid-types", "Object|GenericValue", "Catch-all types, separated by '|'"),

        Rule::new(
            "activity-renamed",
            "Activities are renamed",
            Check::DefaultDisplayName,
        )
        .with_category(RuleCategory::Maintainability)
        .with_recommendation("Give each activity a name that says what it does."),

        Rule::new(
            "workflow-annotations",
            "Workflows are annotated",
            Check::SubtreeCount {
                predicate: NodePredicate::Annotated,
                minimum_key: "minimum".into(),
                zero_disables: true,
                noun: "annotated activities".into(),
            },
        )
        .with_category(RuleCategory::Maintainability)
        .with_recommendation("Annotate the important steps of the workflow.")
        .with_parameter("minimum", "2", "Minimum annotations per workflow (0 disables)"),

        Rule::new(
            "workflow-log-messages",
            "Workflows log their progress",
            Check::SubtreeCount {
                predicate: NodePredicate::Toolbox("LogMessage".into()),
                minimum_key: "minimum".into(),
                zero_disables: false,
                noun: "log messages".into(),
            },
        )
        .with_category(RuleCategory::Maintainability)
        .with_recommendation("Log the start, the end and the key decisions of the workflow.")
        .with_parameter("minimum", "2", "Minimum log messages per workflow"),

        Rule::new(
            "project-uses-framework",
            "Project is built on the standard framework",
            Check::RequiredWorkflows {
                names: FRAMEWORK_WORKFLOWS.iter().map(|s| s.to_string()).collect(),
            },
        )
        .with_category(RuleCategory::BestPractice)
        .with_recommendation("Start new projects from the standard process framework template."),

        Rule::new(
            "password-secure-type",
            "Password variables are secure strings",
            Check::SensitiveNameSecureType {
                words_key: "words".into(),
                secure_type: "SecureString".into(),
            },
        )
        .with_severity(Severity::Error)
        .with_category(RuleCategory::Security)
        .with_recommendation("Store passwords in SecureString variables so they stay encrypted in memory.")
        .with_parameter("words", "password|pw|pass", "Name fragments that mark a password, separated by '|'")
        .with_tag("credentials"),

        Rule::new(
            "password-dialog-secure",
            "Password dialogs are consistent",
            Check::SecureInputCorrelation {
                kind: NodeKind::Type("InputDialog".into()),
                flag_property: "IsPassword".into(),
                result_argument: "Result".into(),
                secure_type: "SecureString".into(),
            },
        )
        .with_severity(Severity::Error)
        .with_category(RuleCategory::Security)
        .with_recommendation(
            "Set IsPassword to true on input dialogs that ask for a password and store the result in a SecureString variable.",
        )
        .with_tag("credentials"),

        Rule::new(
            "no-delay-activity",
            "No fixed delays",
            Check::ForbiddenKind {
                kind: NodeKind::Type("Delay".into()),
            },
        )
        .with_category(RuleCategory::BestPractice)
        .with_recommendation("Wait for an application state or element instead of a fixed delay."),

        Rule::new(
            "excel-hidden",
            "Spreadsheets run in the background",
            Check::PropertyFlag {
                gates: vec![
                    FlagGate::new("Show Excel window", true),
                    FlagGate::new("Visible", false),
                ],
            },
        )
        .with_category(RuleCategory::BestPractice)
        .with_recommendation("Set 'Show Excel window' or 'Visible' to false on spreadsheet scopes.")
        .with_tag("excel"),

        Rule::new(
            "outlook-fifo",
            "Mail is processed oldest first",
            Check::PropertyEquals {
                kind: NodeKind::Toolbox("GetOutlookMailMessages".into()),
                property: "OrderByDate".into(),
                expected: "OldestFirst".into(),
            },
        )
        .with_category(RuleCategory::BestPractice)
        .with_recommendation("Set OrderByDate to OldestFirst so mail is processed first in, first out.")
        .with_tag("mail"),

        Rule::new(
            "outlook-filtered",
            "Mail queries are filtered",
            Check::EitherArgument {
                kind: NodeKind::Type("GetOutlookMailMessages".into()),
                arguments: ["Filter".into(), "FilterByMessageIds".into()],
            },
        )
        .with_category(RuleCategory::BestPractice)
        .with_recommendation("Filter mail queries so only relevant messages are retrieved.")
        .with_tag("mail"),

        Rule::new(
            "sensitive-not-logged",
            "Sensitive data is not logged",
            Check::SensitiveText {
                kinds: vec![
                    NodeKind::Toolbox("LogMessage".into()),
                    NodeKind::Toolbox("WriteLine".into()),
                ],
                words_key: "words".into(),
            },
        )
        .with_severity(Severity::Error)
        .with_category(RuleCategory::Security)
        .with_recommendation("Do not write personal data to logs or the console.")
        .with_parameter("words", "NRIC|Email|Phone|Mobile", "Sensitive words, separated by '|'"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ScopeKind;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_and_kebab_case() {
        let rules = builtin_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), rules.len());
        for id in ids {
            assert!(id.chars().all(|c| c.is_ascii_lowercase() || c == '-'), "{}", id);
        }
    }

    #[test]
    fn test_declared_parameters_cover_checks() {
        for rule in builtin_rules() {
            for key in rule.check.parameter_keys() {
                assert!(rule.parameters.contains(key), "{} lacks {}", rule.id, key);
            }
        }
    }

    #[test]
    fn test_security_rules_are_errors() {
        for rule in builtin_rules() {
            let expected = if rule.category == RuleCategory::Security {
                Severity::Error
            } else {
                Severity::Warning
            };
            assert_eq!(rule.severity, expected, "{}", rule.id);
        }
    }

    #[test]
    fn test_scopes() {
        let rules = builtin_rules();
        let count = |scope| rules.iter().filter(|r| r.scope == scope).count();
        assert_eq!(count(ScopeKind::Project), 2);
        assert_eq!(count(ScopeKind::Workflow), 4);
        assert_eq!(count(ScopeKind::Activity), 10);
    }
}
