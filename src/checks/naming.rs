//! Naming checks: name format, prefixes and default display names

use super::Element;
use crate::catalog::ActivityCatalog;
use crate::inspection::Findings;
use crate::model::Activity;
use crate::params::ParameterStore;
use regex::Regex;

/// Compile a configured pattern so it must match the whole name
fn full_match(pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::debug!("ignoring invalid name pattern '{}': {}", pattern, e);
            None
        }
    }
}

pub(super) fn name_format(
    elements: &[Element<'_>],
    params: &ParameterStore,
    pattern_key: &str,
    allowed_key: &str,
) -> Findings {
    let Some(pattern) = params.resolve(pattern_key) else {
        return Findings::none();
    };
    let Some(regex) = full_match(pattern) else {
        return Findings::none();
    };
    let allowed = params.resolve_list(allowed_key);

    let mut findings = Findings::none();
    for element in elements {
        let Some(caps) = regex.captures(element.name) else {
            findings.push(format!(
                "{} name '{}' does not match the required format '{}'",
                element.noun, element.name, pattern
            ));
            continue;
        };

        // the allow-list applies to the first capture group, an absent group reads as ""
        if let Some(allowed) = &allowed {
            let group = caps.get(1).map_or("", |m| m.as_str());
            if !allowed.iter().any(|a| a == group) {
                findings.push(format!(
                    "'{}' in {} name '{}' is not an allowed value",
                    group,
                    element.noun.to_lowercase(),
                    element.name
                ));
            }
        }
    }

    match allowed {
        Some(allowed) => findings.with_note(format!("Allowed values: {}", allowed.join(", "))),
        None => findings,
    }
}

pub(super) fn name_prefix(
    elements: &[Element<'_>],
    params: &ParameterStore,
    prefixes_key: &str,
) -> Findings {
    let Some(prefixes) = params.resolve_list(prefixes_key) else {
        return Findings::none();
    };

    let mut findings = Findings::none();
    for element in elements {
        if !prefixes.iter().any(|p| element.name.starts_with(p.as_str())) {
            findings.push(format!(
                "{} '{}' does not start with one of the required prefixes",
                element.noun, element.name
            ));
        }
    }
    findings.with_note(format!("Required prefixes: {}", prefixes.join(", ")))
}

pub(super) fn default_display_name(activity: &Activity, catalog: &ActivityCatalog) -> Findings {
    match catalog.default_display_name(&activity.type_id) {
        Some(default) if default == activity.name => Findings::one(format!(
            "Activity '{}' still uses its default display name",
            activity.name
        )),
        Some(_) => Findings::none(),
        None => {
            log::debug!(
                "no catalog entry for '{}', cannot tell whether '{}' was renamed",
                activity.type_id,
                activity.name
            );
            Findings::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::ActivityCatalog;
    use crate::checks::{Check, NameTarget};
    use crate::model::{ActivityDraft, Project, Variable, Workflow};
    use crate::params::{Parameter, ParameterStore};
    use crate::rule::Scope;

    const NAME_PATTERN: &str = "([A-Za-z0-9]+)_([A-Za-z0-9]+)";

    fn params(allowed: &str) -> ParameterStore {
        let mut store = ParameterStore::new();
        store.insert(Parameter::new("pattern", NAME_PATTERN, "Name format"));
        store.insert(Parameter::new("allowed", allowed, "Allowed prefixes"));
        store
    }

    fn project_check() -> Check {
        Check::NameFormat {
            target: NameTarget::Project,
            pattern_key: "pattern".into(),
            allowed_key: "allowed".into(),
        }
    }

    fn check_project(name: &str, allowed: &str) -> Vec<String> {
        let project = Project::new(name);
        project_check()
            .inspect(Scope::Project(&project), &params(allowed), &ActivityCatalog::new())
            .messages()
            .to_vec()
    }

    #[test]
    fn test_project_name_in_allow_list() {
        assert!(check_project("FIN_InvoiceProcessing", "FIN|HR|IT").is_empty());
    }

    #[test]
    fn test_project_name_group_not_allowed() {
        let messages = check_project("Finance_Invoices", "FIN|HR|IT");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Finance_Invoices"));
        assert!(messages[0].contains("'Finance'"));
    }

    #[test]
    fn test_project_name_no_match() {
        let messages = check_project("InvoiceProcessing", "FIN|HR|IT");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("does not match"));
    }

    #[test]
    fn test_pattern_must_match_whole_name() {
        // an unanchored search would find "FIN_Invoice" inside
        assert_eq!(check_project("FIN_Invoice Processing", "FIN").len(), 1);
    }

    #[test]
    fn test_blank_allow_list_accepts_any_match() {
        assert!(check_project("Finance_Invoices", "").is_empty());
        assert!(check_project("Finance_Invoices", " | ").is_empty());
    }

    #[test]
    fn test_unmatched_group_is_checked_against_allow_list() {
        let project = Project::new("Invoices");
        let mut store = params("FIN|HR");
        store.set("pattern", "(?:([A-Z]+)_)?[A-Za-z]+");
        let findings =
            project_check().inspect(Scope::Project(&project), &store, &ActivityCatalog::new());
        assert_eq!(findings.messages().len(), 1);
        assert!(findings.messages()[0].contains("''"));

        // same for a pattern without any capture group
        store.set("pattern", "[A-Za-z]+");
        let findings =
            project_check().inspect(Scope::Project(&project), &store, &ActivityCatalog::new());
        assert_eq!(findings.messages().len(), 1);

        store.set("allowed", "");
        let findings =
            project_check().inspect(Scope::Project(&project), &store, &ActivityCatalog::new());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_blank_or_invalid_pattern_is_inapplicable() {
        let project = Project::new("whatever name");
        let mut store = params("FIN");
        store.set("pattern", "");
        let findings =
            project_check().inspect(Scope::Project(&project), &store, &ActivityCatalog::new());
        assert!(findings.is_empty());

        store.set("pattern", "([A-Z");
        let findings =
            project_check().inspect(Scope::Project(&project), &store, &ActivityCatalog::new());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_variable_scan_reports_each_offender() {
        let root = ActivityDraft::new("Main", "Sequence")
            .with_variable(Variable::new("str_CustomerName", "System.String"))
            .with_variable(Variable::new("x_CustomerName", "System.String"))
            .with_variable(Variable::new("CustomerName", "System.String"))
            .with_variable(Variable::new("dt_Orders", "System.Data.DataTable"));
        let wf = Workflow::new("Main", Vec::new(), root);
        let check = Check::NameFormat {
            target: NameTarget::ActivityVariables,
            pattern_key: "pattern".into(),
            allowed_key: "allowed".into(),
        };

        let findings = check.inspect(
            Scope::Activity {
                workflow: &wf,
                activity: wf.root(),
            },
            &params("dt|list|str"),
            &ActivityCatalog::new(),
        );

        let messages = findings.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("x_CustomerName"));
        assert!(messages[1].contains("CustomerName"));
    }

    #[test]
    fn test_argument_prefixes() {
        let wf = Workflow::new(
            "Process",
            vec![
                crate::model::Argument::new("in_Config", "System.String"),
                crate::model::Argument::new("Config", "System.String"),
                crate::model::Argument::new("io_Count", "System.Int32"),
            ],
            ActivityDraft::new("Main", "Sequence"),
        );
        let mut store = ParameterStore::new();
        store.insert(Parameter::new("prefixes", "in_|out_|io_", "Prefixes"));
        let check = Check::NamePrefix {
            target: NameTarget::WorkflowArguments,
            prefixes_key: "prefixes".into(),
        };

        let findings = check.inspect(Scope::Workflow(&wf), &store, &ActivityCatalog::new());
        assert_eq!(findings.messages().len(), 1);
        assert!(findings.messages()[0].contains("'Config'"));
    }

    #[test]
    fn test_default_display_name() {
        let catalog = ActivityCatalog::builtin();
        let root = ActivityDraft::new("Sequence", "System.Activities.Statements.Sequence")
            .with_child(ActivityDraft::new("Log Message", "UiPath.Core.Activities.LogMessage"))
            .with_child(ActivityDraft::new("Log Start", "UiPath.Core.Activities.LogMessage"))
            .with_child(ActivityDraft::new("Do Stuff", "Acme.Activities.DoStuff"));
        let wf = Workflow::new("Main", Vec::new(), root);

        let flagged: Vec<&str> = wf
            .walk()
            .filter(|activity| {
                !Check::DefaultDisplayName
                    .inspect(
                        Scope::Activity {
                            workflow: &wf,
                            activity,
                        },
                        &ParameterStore::new(),
                        &catalog,
                    )
                    .is_empty()
            })
            .map(|a| a.name.as_str())
            .collect();

        assert_eq!(flagged, vec!["Sequence", "Log Message"]);
    }
}
