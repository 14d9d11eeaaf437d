//! Property and argument checks on single activities

use super::{parse_bool_literal, FlagGate, NodeKind};
use crate::inspection::Findings;
use crate::model::{Activity, Argument};

pub(super) fn property_flag(activity: &Activity, gates: &[FlagGate]) -> Findings {
    let mut findings = Findings::none();
    for property in &activity.properties {
        for gate in gates
            .iter()
            .filter(|g| property.name.eq_ignore_ascii_case(&g.property))
        {
            match parse_bool_literal(&property.value) {
                Some(true) => findings.push(format!(
                    "'{}' has '{}' set to true",
                    activity.name, property.name
                )),
                Some(false) => {}
                None if gate.unparseable_fails => findings.push(format!(
                    "'{}' does not set '{}' explicitly (value '{}')",
                    activity.name, property.name, property.value
                )),
                None => log::debug!(
                    "'{}' on '{}' is not a boolean literal",
                    property.name,
                    activity.name
                ),
            }
        }
    }
    findings
}

pub(super) fn property_equals(
    activity: &Activity,
    kind: &NodeKind,
    property: &str,
    expected: &str,
) -> Findings {
    if !kind.matches(activity) {
        return Findings::none();
    }

    let mut findings = Findings::none();
    for p in activity
        .properties
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(property))
    {
        if !p.value.trim().eq_ignore_ascii_case(expected) {
            findings.push(format!(
                "'{}' has '{}' set to '{}' instead of '{}'",
                activity.name, p.name, p.value, expected
            ));
        }
    }
    findings
}

pub(super) fn either_argument(activity: &Activity, kind: &NodeKind, names: &[String; 2]) -> Findings {
    if !kind.matches(activity) {
        return Findings::none();
    }

    let bound = names
        .iter()
        .any(|name| activity.argument(name).is_some_and(Argument::is_bound));
    if bound {
        return Findings::none();
    }

    Findings::one(format!(
        "'{}' sets neither '{}' nor '{}'",
        activity.name, names[0], names[1]
    ))
}

pub(super) fn forbidden_kind(activity: &Activity, kind: &NodeKind) -> Findings {
    if kind.matches(activity) {
        Findings::one(format!(
            "'{}' is a {} activity, which should not be used",
            activity.name,
            kind.name()
        ))
    } else {
        Findings::none()
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::ActivityCatalog;
    use crate::checks::{Check, FlagGate, NodeKind};
    use crate::inspection::Findings;
    use crate::model::{ActivityDraft, Argument, Workflow};
    use crate::params::ParameterStore;
    use crate::rule::Scope;

    fn run(check: &Check, draft: ActivityDraft) -> Findings {
        let wf = Workflow::new("Main", Vec::new(), draft);
        check.inspect(
            Scope::Activity {
                workflow: &wf,
                activity: wf.root(),
            },
            &ParameterStore::new(),
            &ActivityCatalog::new(),
        )
    }

    fn window_check() -> Check {
        Check::PropertyFlag {
            gates: vec![
                FlagGate::new("Show Excel window", true),
                FlagGate::new("Visible", false),
            ],
        }
    }

    #[test]
    fn test_modern_window_flag() {
        let scope = |value: &str| {
            ActivityDraft::new("Excel", "ExcelProcessScopeX").with_property("Show Excel Window", value)
        };
        assert_eq!(run(&window_check(), scope("True")).messages().len(), 1);
        assert!(run(&window_check(), scope("False")).is_empty());
        // "Same as project" is not a literal
        assert_eq!(run(&window_check(), scope("")).messages().len(), 1);
    }

    #[test]
    fn test_classic_visible_flag() {
        let scope =
            |value: &str| ActivityDraft::new("Excel", "ExcelApplicationScope").with_property("visible", value);
        assert_eq!(run(&window_check(), scope("TRUE")).messages().len(), 1);
        assert!(run(&window_check(), scope("false")).is_empty());
        assert!(run(&window_check(), scope("[showExcel]")).is_empty());
    }

    #[test]
    fn test_order_property() {
        let check = Check::PropertyEquals {
            kind: NodeKind::Toolbox("GetOutlookMailMessages".into()),
            property: "OrderByDate".into(),
            expected: "OldestFirst".into(),
        };
        let mail = |value: &str| {
            ActivityDraft::new("Get Mails", "UiPath.Mail.Outlook.Activities.GetOutlookMailMessages")
                .with_property("OrderByDate", value)
        };

        assert!(run(&check, mail("oldestfirst")).is_empty());
        let findings = run(&check, mail("NewestFirst"));
        assert_eq!(findings.messages().len(), 1);
        assert!(findings.messages()[0].contains("Get Mails"));
        assert!(findings.messages()[0].contains("OrderByDate"));

        let other = ActivityDraft::new("Sort", "Acme.Sort").with_property("OrderByDate", "NewestFirst");
        assert!(run(&check, other).is_empty());
    }

    #[test]
    fn test_either_argument() {
        let check = Check::EitherArgument {
            kind: NodeKind::Type("GetOutlookMailMessages".into()),
            arguments: ["Filter".into(), "FilterByMessageIds".into()],
        };
        let mail = || ActivityDraft::new("Get Mails", "UiPath.Mail.Outlook.Activities.GetOutlookMailMessages");

        assert_eq!(run(&check, mail()).messages().len(), 1);
        let empty = mail()
            .with_argument(Argument::new("Filter", "System.String").bound_to(""))
            .with_argument(Argument::new("FilterByMessageIds", "System.String"));
        assert_eq!(run(&check, empty).messages().len(), 1);

        let filtered =
            mail().with_argument(Argument::new("Filter", "System.String").bound_to("\"[Unread] = True\""));
        assert!(run(&check, filtered).is_empty());
        let by_id = mail()
            .with_argument(Argument::new("FilterByMessageIds", "System.String[]").bound_to("ids"));
        assert!(run(&check, by_id).is_empty());

        assert!(run(&check, ActivityDraft::new("Log", "LogMessage")).is_empty());
    }

    #[test]
    fn test_forbidden_kind() {
        let check = Check::ForbiddenKind {
            kind: NodeKind::Type("Delay".into()),
        };
        let findings = run(&check, ActivityDraft::new("Wait", "System.Activities.Statements.Delay"));
        assert_eq!(findings.messages().len(), 1);
        assert!(run(&check, ActivityDraft::new("Wait", "Acme.DelayedStart")).is_empty());
    }
}
