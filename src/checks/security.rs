//! Checks around credentials and sensitive data

use super::{parse_bool_literal, NodeKind};
use crate::inspection::Findings;
use crate::model::{Activity, Workflow};
use crate::params::ParameterStore;
use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*""#).expect("valid quoted text pattern"));

pub(super) fn sensitive_name_secure_type(
    activity: &Activity,
    params: &ParameterStore,
    words_key: &str,
    secure_type: &str,
) -> Findings {
    let Some(words) = params.resolve_list(words_key) else {
        return Findings::none();
    };
    let words: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

    let mut findings = Findings::none();
    for variable in &activity.variables {
        let name = variable.name.to_lowercase();
        if !words.iter().any(|w| name.contains(w.as_str())) {
            continue;
        }
        if !variable.type_name.is_resolved() {
            log::debug!(
                "cannot resolve type '{}' of variable '{}'",
                variable.type_name,
                variable.name
            );
            continue;
        }
        if !variable.type_name.is(secure_type) {
            findings.push(format!(
                "Variable '{}' looks like it holds a credential but its type is '{}', not '{}'",
                variable.name, variable.type_name, secure_type
            ));
        }
    }
    findings
}

/// The flag property and the result variable's type must agree
///
/// The result argument names a variable declared on the parent activity.
/// Exactly one of "flag is true" and "variable is secure" is a violation;
/// both or neither is fine.
pub(super) fn secure_input_correlation(
    workflow: &Workflow,
    activity: &Activity,
    kind: &NodeKind,
    flag_property: &str,
    result_argument: &str,
    secure_type: &str,
) -> Findings {
    if !kind.matches(activity) {
        return Findings::none();
    }

    let flagged = match activity.property(flag_property) {
        Some(property) => parse_bool_literal(&property.value).unwrap_or_else(|| {
            log::debug!(
                "'{}' on '{}' is not a boolean literal: '{}'",
                flag_property,
                activity.name,
                property.value
            );
            false
        }),
        None => false,
    };

    let target = activity
        .argument(result_argument)
        .and_then(|a| a.expression.as_deref())
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let secure = target
        .and_then(|name| workflow.parent_of(activity)?.variable(name))
        .is_some_and(|v| v.type_name.is(secure_type));

    let target = target.unwrap_or("");
    match (secure, flagged) {
        (true, false) => Findings::one(format!(
            "'{}' stores its {} in '{}' of type '{}' but '{}' is not set to true",
            activity.name, result_argument, target, secure_type, flag_property
        )),
        (false, true) => Findings::one(format!(
            "'{}' has '{}' set to true but its {} '{}' is not a '{}' variable",
            activity.name, flag_property, result_argument, target, secure_type
        )),
        _ => Findings::none(),
    }
}

/// Scan argument expressions of output activities for sensitive words
///
/// Quoted literals are removed before the scan, then the expression is split
/// on `|` and every token is tested against every word.
pub(super) fn sensitive_text(
    activity: &Activity,
    kinds: &[NodeKind],
    params: &ParameterStore,
    words_key: &str,
) -> Findings {
    if !kinds.iter().any(|k| k.matches(activity)) {
        return Findings::none();
    }
    let Some(words) = params.resolve_list(words_key) else {
        return Findings::none();
    };

    let mut findings = Findings::none();
    for argument in &activity.arguments {
        let Some(expression) = argument.expression.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        let stripped = QUOTED_TEXT.replace_all(&expression.to_lowercase(), "").into_owned();
        let tokens: Vec<&str> = stripped.split('|').collect();

        for word in &words {
            let needle = word.to_lowercase();
            for token in &tokens {
                if token.contains(needle.as_str()) {
                    findings.push(format!(
                        "'{}' may output sensitive data matching '{}' in {}",
                        activity.name, word, argument.name
                    ));
                }
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use crate::catalog::ActivityCatalog;
    use crate::checks::{Check, NodeKind};
    use crate::model::{ActivityDraft, Argument, Variable, Workflow};
    use crate::params::{Parameter, ParameterStore};
    use crate::rule::Scope;

    fn dialog_check() -> Check {
        Check::SecureInputCorrelation {
            kind: NodeKind::Type("InputDialog".into()),
            flag_property: "IsPassword".into(),
            result_argument: "Result".into(),
            secure_type: "SecureString".into(),
        }
    }

    fn dialog_workflow(is_password: Option<&str>, variable_type: &str) -> Workflow {
        let mut dialog = ActivityDraft::new("Ask Password", "UiPath.Core.Activities.InputDialog")
            .with_argument(Argument::new("Result", "System.Object").bound_to("sec_Password"));
        if let Some(value) = is_password {
            dialog = dialog.with_property("IsPassword", value);
        }
        let root = ActivityDraft::new("Main", "Sequence")
            .with_variable(Variable::new("sec_Password", variable_type))
            .with_child(dialog);
        Workflow::new("Main", Vec::new(), root)
    }

    fn run_dialog(wf: &Workflow) -> Vec<String> {
        let dialog = wf.walk().find(|a| a.name == "Ask Password").unwrap();
        dialog_check()
            .inspect(
                Scope::Activity {
                    workflow: wf,
                    activity: dialog,
                },
                &ParameterStore::new(),
                &ActivityCatalog::new(),
            )
            .messages()
            .to_vec()
    }

    const SECURE: &str = "System.Security.SecureString, mscorlib";

    #[test]
    fn test_dialog_both_secure_passes() {
        assert!(run_dialog(&dialog_workflow(Some("True"), SECURE)).is_empty());
    }

    #[test]
    fn test_dialog_secure_variable_without_flag() {
        let messages = run_dialog(&dialog_workflow(Some("False"), SECURE));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("sec_Password"));
    }

    #[test]
    fn test_dialog_flag_without_secure_variable() {
        assert_eq!(run_dialog(&dialog_workflow(Some("true"), "System.String")).len(), 1);
    }

    #[test]
    fn test_dialog_neither_passes() {
        assert!(run_dialog(&dialog_workflow(Some("false"), "System.String")).is_empty());
        assert!(run_dialog(&dialog_workflow(None, "System.String")).is_empty());
    }

    #[test]
    fn test_dialog_expression_flag_counts_as_unset() {
        assert_eq!(run_dialog(&dialog_workflow(Some("[askSecret]"), SECURE)).len(), 1);
    }

    #[test]
    fn test_dialog_other_kind_ignored() {
        let root = ActivityDraft::new("Main", "Sequence").with_child(
            ActivityDraft::new("Box", "UiPath.Core.Activities.MessageBox")
                .with_property("IsPassword", "True"),
        );
        let wf = Workflow::new("Main", Vec::new(), root);
        for activity in wf.walk() {
            let findings = dialog_check().inspect(
                Scope::Activity { workflow: &wf, activity },
                &ParameterStore::new(),
                &ActivityCatalog::new(),
            );
            assert!(findings.is_empty());
        }
    }

    fn words(key: &str, value: &str) -> ParameterStore {
        let mut store = ParameterStore::new();
        store.insert(Parameter::new(key, value, "Words"));
        store
    }

    #[test]
    fn test_password_variables_must_be_secure() {
        let root = ActivityDraft::new("Main", "Sequence")
            .with_variable(Variable::new("str_Password", "System.String"))
            .with_variable(Variable::new("sec_UserPW", SECURE))
            .with_variable(Variable::new("str_Name", "System.String"))
            .with_variable(Variable::new("passCode", "Some Unknown Type"));
        let wf = Workflow::new("Main", Vec::new(), root);
        let check = Check::SensitiveNameSecureType {
            words_key: "words".into(),
            secure_type: "SecureString".into(),
        };
        let findings = check.inspect(
            Scope::Activity {
                workflow: &wf,
                activity: wf.root(),
            },
            &words("words", "password|pw|pass"),
            &ActivityCatalog::new(),
        );
        assert_eq!(findings.messages().len(), 1);
        assert!(findings.messages()[0].contains("str_Password"));
    }

    fn log_check() -> Check {
        Check::SensitiveText {
            kinds: vec![
                NodeKind::Toolbox("LogMessage".into()),
                NodeKind::Toolbox("WriteLine".into()),
            ],
            words_key: "words".into(),
        }
    }

    fn run_log(expression: &str, toolbox: &str, sensitive: &str) -> Vec<String> {
        let wf = Workflow::new(
            "Main",
            Vec::new(),
            ActivityDraft::new("Log Record", "Acme.Logger")
                .with_toolbox(toolbox)
                .with_argument(Argument::new("Message", "System.String").bound_to(expression)),
        );
        log_check()
            .inspect(
                Scope::Activity {
                    workflow: &wf,
                    activity: wf.root(),
                },
                &words("words", sensitive),
                &ActivityCatalog::new(),
            )
            .messages()
            .to_vec()
    }

    #[test]
    fn test_logged_variable_is_flagged() {
        let messages = run_log("\"Processing record \" + strNRIC", "LogMessage", "NRIC");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("NRIC"));
    }

    #[test]
    fn test_quoted_text_is_ignored() {
        assert!(run_log("\"Email sent\"", "LogMessage", "Email").is_empty());
    }

    #[test]
    fn test_one_message_per_word_and_token() {
        let messages = run_log("strEmail | strPhone + strEmail2", "WriteLine", "Email|Phone");
        // email: two tokens, phone: one
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn test_other_kinds_and_blank_words() {
        assert!(run_log("strNRIC", "Assign", "NRIC").is_empty());
        assert!(run_log("strNRIC", "LogMessage", "").is_empty());
    }
}
