//! Integration tests for flowlint

use flowlint::config::Config;
use flowlint::output::{CompactFormatter, JsonFormatter, OutputFormatter};
use flowlint::{load_project, Engine, LintResult, Severity};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sequential() -> Config {
    let mut config = Config::new();
    config.engine.parallel = false;
    config
}

fn lint_fixture(config: Config, name: &str) -> LintResult {
    let engine = Engine::new(config).unwrap();
    engine.lint_files(&[fixtures_path().join(name)])
}

fn rule_ids(result: &LintResult) -> Vec<&str> {
    result.diagnostics.iter().map(|d| d.rule_id.as_str()).collect()
}

#[test]
fn test_clean_project_has_no_diagnostics() {
    let result = lint_fixture(sequential(), "clean.flow.yaml");
    assert_eq!(rule_ids(&result), Vec::<&str>::new());
    assert!(result.is_clean());
    assert_eq!(result.projects_processed, 1);
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn test_violations_reported_in_scope_order() {
    let result = lint_fixture(sequential(), "violations.flow.yaml");

    assert_eq!(
        rule_ids(&result),
        vec![
            "project-naming",
            "project-uses-framework",
            "argument-direction-prefix",
            "argument-type-explicit",
            "workflow-annotations",
            "workflow-log-messages",
            "variable-naming",
            "activity-renamed",
            "password-secure-type",
            "activity-renamed",
            "sensitive-not-logged",
            "no-delay-activity",
            "excel-hidden",
            "outlook-fifo",
            "outlook-filtered",
            "password-dialog-secure",
        ]
    );
    assert_eq!(result.error_count, 3);
    assert_eq!(result.warning_count, 13);
    assert_eq!(result.projects_with_errors, 1);
    assert_eq!(result.exit_code(), 2);
}

#[test]
fn test_diagnostic_details() {
    let result = lint_fixture(sequential(), "violations.flow.yaml");
    let find = |id: &str| {
        result
            .diagnostics
            .iter()
            .find(|d| d.rule_id == id)
            .unwrap()
    };

    let framework = find("project-uses-framework");
    assert_eq!(
        framework.messages,
        vec![
            "Project 'Invoices' is missing required workflows: InitAllSettings, InitAllApplications, KillAllProcesses, CloseAllApplications"
                .to_string()
        ]
    );
    assert_eq!(framework.location.path(), "");
    assert!(framework
        .location
        .file
        .as_ref()
        .unwrap()
        .ends_with("violations.flow.yaml"));

    let logs = find("workflow-log-messages");
    assert_eq!(
        logs.messages,
        vec!["Workflow 'Main' has 1 log messages, at least 2 required".to_string()]
    );
    assert_eq!(logs.location.path(), "Main");

    let delay = find("no-delay-activity");
    assert_eq!(delay.location.path(), "Main > Sequence > Wait");
    assert_eq!(delay.project, "Invoices");

    let dialog = find("password-dialog-secure");
    assert_eq!(dialog.severity, Severity::Error);
    assert!(dialog.messages[0].contains("pw_Login"));
    assert!(dialog.recommendation.as_deref().unwrap().contains("SecureString"));
}

#[test]
fn test_parallel_and_sequential_agree() {
    let files = vec![
        fixtures_path().join("violations.flow.yaml"),
        fixtures_path().join("clean.flow.yaml"),
    ];

    let serial = Engine::new(sequential()).unwrap().lint_files(&files);
    let mut config = Config::new();
    config.engine.jobs = 4;
    let parallel = Engine::new(config).unwrap().lint_files(&files);

    let key = |r: &LintResult| -> Vec<(String, String, Vec<String>)> {
        r.diagnostics
            .iter()
            .map(|d| (d.rule_id.clone(), d.location.path(), d.messages.clone()))
            .collect()
    };
    assert_eq!(key(&serial), key(&parallel));
    assert_eq!(serial.projects_processed, 2);
}

#[test]
fn test_repeated_runs_are_identical() {
    let engine = Engine::new(Config::new()).unwrap();
    let project = load_project(&fixtures_path().join("violations.flow.yaml")).unwrap();

    let first = engine.lint_project(&project, None);
    let second = engine.lint_project(&project, None);
    let json = JsonFormatter::new();
    let render = |r: &LintResult| {
        r.diagnostics
            .iter()
            .map(|d| json.format_diagnostic(d))
            .collect::<Vec<_>>()
    };
    assert_eq!(render(&first), render(&second));
}

#[test]
fn test_broken_snapshot_reports_load_error() {
    let result = lint_fixture(sequential(), "broken.flow.json");
    assert_eq!(rule_ids(&result), vec!["load-error"]);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.diagnostics[0].project, "broken.flow");
    assert!(result.diagnostics[0].headline().starts_with("Failed to load snapshot"));
}

#[test]
fn test_config_file_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(".flowlintrc.yaml");
    std::fs::write(
        &config_path,
        r#"
engine:
  parallel: false
rules:
  disabled: [project-uses-framework]
  severity:
    no-delay-activity: error
  parameters:
    project-naming:
      pattern: "[A-Za-z]+"
      departments: ""
    workflow-annotations:
      minimum: "0"
    workflow-log-messages:
      minimum: "1"
  per_workflow:
    "Ma*": [outlook-fifo, outlook-filtered]
"#,
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    let result = lint_fixture(config, "violations.flow.yaml");
    let ids = rule_ids(&result);

    assert!(!ids.contains(&"project-naming"));
    assert!(!ids.contains(&"project-uses-framework"));
    assert!(!ids.contains(&"workflow-annotations"));
    assert!(!ids.contains(&"workflow-log-messages"));
    assert!(!ids.contains(&"outlook-fifo"));
    assert!(!ids.contains(&"outlook-filtered"));
    assert!(result
        .diagnostics
        .iter()
        .find(|d| d.rule_id == "no-delay-activity")
        .unwrap()
        .is_error());
    assert_eq!(result.error_count, 4);
}

#[test]
fn test_unknown_override_is_rejected() {
    let mut config = Config::new();
    config
        .rules
        .severity
        .insert("workflow-comments".to_string(), Severity::Error);
    assert!(Engine::new(config).is_err());
}

#[test]
fn test_min_severity_filter() {
    let mut result = lint_fixture(sequential(), "violations.flow.yaml");
    result.retain_min_severity(Severity::Error);
    assert_eq!(
        rule_ids(&result),
        vec![
            "password-secure-type",
            "sensitive-not-logged",
            "password-dialog-secure"
        ]
    );
    assert_eq!(result.warning_count, 0);
    assert_eq!(result.exit_code(), 2);
}

#[test]
fn test_compact_output_has_one_line_per_message() {
    let result = lint_fixture(sequential(), "violations.flow.yaml");
    let messages: usize = result.diagnostics.iter().map(|d| d.messages.len()).sum();
    let output = CompactFormatter::new().format(&result);
    assert_eq!(output.lines().count(), messages);
}
