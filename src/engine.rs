//! Host engine
//!
//! The engine owns the configuration, the registry with overrides applied,
//! and the activity catalog. It walks a project, hands every scope instance
//! to the rules bound to that scope and turns failing results into
//! [`Diagnostic`]s.

use crate::catalog::ActivityCatalog;
use crate::config::Config;
use crate::diagnostic::{Diagnostic, Location, Severity};
use crate::inspection::InspectionResult;
use crate::loader::load_project;
use crate::model::{Project, Workflow};
use crate::registry::{RegistryError, RuleRegistry};
use crate::rule::{Rule, Scope, ScopeKind};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Per-rule timing statistics
#[derive(Debug, Clone, Default)]
pub struct RuleTiming {
    /// Rule ID
    pub rule_id: String,
    /// Total time spent on this rule
    pub total_time: Duration,
    /// Number of scope instances inspected
    pub evaluation_count: usize,
    /// Number of failing results
    pub match_count: usize,
}

impl RuleTiming {
    pub fn new(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            ..Default::default()
        }
    }

    /// Average time per evaluation
    pub fn avg_time(&self) -> Duration {
        if self.evaluation_count > 0 {
            self.total_time / self.evaluation_count as u32
        } else {
            Duration::ZERO
        }
    }
}

/// Result of a lint run
#[derive(Debug, Default)]
pub struct LintResult {
    /// All diagnostics, in project, workflow, scope and rule order
    pub diagnostics: Vec<Diagnostic>,

    /// Projects processed
    pub projects_processed: usize,

    /// Projects with errors
    pub projects_with_errors: usize,

    /// Projects with warnings
    pub projects_with_warnings: usize,

    /// Total errors
    pub error_count: usize,

    /// Total warnings
    pub warning_count: usize,

    /// Total info messages
    pub info_count: usize,

    /// Processing duration
    pub duration: Duration,

    /// Per-rule timing statistics (rule_id -> timing)
    pub rule_timings: HashMap<String, RuleTiming>,
}

impl LintResult {
    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if result is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            2
        } else if self.warning_count > 0 {
            1
        } else {
            0
        }
    }

    fn count(&mut self) {
        self.error_count = self.diagnostics.iter().filter(|d| d.is_error()).count();
        self.warning_count = self.diagnostics.iter().filter(|d| d.is_warning()).count();
        self.info_count = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .count();
    }

    /// Drop diagnostics below a severity and recount
    pub fn retain_min_severity(&mut self, min: Severity) {
        self.diagnostics.retain(|d| d.severity >= min);
        self.count();
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.diagnostics.extend(other.diagnostics);
        self.projects_processed += other.projects_processed;
        self.projects_with_errors += other.projects_with_errors;
        self.projects_with_warnings += other.projects_with_warnings;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.info_count += other.info_count;
        merge_timings(&mut self.rule_timings, other.rule_timings);
    }

    /// Get rule timings sorted by total time (descending)
    pub fn sorted_timings(&self) -> Vec<&RuleTiming> {
        let mut timings: Vec<_> = self.rule_timings.values().collect();
        timings.sort_by(|a, b| b.total_time.cmp(&a.total_time));
        timings
    }

    /// Format timing statistics as a string
    pub fn format_timings(&self) -> String {
        let timings = self.sorted_timings();
        if timings.is_empty() {
            return "No timing data available".to_string();
        }

        let mut output = String::new();
        output.push_str("Rule Timing Statistics:\n");
        output.push_str(&format!(
            "{:<32} {:>12} {:>12} {:>10} {:>10}\n",
            "Rule ID", "Total", "Avg", "Evals", "Failures"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for timing in timings {
            let total_ms = timing.total_time.as_secs_f64() * 1000.0;
            let avg_us = timing.avg_time().as_secs_f64() * 1_000_000.0;
            output.push_str(&format!(
                "{:<32} {:>10.2}ms {:>10.2}µs {:>10} {:>10}\n",
                timing.rule_id, total_ms, avg_us, timing.evaluation_count, timing.match_count
            ));
        }

        output
    }
}

fn merge_timings(into: &mut HashMap<String, RuleTiming>, from: HashMap<String, RuleTiming>) {
    for (rule_id, timing) in from {
        let entry = into
            .entry(rule_id)
            .or_insert_with(|| RuleTiming::new(&timing.rule_id));
        entry.total_time += timing.total_time;
        entry.evaluation_count += timing.evaluation_count;
        entry.match_count += timing.match_count;
    }
}

/// Diagnostics and timings gathered while walking one part of a project
#[derive(Default)]
struct Pass {
    diagnostics: Vec<Diagnostic>,
    timings: HashMap<String, RuleTiming>,
}

/// The rule evaluation engine
pub struct Engine {
    config: Config,
    registry: RuleRegistry,
    catalog: ActivityCatalog,
}

impl Engine {
    /// Create an engine over the built-in rules
    pub fn new(config: Config) -> Result<Self, RegistryError> {
        Self::with_registry(config, RuleRegistry::builtin()?)
    }

    /// Create an engine over a custom registry
    ///
    /// Severity and parameter overrides are applied here; an override that
    /// names an unknown rule or parameter is rejected.
    pub fn with_registry(config: Config, mut registry: RuleRegistry) -> Result<Self, RegistryError> {
        // "all" is only meaningful inside per-workflow ignores
        let selected = config.rules.disabled.iter().chain(&config.rules.enabled);
        let per_workflow = config
            .rules
            .per_workflow
            .values()
            .flatten()
            .filter(|id| id.as_str() != "all");
        if let Some(unknown) = selected.chain(per_workflow).find(|id| !registry.contains(id)) {
            return Err(RegistryError::UnknownRule(unknown.clone()));
        }

        for (rule_id, severity) in &config.rules.severity {
            let rule = registry
                .get_mut(rule_id)
                .ok_or_else(|| RegistryError::UnknownRule(rule_id.clone()))?;
            rule.severity = *severity;
        }

        for (rule_id, params) in &config.rules.parameters {
            let rule = registry
                .get_mut(rule_id)
                .ok_or_else(|| RegistryError::UnknownRule(rule_id.clone()))?;
            for (key, value) in params {
                if !rule.parameters.set(key, value) {
                    return Err(RegistryError::UnknownParameter {
                        rule: rule_id.clone(),
                        key: key.clone(),
                    });
                }
            }
        }

        let mut catalog = ActivityCatalog::builtin();
        for kind in &config.catalog {
            catalog.insert(kind.clone());
        }

        Ok(Self {
            config,
            registry,
            catalog,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    /// Whether a rule runs, optionally within a named workflow
    fn is_active(&self, rule: &Rule, workflow: Option<&str>) -> bool {
        rule.enabled
            && self.config.is_rule_enabled(&rule.id)
            && self.config.is_category_enabled(rule.category)
            && !workflow.is_some_and(|w| self.config.should_ignore_rule_for_workflow(&rule.id, w))
    }

    fn active_rules<'a>(
        &'a self,
        scope: ScopeKind,
        workflow: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.registry
            .rules_for(scope)
            .filter(move |rule| self.is_active(rule, workflow))
    }

    /// Run every active rule bound to the scope's kind
    ///
    /// Results come back in registration order, passing ones included.
    pub fn inspect_scope(&self, scope: Scope<'_>) -> Vec<(&Rule, InspectionResult)> {
        let workflow = match scope {
            Scope::Project(_) => None,
            Scope::Workflow(w) | Scope::Activity { workflow: w, .. } => Some(w.name.as_str()),
        };
        self.registry
            .rules_for(scope.kind())
            .filter(|rule| self.is_active(rule, workflow))
            .map(|rule| (rule, rule.inspect(scope, &self.catalog)))
            .collect()
    }

    fn run_rule(
        &self,
        pass: &mut Pass,
        rule: &Rule,
        scope: Scope<'_>,
        project: &str,
        location: impl FnOnce() -> Location,
    ) {
        let start = Instant::now();
        let result = rule.inspect(scope, &self.catalog);
        let elapsed = start.elapsed();

        let timing = pass
            .timings
            .entry(rule.id.clone())
            .or_insert_with(|| RuleTiming::new(&rule.id));
        timing.total_time += elapsed;
        timing.evaluation_count += 1;

        if !result.has_errors() {
            return;
        }
        timing.match_count += 1;

        let severity = result.severity().unwrap_or(rule.severity);
        let mut diag = Diagnostic::new(&rule.id, severity, rule.scope, project)
            .at(location())
            .with_messages(result.messages().to_vec());
        if let Some(recommendation) = result.recommendation().filter(|r| !r.is_empty()) {
            diag = diag.with_recommendation(recommendation);
        }
        pass.diagnostics.push(diag);
    }

    fn lint_workflow(&self, project: &Project, workflow: &Workflow, file: Option<&Path>) -> Pass {
        let mut pass = Pass::default();
        let located = |location: Location| match file {
            Some(path) => location.in_file(path.to_path_buf()),
            None => location,
        };

        for rule in self.active_rules(ScopeKind::Workflow, Some(workflow.name.as_str())) {
            self.run_rule(&mut pass, rule, Scope::Workflow(workflow), &project.name, || {
                located(Location::workflow(&workflow.name))
            });
        }

        let activity_rules: Vec<&Rule> = self
            .active_rules(ScopeKind::Activity, Some(workflow.name.as_str()))
            .collect();
        if activity_rules.is_empty() {
            return pass;
        }

        for activity in workflow.walk() {
            let scope = Scope::Activity { workflow, activity };
            for rule in &activity_rules {
                self.run_rule(&mut pass, rule, scope, &project.name, || {
                    located(Location::activity(&workflow.name, &workflow.path_to(activity)))
                });
            }
        }
        pass
    }

    /// Inspect one project
    ///
    /// Project rules run first, then each workflow's workflow rules followed
    /// by its activity rules in pre-order. Workflows may be inspected in
    /// parallel; the output order does not depend on it.
    pub fn lint_project(&self, project: &Project, file: Option<&Path>) -> LintResult {
        let start = Instant::now();
        let mut pass = Pass::default();

        for rule in self.active_rules(ScopeKind::Project, None) {
            self.run_rule(&mut pass, rule, Scope::Project(project), &project.name, || {
                match file {
                    Some(path) => Location::project().in_file(path.to_path_buf()),
                    None => Location::project(),
                }
            });
        }

        let workflow_passes: Vec<Pass> = if self.config.engine.parallel {
            project
                .workflows
                .par_iter()
                .map(|wf| self.lint_workflow(project, wf, file))
                .collect()
        } else {
            project
                .workflows
                .iter()
                .map(|wf| self.lint_workflow(project, wf, file))
                .collect()
        };

        for wf_pass in workflow_passes {
            pass.diagnostics.extend(wf_pass.diagnostics);
            merge_timings(&mut pass.timings, wf_pass.timings);
        }

        let mut result = LintResult {
            diagnostics: pass.diagnostics,
            projects_processed: 1,
            rule_timings: pass.timings,
            ..LintResult::default()
        };
        result.count();
        result.projects_with_errors = usize::from(result.error_count > 0);
        result.projects_with_warnings = usize::from(result.warning_count > 0);
        result.duration = start.elapsed();
        result
    }

    /// Load and inspect one snapshot file
    ///
    /// A file that cannot be loaded yields a single `load-error` diagnostic.
    pub fn lint_file(&self, path: &Path) -> LintResult {
        match load_project(path) {
            Ok(project) => self.lint_project(&project, Some(path)),
            Err(e) => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let diag = Diagnostic::new("load-error", Severity::Error, ScopeKind::Project, &name)
                    .at(Location::project().in_file(path.to_path_buf()))
                    .with_message(&format!("Failed to load snapshot: {}", e));
                LintResult {
                    diagnostics: vec![diag],
                    projects_processed: 1,
                    projects_with_errors: 1,
                    error_count: 1,
                    ..LintResult::default()
                }
            }
        }
    }

    /// Inspect multiple snapshot files
    pub fn lint_files(&self, files: &[PathBuf]) -> LintResult {
        let start = Instant::now();

        let results: Vec<LintResult> = if self.config.engine.parallel {
            let jobs = if self.config.engine.jobs > 0 {
                self.config.engine.jobs
            } else {
                num_cpus::get()
            };
            match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| files.par_iter().map(|f| self.lint_file(f)).collect()),
                Err(e) => {
                    log::warn!("could not start {} worker threads: {}", jobs, e);
                    files.iter().map(|f| self.lint_file(f)).collect()
                }
            }
        } else {
            files.iter().map(|f| self.lint_file(f)).collect()
        };

        let mut combined = LintResult::default();
        for result in results {
            combined.merge(result);
        }
        combined.duration = start.elapsed();

        log::info!(
            "inspected {} projects: {} errors, {} warnings in {:.2?}",
            combined.projects_processed,
            combined.error_count,
            combined.warning_count,
            combined.duration
        );
        combined
    }
}
