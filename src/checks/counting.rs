//! Structural counting and membership checks

use super::NodePredicate;
use crate::inspection::Findings;
use crate::model::{Project, Workflow};
use crate::params::ParameterStore;
use std::collections::HashSet;

pub(super) fn subtree_count(
    workflow: &Workflow,
    predicate: &NodePredicate,
    params: &ParameterStore,
    minimum_key: &str,
    zero_disables: bool,
    noun: &str,
) -> Findings {
    let Some(minimum) = params.resolve_count(minimum_key) else {
        return Findings::none();
    };
    if minimum == 0 && zero_disables {
        return Findings::none();
    }

    let count = workflow.walk().filter(|a| predicate.matches(a)).count();
    if count >= minimum {
        return Findings::none();
    }

    Findings::one(format!(
        "Workflow '{}' has {} {}, at least {} required",
        workflow.name, count, noun, minimum
    ))
}

pub(super) fn required_workflows(project: &Project, names: &[String]) -> Findings {
    let present: HashSet<&str> = project.workflows.iter().map(|w| w.name.as_str()).collect();
    let missing: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !present.contains(name))
        .collect();

    if missing.is_empty() {
        return Findings::none();
    }

    Findings::one(format!(
        "Project '{}' is missing required workflows: {}",
        project.name,
        missing.join(", ")
    ))
}
