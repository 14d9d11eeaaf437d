//! Read-only process model
//!
//! A [`Project`] owns its [`Workflow`]s. Each workflow owns its activities in
//! an arena indexed by [`ActivityId`]; an activity refers to its parent and
//! children by id, so upward lookups never create ownership cycles.

use crate::typename::TypeName;
use serde::Serialize;

/// Index of an activity inside its workflow's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ActivityId(pub usize);

/// A key/value property of an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Property display name
    pub name: String,
    /// Literal or expression definition
    pub value: String,
}

impl Property {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// A variable declared in an activity scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub type_name: TypeName,
}

impl Variable {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: TypeName::parse(type_name),
        }
    }
}

/// An in/out argument of a workflow or activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub type_name: TypeName,
    /// Bound or default expression
    pub expression: Option<String>,
}

impl Argument {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: TypeName::parse(type_name),
            expression: None,
        }
    }

    /// Bind an expression to the argument
    pub fn bound_to(mut self, expression: &str) -> Self {
        self.expression = Some(expression.to_string());
        self
    }

    /// Whether the argument has a non-empty expression
    pub fn is_bound(&self) -> bool {
        self.expression.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// A node of the activity tree
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: ActivityId,
    /// Display name shown in the designer
    pub name: String,
    /// Implementation type identifier
    pub type_id: String,
    /// Stable short kind name (e.g. "LogMessage")
    pub toolbox_name: String,
    pub annotation: Option<String>,
    pub parent: Option<ActivityId>,
    pub children: Vec<ActivityId>,
    pub variables: Vec<Variable>,
    pub arguments: Vec<Argument>,
    pub properties: Vec<Property>,
}

impl Activity {
    /// Whether the activity carries non-blank annotation text
    pub fn is_annotated(&self) -> bool {
        self.annotation
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
    }

    /// Find a property by exact name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Find an argument by exact name
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Find a variable by exact name
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// Owned, nested description of an activity subtree
///
/// Drafts are how hosts and the snapshot loader hand a tree to
/// [`Workflow::new`], which flattens it into the arena.
#[derive(Debug, Clone, Default)]
pub struct ActivityDraft {
    pub name: String,
    pub type_id: String,
    pub toolbox_name: String,
    pub annotation: Option<String>,
    pub variables: Vec<Variable>,
    pub arguments: Vec<Argument>,
    pub properties: Vec<Property>,
    pub children: Vec<ActivityDraft>,
}

impl ActivityDraft {
    /// Create a draft; the toolbox name defaults to the bare type name
    pub fn new(name: &str, type_id: &str) -> Self {
        let toolbox_name = crate::typename::bare_type_name(type_id)
            .unwrap_or_default()
            .to_string();
        Self {
            name: name.to_string(),
            type_id: type_id.to_string(),
            toolbox_name,
            ..Default::default()
        }
    }

    pub fn with_toolbox(mut self, toolbox_name: &str) -> Self {
        self.toolbox_name = toolbox_name.to_string();
        self
    }

    pub fn with_annotation(mut self, text: &str) -> Self {
        self.annotation = Some(text.to_string());
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    pub fn with_child(mut self, child: ActivityDraft) -> Self {
        self.children.push(child);
        self
    }
}

/// A workflow: public arguments plus one activity tree
#[derive(Debug, Clone, Serialize)]
pub struct Workflow {
    pub name: String,
    pub arguments: Vec<Argument>,
    /// Arena; index 0 is the root and nodes are stored in pre-order
    nodes: Vec<Activity>,
}

impl Workflow {
    /// Build a workflow from a root draft
    pub fn new(name: &str, arguments: Vec<Argument>, root: ActivityDraft) -> Self {
        let mut nodes = Vec::new();
        flatten(root, None, &mut nodes);
        Self {
            name: name.to_string(),
            arguments,
            nodes,
        }
    }

    /// The root activity
    pub fn root(&self) -> &Activity {
        &self.nodes[0]
    }

    /// Look up an activity by id
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.nodes.get(id.0)
    }

    /// The parent of an activity, if it has one
    pub fn parent_of(&self, activity: &Activity) -> Option<&Activity> {
        activity.parent.and_then(|id| self.activity(id))
    }

    /// Direct children in declared order
    pub fn children_of<'a>(&'a self, activity: &'a Activity) -> impl Iterator<Item = &'a Activity> {
        activity.children.iter().filter_map(|id| self.activity(*id))
    }

    /// Pre-order walk from the root, each activity exactly once
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder {
            workflow: self,
            stack: vec![ActivityId(0)],
        }
    }

    /// Display names from the root down to the activity
    pub fn path_to<'a>(&'a self, activity: &'a Activity) -> Vec<&'a str> {
        let mut names = vec![activity.name.as_str()];
        let mut current = activity;
        while let Some(parent) = self.parent_of(current) {
            names.push(parent.name.as_str());
            current = parent;
        }
        names.reverse();
        names
    }

    /// Number of activities in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn flatten(draft: ActivityDraft, parent: Option<ActivityId>, nodes: &mut Vec<Activity>) -> ActivityId {
    let id = ActivityId(nodes.len());
    nodes.push(Activity {
        id,
        name: draft.name,
        type_id: draft.type_id,
        toolbox_name: draft.toolbox_name,
        annotation: draft.annotation,
        parent,
        children: Vec::new(),
        variables: draft.variables,
        arguments: draft.arguments,
        properties: draft.properties,
    });

    let children: Vec<ActivityId> = draft
        .children
        .into_iter()
        .map(|child| flatten(child, Some(id), nodes))
        .collect();
    nodes[id.0].children = children;
    id
}

/// Pre-order iterator over a workflow's activities
pub struct PreOrder<'a> {
    workflow: &'a Workflow,
    stack: Vec<ActivityId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Activity;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let activity = self.workflow.activity(id)?;
        self.stack.extend(activity.children.iter().rev().copied());
        Some(activity)
    }
}

/// A project: a named, ordered set of workflows
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub name: String,
    pub workflows: Vec<Workflow>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            workflows: Vec::new(),
        }
    }

    pub fn with_workflow(mut self, workflow: Workflow) -> Self {
        self.workflows.push(workflow);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Workflow {
        let root = ActivityDraft::new("Main Sequence", "System.Activities.Statements.Sequence")
            .with_child(
                ActivityDraft::new("Read Input", "UiPath.Core.Activities.InputDialog")
                    .with_child(ActivityDraft::new("Nested", "System.Activities.Statements.Sequence")),
            )
            .with_child(ActivityDraft::new("Log Start", "UiPath.Core.Activities.LogMessage"));
        Workflow::new("Main", Vec::new(), root)
    }

    #[test]
    fn test_arena_parent_links() {
        let wf = sample();
        assert_eq!(wf.len(), 4);
        assert_eq!(wf.root().name, "Main Sequence");
        assert!(wf.root().parent.is_none());

        let nested = wf.walk().find(|a| a.name == "Nested").unwrap();
        let parent = wf.parent_of(nested).unwrap();
        assert_eq!(parent.name, "Read Input");
        assert_eq!(wf.path_to(nested), vec!["Main Sequence", "Read Input", "Nested"]);
    }

    #[test]
    fn test_walk_is_preorder() {
        let wf = sample();
        let names: Vec<_> = wf.walk().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Main Sequence", "Read Input", "Nested", "Log Start"]);
    }

    #[test]
    fn test_children_in_declared_order() {
        let wf = sample();
        let names: Vec<_> = wf.children_of(wf.root()).map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Read Input", "Log Start"]);
    }

    #[test]
    fn test_draft_defaults_toolbox_name() {
        let draft = ActivityDraft::new("Log", "UiPath.Core.Activities.LogMessage, UiPath");
        assert_eq!(draft.toolbox_name, "LogMessage");
        let draft = draft.with_toolbox("WriteLine");
        assert_eq!(draft.toolbox_name, "WriteLine");
    }

    #[test]
    fn test_annotation_blank_is_not_annotated() {
        let wf = Workflow::new(
            "W",
            Vec::new(),
            ActivityDraft::new("Root", "Sequence").with_annotation("   "),
        );
        assert!(!wf.root().is_annotated());
    }

    #[test]
    fn test_argument_binding() {
        assert!(!Argument::new("in_Value", "System.String").is_bound());
        assert!(!Argument::new("in_Value", "System.String").bound_to("").is_bound());
        assert!(Argument::new("in_Value", "System.String").bound_to("strValue").is_bound());
    }

    #[test]
    fn test_path_to_borrows_from_workflow() {
        let wf = sample();
        let leaf_path = {
            let leaf = wf.walk().last().unwrap();
            wf.path_to(leaf)
        };
        assert_eq!(leaf_path, vec!["Main Sequence", "Log Start"]);
        assert_eq!(wf.path_to(wf.root()), vec!["Main Sequence"]);
    }
}
