//! Project snapshot loading
//!
//! Snapshots are a serialized form of the process model, written by an
//! exporter next to the project. Both YAML and JSON are accepted:
//!
//! ```yaml
//! name: FIN_InvoiceProcessing
//! workflows:
//!   - name: Main
//!     arguments:
//!       - { name: in_ConfigPath, type: System.String }
//!     root:
//!       name: Main Sequence
//!       type: System.Activities.Statements.Sequence
//!       variables:
//!         - { name: str_Invoice, type: System.String }
//!       children:
//!         - name: Log Start
//!           type: UiPath.Core.Activities.LogMessage
//!           arguments:
//!             - { name: Message, type: System.String, expression: '"Start"' }
//! ```

use crate::model::{ActivityDraft, Argument, Project, Variable, Workflow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Snapshot load error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),
}

/// Serialization format of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            "json" => Ok(SnapshotFormat::Json),
            _ => Err(LoadError::UnsupportedFormat(ext.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub name: String,
    #[serde(default)]
    pub workflows: Vec<WorkflowSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentSnapshot>,
    pub root: ActivitySnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
    /// Defaults to the simple type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbox: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default)]
    pub variables: Vec<VariableSnapshot>,
    #[serde(default)]
    pub arguments: Vec<ArgumentSnapshot>,
    #[serde(default)]
    pub properties: Vec<PropertySnapshot>,
    #[serde(default)]
    pub children: Vec<ActivitySnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSnapshot {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentSnapshot {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl From<&ArgumentSnapshot> for Argument {
    fn from(snapshot: &ArgumentSnapshot) -> Self {
        let argument = Argument::new(&snapshot.name, &snapshot.type_name);
        match &snapshot.expression {
            Some(expression) => argument.bound_to(expression),
            None => argument,
        }
    }
}

impl ActivitySnapshot {
    fn into_draft(self) -> ActivityDraft {
        let mut draft = ActivityDraft::new(&self.name, &self.type_id);
        if let Some(toolbox) = &self.toolbox {
            draft = draft.with_toolbox(toolbox);
        }
        if let Some(annotation) = &self.annotation {
            draft = draft.with_annotation(annotation);
        }
        for v in &self.variables {
            draft = draft.with_variable(Variable::new(&v.name, &v.type_name));
        }
        for a in &self.arguments {
            draft = draft.with_argument(a.into());
        }
        for p in &self.properties {
            draft = draft.with_property(&p.name, &p.value);
        }
        for child in self.children {
            draft = draft.with_child(child.into_draft());
        }
        draft
    }
}

impl From<ProjectSnapshot> for Project {
    fn from(snapshot: ProjectSnapshot) -> Self {
        let mut project = Project::new(&snapshot.name);
        for wf in snapshot.workflows {
            let arguments = wf.arguments.iter().map(Argument::from).collect();
            project = project.with_workflow(Workflow::new(&wf.name, arguments, wf.root.into_draft()));
        }
        project
    }
}

/// Parse snapshot text
pub fn parse_project(content: &str, format: SnapshotFormat) -> Result<Project, LoadError> {
    let snapshot: ProjectSnapshot = match format {
        SnapshotFormat::Yaml => serde_yaml::from_str(content)?,
        SnapshotFormat::Json => serde_json::from_str(content)?,
    };
    Ok(snapshot.into())
}

/// Load a snapshot file, choosing the format by extension
pub fn load_project(path: &Path) -> Result<Project, LoadError> {
    let format = SnapshotFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let project = parse_project(&content, format)?;
    log::debug!(
        "loaded project '{}' with {} workflows from {}",
        project.name,
        project.workflows.len(),
        path.display()
    );
    Ok(project)
}
