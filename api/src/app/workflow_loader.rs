//! Workflow definition loader
//!
//! Parses workflow YAML files and compiles their `user_assigned` triggers.
//! Every definition problem (unknown filter key, malformed regex, unknown
//! trigger type) is reported here, when the workflow is loaded, so that
//! evaluating a loaded trigger cannot fail.
//!
//! ```yaml
//! workflow:
//!   id: page-on-urgent-mention
//!   name: Page on urgent mention
//!   triggers:
//!     - type: user_assigned
//!       filters:
//!         - key: mentioned_user
//!           value: john.doe
//!         - key: comment_text
//!           value: "urgent|sev1"
//!           is_regex: true
//!         - key: mentioned_by
//!           value: bot-user
//!           exclude: true
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::entities::{
    Trigger, TriggerFilter, TriggerKind, Workflow, WorkflowSnapshot, WorkflowTrigger,
};
use crate::error::ConfigurationError;

#[derive(Debug, Deserialize)]
struct WorkflowFile {
    workflow: WorkflowDefinition,
}

/// Workflow as written by its author; steps and actions are ignored
#[derive(Debug, Deserialize)]
struct WorkflowDefinition {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    triggers: Vec<TriggerDefinition>,
}

#[derive(Debug, Deserialize)]
struct TriggerDefinition {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    filters: Vec<FilterDefinition>,
}

#[derive(Debug, Deserialize)]
struct FilterDefinition {
    key: String,
    value: serde_yaml::Value,
    #[serde(default)]
    is_regex: bool,
    #[serde(default)]
    exclude: bool,
}

/// Parse and compile a single workflow definition
pub fn load_workflow_str(yaml: &str) -> Result<Workflow, ConfigurationError> {
    let file: WorkflowFile = serde_yaml::from_str(yaml)?;
    compile_workflow(file.workflow)
}

/// Load every `*.yml` / `*.yaml` file in a directory, in file-name order
///
/// The first invalid file aborts the load; nothing is partially applied.
pub fn load_workflow_dir(dir: &Path) -> Result<WorkflowSnapshot, ConfigurationError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigurationError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigurationError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if is_yaml && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut workflows = Vec::with_capacity(paths.len());
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigurationError::Io {
            path: path.clone(),
            source,
        })?;
        let workflow = load_workflow_str(&content).map_err(|e| e.in_file(&path))?;

        if let Some(first) = seen.get(&workflow.id) {
            return Err(ConfigurationError::DuplicateWorkflow {
                id: workflow.id,
                path: first.clone(),
            }
            .in_file(&path));
        }
        seen.insert(workflow.id.clone(), path.clone());

        tracing::debug!(
            workflow_id = %workflow.id,
            path = %path.display(),
            triggers = workflow.triggers.len(),
            "Loaded workflow"
        );
        workflows.push(workflow);
    }

    Ok(WorkflowSnapshot::new(workflows))
}

fn compile_workflow(def: WorkflowDefinition) -> Result<Workflow, ConfigurationError> {
    let id = def
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ConfigurationError::InvalidWorkflow("missing workflow id".to_string()))?;

    let mut triggers = Vec::with_capacity(def.triggers.len());
    for trigger in def.triggers {
        let kind: TriggerKind = trigger.kind.parse()?;
        if kind != TriggerKind::UserAssigned {
            triggers.push(WorkflowTrigger::Other(kind));
            continue;
        }

        let filters = trigger
            .filters
            .into_iter()
            .map(|f| compile_filter(&id, f))
            .collect::<Result<Vec<_>, _>>()?;
        triggers.push(WorkflowTrigger::UserAssigned(Trigger::new(filters)));
    }

    Ok(Workflow {
        name: def.name.unwrap_or_else(|| id.clone()),
        id,
        description: def.description,
        disabled: def.disabled,
        triggers,
    })
}

fn compile_filter(
    workflow_id: &str,
    def: FilterDefinition,
) -> Result<TriggerFilter, ConfigurationError> {
    let value = scalar_to_string(&def.value).ok_or_else(|| {
        ConfigurationError::InvalidWorkflow(format!(
            "filter '{}' must have a string, number or boolean value",
            def.key
        ))
    })?;

    if !def.is_regex && value.starts_with("r\"") && value.ends_with('"') && value.len() >= 3 {
        tracing::warn!(
            workflow_id = %workflow_id,
            key = %def.key,
            value = %value,
            "Filter value looks like a regex but is_regex is not set; matching it literally"
        );
    }

    TriggerFilter::new(&def.key, &value, def.is_regex, def.exclude)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
