use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::types::{Plan, Run, Stage, Workflow};

/// Serialized plan as written by the planner.
///
/// Workflows are listed once; stages refer to them by file path so every
/// run from the same workflow shares a single definition.
#[derive(Debug, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    #[serde(default)]
    pub stages: Vec<Vec<RunRef>>,
}

/// A run entry inside a stage.
#[derive(Debug, Deserialize)]
pub struct RunRef {
    /// Workflow file path, matching one of the document's workflows
    pub workflow: String,
    /// Job identifier within that workflow
    pub job: String,
}

impl PlanDocument {
    /// Load a plan document, choosing the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan document: {}", path.display()))?;

        let document = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON plan: {}", path.display()))?,
            // YAML is a superset of JSON, so it covers unknown extensions too
            _ => Self::from_yaml(&contents)
                .with_context(|| format!("Failed to parse plan document: {}", path.display()))?,
        };

        Ok(document)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Link runs to their workflows and build the plan.
    ///
    /// When `workflow_filter` is non-empty only runs whose workflow file is
    /// listed are kept. Stages are kept even when the filter empties them so
    /// stage indices stay those of the full plan.
    pub fn into_plan(self, workflow_filter: &[String]) -> Result<Plan> {
        let mut workflows: HashMap<String, Arc<Workflow>> = HashMap::new();
        for workflow in self.workflows {
            let key = normalize_path(&workflow.file).to_string();
            if workflows.contains_key(&key) {
                bail!("Workflow {} is declared more than once", workflow.file);
            }
            workflows.insert(key, Arc::new(workflow));
        }

        let filter: Vec<&str> = workflow_filter.iter().map(|f| normalize_path(f)).collect();
        let selected = |file: &str| filter.is_empty() || filter.contains(&file);

        let mut stages = Vec::with_capacity(self.stages.len());
        for (index, run_refs) in self.stages.into_iter().enumerate() {
            let mut runs = Vec::with_capacity(run_refs.len());
            for run_ref in run_refs {
                let file = normalize_path(&run_ref.workflow);
                let workflow = workflows.get(file).with_context(|| {
                    format!(
                        "Stage {index} refers to unknown workflow {}",
                        run_ref.workflow
                    )
                })?;
                if !selected(file) {
                    debug!("Skipping {}/{} (workflow not selected)", file, run_ref.job);
                    continue;
                }
                runs.push(Run::new(run_ref.job, Arc::clone(workflow)));
            }
            stages.push(Stage::new(runs));
        }

        info!(
            "Loaded plan with {} stages from {} workflows",
            stages.len(),
            workflows.len()
        );
        Ok(Plan::new(stages))
    }
}

fn normalize_path(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}
