use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use super::matrix::{self, Combination, MatrixError};
use crate::error::{PlanLensError, Result};

/// An execution plan: stages in execution order.
#[derive(Debug, Default)]
pub struct Plan {
    stages: Vec<Stage>,
}

impl Plan {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// A group of runs scheduled at the same point of the plan.
#[derive(Debug, Default)]
pub struct Stage {
    runs: Vec<Run>,
}

impl Stage {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }
}

/// One scheduled invocation of a job.
///
/// The workflow is shared between every run resolved from it; a run only
/// looks the job up through it and never owns it.
#[derive(Debug, Clone)]
pub struct Run {
    job_id: String,
    workflow: Arc<Workflow>,
}

impl Run {
    pub fn new(job_id: impl Into<String>, workflow: Arc<Workflow>) -> Self {
        Self {
            job_id: job_id.into(),
            workflow,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Human-readable name: the job's `name` when set, the job id otherwise.
    pub fn display_name(&self) -> String {
        self.workflow
            .jobs
            .get(&self.job_id)
            .and_then(|job| job.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(self.job_id.as_str())
            .to_string()
    }
}

/// A workflow definition as recorded in the plan document.
#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    /// Path of the workflow file the plan was resolved from
    pub file: String,
    /// Display name; the file path is shown when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Trigger declaration (`on:`)
    #[serde(default)]
    pub on: Option<Triggers>,
    /// Jobs in declaration order
    #[serde(default)]
    pub jobs: IndexMap<String, Job>,
}

impl Workflow {
    pub fn name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(self.file.as_str())
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Trigger event names in declaration order.
    pub fn events(&self) -> Vec<String> {
        match &self.on {
            None => Vec::new(),
            Some(Triggers::Event(event)) => vec![event.clone()],
            Some(Triggers::Events(events)) => events.clone(),
            Some(Triggers::Detailed(events)) => events.keys().cloned().collect(),
        }
    }

    pub fn job(&self, job_id: &str) -> Result<&Job> {
        self.jobs
            .get(job_id)
            .ok_or_else(|| PlanLensError::Resolution {
                job_id: job_id.to_string(),
                workflow_file: self.file.clone(),
            })
    }
}

/// The shapes an `on:` declaration can take.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Triggers {
    Event(String),
    Events(Vec<String>),
    Detailed(IndexMap<String, Value>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Job {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub runs_on: Option<RunsOn>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

impl Job {
    /// Every combination of the job's matrix, or none when it has no matrix.
    pub fn matrix_combinations(&self) -> std::result::Result<Vec<Combination>, MatrixError> {
        match self.strategy.as_ref().and_then(|s| s.matrix.as_ref()) {
            Some(value) => matrix::expand(value),
            None => Ok(Vec::new()),
        }
    }

    /// Runner labels in declaration order.
    pub fn runs_on(&self) -> Vec<String> {
        match &self.runs_on {
            None => Vec::new(),
            Some(RunsOn::Label(label)) => vec![label.clone()],
            Some(RunsOn::Labels(labels)) => labels.clone(),
            Some(RunsOn::Group { group, labels }) => group
                .iter()
                .cloned()
                .chain(labels.iter().flat_map(|l| l.to_vec()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Strategy {
    /// Kept raw so an unexpanded expression fails at listing time, not load time
    #[serde(default)]
    pub matrix: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RunsOn {
    Label(String),
    Labels(Vec<String>),
    Group {
        #[serde(default)]
        group: Option<String>,
        #[serde(default)]
        labels: Option<StringOrList>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrList {
    fn to_vec(&self) -> Vec<String> {
        match self {
            Self::Single(s) => vec![s.clone()],
            Self::Multiple(v) => v.clone(),
        }
    }
}
