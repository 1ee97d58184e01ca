use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{PlanLensError, Result};
use crate::plan::{stringify_value, Combination, Plan, Run};

/// One listed job run, with every field already in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub job_id: String,
    pub job_name: String,
    /// Zero-based index of the stage, in decimal
    pub stage: String,
    pub workflow_name: String,
    pub workflow_file: String,
    /// Trigger events joined with `,`
    pub events: String,
    pub matrix: Vec<IndexMap<String, String>>,
    pub runs_on: Vec<String>,
}

/// Rows of one listing together with the duplicate-id flag gathered while
/// building them.
#[derive(Debug, Default)]
pub struct RowSet {
    pub rows: Vec<Row>,
    /// Whether some job id appears in more than one run of the plan
    pub duplicate_job_ids: bool,
}

/// Flattens the plan into rows, stage by stage and run by run.
///
/// Any resolution or matrix failure aborts the whole listing.
pub fn build_rows(plan: &Plan) -> Result<RowSet> {
    let mut rows = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicate_job_ids = false;

    for (index, stage) in plan.stages().iter().enumerate() {
        for run in stage.runs() {
            let row = build_row(index, run)?;
            if !seen.insert(run.job_id()) {
                debug!("Job id `{}` seen again in stage {}", run.job_id(), index);
                duplicate_job_ids = true;
            }
            rows.push(row);
        }
    }

    Ok(RowSet {
        rows,
        duplicate_job_ids,
    })
}

fn build_row(stage_index: usize, run: &Run) -> Result<Row> {
    let workflow = run.workflow();
    let job = workflow.job(run.job_id())?;
    let matrix = job
        .matrix_combinations()
        .map_err(|source| PlanLensError::MatrixExpansion {
            job_id: run.job_id().to_string(),
            source,
        })?
        .iter()
        .map(stringify_combination)
        .collect();

    Ok(Row {
        job_id: run.job_id().to_string(),
        job_name: run.display_name(),
        stage: stage_index.to_string(),
        workflow_name: workflow.name().to_string(),
        workflow_file: workflow.file().to_string(),
        events: workflow.events().join(","),
        matrix,
        runs_on: job.runs_on(),
    })
}

fn stringify_combination(combination: &Combination) -> IndexMap<String, String> {
    combination
        .iter()
        .map(|(dimension, value)| (dimension.clone(), stringify_value(value)))
        .collect()
}
