use thiserror::Error;

use crate::plan::MatrixError;

#[derive(Error, Debug)]
pub enum PlanLensError {
    #[error("job `{job_id}` not found in workflow {workflow_file}")]
    Resolution {
        job_id: String,
        workflow_file: String,
    },

    #[error("failed to expand matrix for job `{job_id}`: {source}")]
    MatrixExpansion {
        job_id: String,
        #[source]
        source: MatrixError,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlanLensError>;
