mod document;
mod matrix;
mod types;

pub use document::PlanDocument;
pub use matrix::{stringify_value, Combination, MatrixError};
pub use types::{Plan, Run};
