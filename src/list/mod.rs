mod render;
mod rows;

pub use rows::RowSet;

use render::{render_json, render_table};
use rows::build_rows;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::plan::Plan;

/// Renders a built row set in the requested format.
pub fn render(row_set: &RowSet, format: &OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(&row_set.rows, pretty),
        OutputFormat::Table => Ok(render_table(row_set)),
    }
}

/// Builds and renders the listing of `plan` as a single document.
///
/// Nothing is returned unless every row could be built.
pub fn list_plan(plan: &Plan, format: &OutputFormat, pretty: bool) -> Result<(String, RowSet)> {
    let row_set = build_rows(plan)?;
    let document = render(&row_set, format, pretty)?;
    Ok((document, row_set))
}
