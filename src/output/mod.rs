mod styling;
mod tables;

pub use tables::{apply_gutter, create_plain_table};

use log::info;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::list::RowSet;
use styling::{bright, dim, magenta_bold};

/// Banner shown at start-up: tool name, version and what it lists.
fn banner_text() -> String {
    format!(
        "\n{} {}\n  {}\n",
        magenta_bold("planlens"),
        dim(format!("v{}", env!("CARGO_PKG_VERSION"))),
        dim("stage-by-stage job listing for execution plans")
    )
}

/// Prints the banner to stderr so stdout carries only the document.
pub fn print_banner() {
    eprintln!("{}", banner_text());
}

/// Prints a one-line recap of the listing to stderr.
pub fn print_listing_summary(row_set: &RowSet, stages: usize) {
    eprintln!(
        "{} {}",
        bright(format!("{} jobs", row_set.rows.len())),
        dim(format!("across {stages} stages"))
    );
}

/// Writes a rendered document to `path`, or to stdout when no path is given.
///
/// The document is written in a single call once it is complete.
pub fn write_document(document: &str, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        std::fs::write(path, document)?;
        info!("Listing written to: {}", path.display());
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(document.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
