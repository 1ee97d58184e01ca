use std::fmt::Write;

use super::rows::{Row, RowSet};
use crate::error::Result;
use crate::output::{apply_gutter, create_plain_table};

/// Printed under the table when a job id appears more than once.
pub const DUPLICATE_JOB_ADVISORY: &str = "Detected multiple jobs with the same job name, use `-W` to specify the path to the specific workflow.";

const HEADERS: [&str; 6] = [
    "Stage",
    "Job ID",
    "Job name",
    "Workflow name",
    "Workflow file",
    "Events",
];

/// Spacing after every column but the last.
const GUTTER: u16 = 2;

/// Serializes the rows as a JSON array followed by a newline.
///
/// The duplicate flag is not part of the document.
pub fn render_json(rows: &[Row], pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(rows)?
    } else {
        serde_json::to_string(rows)?
    };
    json.push('\n');
    Ok(json)
}

/// Renders the rows as a left-aligned table.
///
/// Each column is as wide as its longest value plus the gutter; matrix and
/// runner labels are only available in JSON output.
pub fn render_table(row_set: &RowSet) -> String {
    let mut table = create_plain_table();
    table.set_header(HEADERS);
    for row in &row_set.rows {
        table.add_row(table_fields(row));
    }
    apply_gutter(&mut table, GUTTER);

    let mut output = table.to_string();
    output.push('\n');
    if row_set.duplicate_job_ids {
        let _ = write!(output, "\n{DUPLICATE_JOB_ADVISORY}\n");
    }
    output
}

fn table_fields(row: &Row) -> [&str; 6] {
    [
        row.stage.as_str(),
        row.job_id.as_str(),
        row.job_name.as_str(),
        row.workflow_name.as_str(),
        row.workflow_file.as_str(),
        row.events.as_str(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    /// Longest character count per column plus the gutter, last column bare.
    fn column_widths(rows: &[Row]) -> [usize; 6] {
        let mut widths = HEADERS.map(|header| header.chars().count());
        for row in rows {
            for (width, field) in widths.iter_mut().zip(table_fields(row)) {
                *width = (*width).max(field.chars().count());
            }
        }
        for width in &mut widths[..HEADERS.len() - 1] {
            *width += usize::from(GUTTER);
        }
        widths
    }

    fn row(stage: &str, job_id: &str, job_name: &str) -> Row {
        Row {
            job_id: job_id.to_string(),
            job_name: job_name.to_string(),
            stage: stage.to_string(),
            workflow_name: "CI".to_string(),
            workflow_file: "ci.yml".to_string(),
            events: "push".to_string(),
            matrix: vec![],
            runs_on: vec![],
        }
    }

    #[test]
    fn test_single_row_table() {
        let row_set = RowSet {
            rows: vec![row("0", "build", "build")],
            duplicate_job_ids: false,
        };

        let output = render_table(&row_set);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Stage  Job ID  Job name  Workflow name  Workflow file  Events"
        );
        assert_eq!(
            lines[1],
            "0      build   build     CI             ci.yml         push  "
        );
        assert!(!output.contains(DUPLICATE_JOB_ADVISORY));
    }

    #[test]
    fn test_column_widths_follow_longest_value() {
        let rows = vec![
            row("0", "build", "Build the application"),
            row("1", "integration-tests", "it"),
        ];
        let widths = column_widths(&rows);
        assert_eq!(
            widths,
            [5 + 2, 17 + 2, 21 + 2, 13 + 2, 13 + 2, 6]
        );

        let output = render_table(&RowSet {
            rows,
            duplicate_job_ids: false,
        });
        let job_name_start = widths[0] + widths[1];
        let workflow_start = job_name_start + widths[2];
        for line in output.lines().skip(1) {
            assert_eq!(&line[workflow_start..workflow_start + 2], "CI");
        }
        let second = output.lines().nth(2).unwrap();
        assert_eq!(&second[job_name_start..workflow_start], "it                     ");
    }

    #[test]
    fn test_lines_are_aligned_to_column_starts() {
        let rows = vec![
            row("0", "build", "Build the application"),
            row("10", "integration-tests", "it"),
        ];
        let widths = column_widths(&rows);
        let total: usize = widths[..5].iter().sum();
        let output = render_table(&RowSet {
            rows,
            duplicate_job_ids: false,
        });

        for line in output.lines() {
            assert!(line.chars().count() >= total);
        }

        let header = output.lines().next().unwrap();
        let mut start = 0;
        for (label, width) in HEADERS.iter().zip(widths) {
            assert!(header[start..].starts_with(label));
            start += width;
        }
        let third = output.lines().nth(2).unwrap();
        assert!(third.starts_with("10     integration-tests"));
    }

    #[test]
    fn test_widths_count_characters_not_bytes() {
        let rows = vec![
            row("0", "build", "Tëst ✓ on ünïcode"),
            row("1", "lint", "lint"),
        ];
        let widths = column_widths(&rows);
        assert_eq!(widths[2], 17 + 2);

        let output = render_table(&RowSet {
            rows,
            duplicate_job_ids: false,
        });
        let workflow_start = widths[0] + widths[1] + widths[2];
        let columns: Vec<String> = output
            .lines()
            .map(|line| line.chars().skip(workflow_start).collect())
            .collect();

        assert!(columns[0].starts_with("Workflow name"));
        assert!(columns[1].starts_with("CI "));
        assert!(columns[2].starts_with("CI "));
        let second = output.lines().nth(1).unwrap();
        assert!(second.starts_with("0      build   Tëst ✓ on ünïcode  CI"));
    }

    #[test]
    fn test_empty_table_has_only_header() {
        let output = render_table(&RowSet::default());
        assert_eq!(
            output,
            "Stage  Job ID  Job name  Workflow name  Workflow file  Events\n"
        );
    }

    #[test]
    fn test_advisory_after_rows_when_duplicates() {
        let row_set = RowSet {
            rows: vec![row("0", "test", "test"), row("1", "test", "test")],
            duplicate_job_ids: true,
        };

        let output = render_table(&row_set);
        assert!(output.ends_with(&format!("\n\n{DUPLICATE_JOB_ADVISORY}\n")));
        assert_eq!(output.lines().count(), 5);
    }

    #[test]
    fn test_table_omits_matrix_and_runs_on() {
        let mut matrix_row = row("0", "test", "test");
        matrix_row.matrix = vec![IndexMap::from([("os".to_string(), "macos-14".to_string())])];
        matrix_row.runs_on = vec!["self-hosted-gpu".to_string()];

        let output = render_table(&RowSet {
            rows: vec![matrix_row],
            duplicate_job_ids: false,
        });
        assert!(!output.contains("macos-14"));
        assert!(!output.contains("self-hosted-gpu"));
    }

    #[test]
    fn test_json_matches_row_layout() {
        let json = render_json(&[row("0", "build", "build")], false).unwrap();
        assert_eq!(
            json,
            "[{\"job_id\":\"build\",\"job_name\":\"build\",\"stage\":\"0\",\"workflow_name\":\"CI\",\"workflow_file\":\"ci.yml\",\"events\":\"push\",\"matrix\":[],\"runs_on\":[]}]\n"
        );
    }

    #[test]
    fn test_json_of_no_rows_is_empty_array() {
        assert_eq!(render_json(&[], false).unwrap(), "[]\n");
    }

    #[test]
    fn test_json_round_trip() {
        let mut first = row("0", "test", "Test (${{ matrix.os }})");
        first.matrix = vec![
            IndexMap::from([("os".to_string(), "ubuntu".to_string())]),
            IndexMap::from([("os".to_string(), "macos".to_string())]),
        ];
        first.runs_on = vec!["ubuntu-latest".to_string()];
        let rows = vec![first, row("1", "test", "test")];

        for pretty in [false, true] {
            let json = render_json(&rows, pretty).unwrap();
            let decoded: Vec<Row> = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, rows);
        }
    }
}
