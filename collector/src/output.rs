//! Output shell: CSV rendering, file saving and console summaries

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use shared::{AwardTable, Column};
use tokio::fs;

use crate::error::CollectorResult;
use crate::types::{CollectionReport, OutcomeStatus};

/// What happened when saving a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved { path: PathBuf, rows: usize },
    NothingToSave,
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn escape_field(field: &str) -> String {
    if needs_quotes(field) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let line = cells.map(escape_field).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Render the table as CSV with a header row
pub fn render_csv(table: &AwardTable) -> String {
    let mut out = String::new();
    write_row(&mut out, table.columns.iter().map(Column::name));
    for row in &table.rows {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|column| row.cell(*column).unwrap_or_default())
            .collect();
        write_row(&mut out, cells.iter().map(String::as_str));
    }
    out
}

/// Write the table to `path`, creating parent directories. Empty tables write nothing.
pub async fn save_table(table: &AwardTable, path: &Path) -> CollectorResult<SaveStatus> {
    if table.is_empty() {
        return Ok(SaveStatus::NothingToSave);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, render_csv(table)).await?;

    Ok(SaveStatus::Saved {
        path: path.to_path_buf(),
        rows: table.len(),
    })
}

const PREVIEW_COLUMNS: [Column; 6] = [
    Column::Id,
    Column::Title,
    Column::AwardeeName,
    Column::PiLastName,
    Column::StartDate,
    Column::FundsObligatedAmt,
];

const PREVIEW_WIDTH: usize = 40;

/// First `limit` rows of a few key columns, aligned for the console
pub fn format_preview(table: &AwardTable, limit: usize) -> String {
    let columns: Vec<Column> = PREVIEW_COLUMNS
        .into_iter()
        .filter(|column| table.columns.contains(column))
        .collect();

    let mut out = String::new();
    let header: Vec<&str> = columns.iter().map(Column::name).collect();
    let _ = writeln!(out, "{}", header.join(" | "));

    for row in table.rows.iter().take(limit) {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| truncate(&row.cell(*column).unwrap_or_default(), PREVIEW_WIDTH))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | "));
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// One line per strategy with its result
pub fn format_outcomes(report: &CollectionReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let _ = match &outcome.status {
            OutcomeStatus::Completed { fetched, unique } => {
                writeln!(out, "  {:<40} {:>5} fetched {:>5} new", outcome.label, fetched, unique)
            }
            OutcomeStatus::Failed { reason } => {
                writeln!(out, "  {:<40} FAILED: {}", outcome.label, reason)
            }
        };
    }
    if report.fallback_used {
        let _ = writeln!(out, "  (start-date fallback used)");
    }
    out
}
