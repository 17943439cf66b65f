//! CSV ingestion: raw text to [`Record`]s.
//!
//! The datasets are plain comma-separated files without quoting, so the reader
//! is configured with quoting disabled and flexible row lengths; rows whose cell
//! count differs from the header are dropped rather than padded.

use crate::error::{DashboardError, Result};
use crate::models::{Field, Record};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use std::path::Path;

/// Result of parsing one CSV document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Trimmed header cells, in file order.
    pub header: Vec<String>,
    /// One record per accepted data line.
    pub records: Vec<Record>,
    /// Number of non-blank data lines rejected for a cell-count mismatch.
    pub dropped: usize,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the header names `field`.
    pub fn has_column(&self, field: Field) -> bool {
        self.header.iter().any(|h| h == field.header())
    }
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

/// Parse CSV text. Never fails: unreadable lines are counted and skipped.
pub fn parse_csv_text(text: &str) -> Table {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut table = Table::default();
    let mut columns: Option<Vec<Option<Field>>> = None;

    for row in reader.records() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                debug!("skipping unreadable line: {}", e);
                table.dropped += 1;
                continue;
            }
        };
        // Whitespace-only lines come back as a single empty cell after trimming.
        if row.len() <= 1 && is_blank(&row) {
            continue;
        }

        let Some(cols) = columns.as_ref() else {
            table.header = row.iter().map(str::to_string).collect();
            columns = Some(table.header.iter().map(|h| Field::from_header(h)).collect());
            continue;
        };

        if row.len() != cols.len() {
            debug!(
                "dropping line {}: {} cells, header has {}",
                row.position().map_or(0, |p| p.line()),
                row.len(),
                cols.len()
            );
            table.dropped += 1;
            continue;
        }

        let cells: Vec<&str> = row.iter().collect();
        table.records.push(Record::from_cells(cols, &cells));
    }

    table
}

/// Read and parse a CSV dataset from disk.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DashboardError::DatasetRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_csv_text(&text);
    info!(
        "loaded {}: {} records, {} dropped",
        path.display(),
        table.len(),
        table.dropped
    );
    Ok(table)
}
