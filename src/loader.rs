use crate::error::{ReportError, Result};
use crate::types::VacancyRecord;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub dropped_rows: usize,
}

/// Read the header and every data row as plain strings.
///
/// The reader is flexible so short or long rows come through and can be
/// dropped by the caller instead of failing the whole file.
pub fn read_rows(path: impl AsRef<Path>) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;
    let mut records = rdr.records();

    let mut header: Vec<String> = match records.next() {
        Some(first) => first?.iter().map(str::to_string).collect(),
        None => return Err(ReportError::MissingHeader),
    };
    if let Some(first) = header.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let mut rows = Vec::new();
    for result in records {
        rows.push(result?.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}

/// A row is usable only if it has exactly one value per header column and
/// none of them is empty.
pub fn is_complete_row(header: &[String], row: &[String]) -> bool {
    row.len() == header.len() && row.iter().all(|v| !v.is_empty())
}

pub fn load_records(path: impl AsRef<Path>) -> Result<(Vec<VacancyRecord>, LoadReport)> {
    let path = path.as_ref();
    let (header, rows) = read_rows(path)?;
    let total_rows = rows.len();

    let mut records = Vec::with_capacity(total_rows);
    for row in rows.iter().filter(|r| is_complete_row(&header, r)) {
        let fields: HashMap<&str, &str> = header
            .iter()
            .map(String::as_str)
            .zip(row.iter().map(String::as_str))
            .collect();
        records.push(VacancyRecord::from_fields(&fields)?);
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        dropped_rows: total_rows - records.len(),
    };
    debug!(columns = header.len(), "header read");
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        dropped = report.dropped_rows,
        "vacancies loaded"
    );
    Ok((records, report))
}
