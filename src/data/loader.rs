//! Table readers: comma-separated text and spreadsheet workbooks.
//!
//! The reader is picked by file extension. Both produce the same `Table`, so
//! everything downstream is format-agnostic.

use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{Data, DataType, Reader, open_workbook_auto};

use super::{SchemaError, Table};

/// Extensions read as workbooks; anything else is read as CSV.
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Any failure that prevents the datasets from loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read workbook {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook {} has no worksheets", path.display())]
    NoWorksheet { path: PathBuf },
    #[error("malformed {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

/// Read a table with a header row from a CSV file or the first worksheet of
/// a workbook.
///
/// # Errors
///
/// See `read_csv` and `read_spreadsheet`.
pub fn load_table(path: &Path) -> Result<Table, DataLoadError> {
    let table = if is_spreadsheet(path) { read_spreadsheet(path)? } else { read_csv(path)? };
    tracing::debug!(path = %path.display(), columns = table.headers.len(), rows = table.rows.len(), "table read");
    Ok(table)
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Every record must have as many fields as the header.
///
/// # Errors
///
/// Returns `Io` when the file cannot be opened and `Csv` when it is not
/// well-formed CSV or is not valid UTF-8.
pub fn read_csv(path: &Path) -> Result<Table, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io { path: path.to_path_buf(), source })?;
    let csv_error = |source: csv::Error| DataLoadError::Csv { path: path.to_path_buf(), source };

    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader.headers().map_err(csv_error)?.iter().map(str::to_owned).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(Table::new(headers, rows))
}

/// The first worksheet's used range; its first row is the header. Missing
/// cells read as blank strings.
///
/// # Errors
///
/// Returns `Spreadsheet` when the workbook cannot be opened or decoded and
/// `NoWorksheet` when it contains no sheets.
pub fn read_spreadsheet(path: &Path) -> Result<Table, DataLoadError> {
    let spreadsheet_error = |source: calamine::Error| DataLoadError::Spreadsheet { path: path.to_path_buf(), source };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataLoadError::NoWorksheet { path: path.to_path_buf() })?
        .map_err(spreadsheet_error)?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    Ok(Table::new(headers, rows.collect()))
}

/// Dates render as `YYYY-MM-DD HH:MM:SS`; everything else uses the cell's
/// own display form.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) => cell.as_datetime().map_or_else(|| cell.to_string(), |dt| dt.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
