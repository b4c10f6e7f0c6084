//! CSV export of the filtered rows.

use crate::filter::FilteredView;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Flush(String),
}

/// UTF-8 CSV bytes: the header row, then every filtered row with its
/// original columns in their original order.
///
/// # Errors
///
/// Returns an error if the in-memory writer fails.
pub fn export_csv(view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(view.headers())?;
    for record in view.rows() {
        writer.write_record(&record.cells)?;
    }
    writer.into_inner().map_err(|err| ExportError::Flush(err.to_string()))
}

/// `{company}_sentiment.csv`, with path separators, quotes and control
/// characters replaced by `_`.
#[must_use]
pub fn export_filename(company: &str) -> String {
    let stem: String = company
        .trim()
        .chars()
        .map(|c| if c.is_control() || matches!(c, '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    format!("{stem}_sentiment.csv")
}

/// `Content-Disposition` value for a download. Non-ASCII names get an ASCII
/// fallback plus an RFC 5987 `filename*` parameter.
#[must_use]
pub fn content_disposition(filename: &str) -> String {
    if filename.is_ascii() {
        return format!("attachment; filename=\"{filename}\"");
    }
    let fallback: String = filename.chars().map(|c| if c.is_ascii() { c } else { '_' }).collect();
    let mut encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
