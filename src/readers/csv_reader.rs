use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::models::{RawCell, RawTable};
use crate::utils::constants::DEFAULT_CSV_DELIMITER;

/// Reads a delimited text export of the station spreadsheet
pub struct CsvTableReader {
    delimiter: u8,
}

impl CsvTableReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_CSV_DELIMITER,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read a table from a file; the first record is the header
    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let bytes = std::fs::read(path)?;
        let text = decode(&bytes);
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.parse_table(&text)
    }

    /// Parse delimited text into a raw table
    pub fn parse_table(&self, text: &str) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;

            // Skip blank lines
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            rows.push(record.iter().map(to_cell).collect());
        }

        RawTable::new(headers, rows)
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

fn to_cell(field: &str) -> RawCell {
    if field.is_empty() {
        RawCell::Empty
    } else {
        RawCell::Text(field.to_string())
    }
}

/// UTF-8 when valid, otherwise Windows-1252 (spreadsheet exports with accented headers)
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}
