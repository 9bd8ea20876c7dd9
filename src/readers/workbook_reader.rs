use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::models::{RawCell, RawTable};

/// Reads the station table from a spreadsheet workbook (xlsx, xls, ods)
pub struct WorkbookReader {
    sheet: Option<String>,
}

impl WorkbookReader {
    pub fn new() -> Self {
        Self { sheet: None }
    }

    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }

    /// Read the configured sheet (the first one by default).
    ///
    /// This is synchronous; async callers should use `spawn_blocking`.
    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(path)?;

        let range = match &self.sheet {
            Some(name) => workbook.worksheet_range(name)?,
            None => workbook.worksheet_range_at(0).ok_or_else(|| {
                ProcessingError::Workbook(format!("No worksheets in {}", path.display()))
            })??,
        };

        info!(
            "Loaded worksheet {} from {} ({} x {})",
            self.sheet.as_deref().unwrap_or("#0"),
            path.display(),
            range.height(),
            range.width()
        );

        range_to_table(&range)
    }
}

impl Default for WorkbookReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a worksheet range into a raw table; the first row is the header
pub fn range_to_table(range: &Range<Data>) -> Result<RawTable> {
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Err(ProcessingError::EmptyInput);
    };

    let mut cells: Vec<Vec<RawCell>> = rows
        .map(|row| row.iter().map(to_cell).collect::<Vec<_>>())
        .collect();

    // Trailing blank rows are formatting residue, not observations
    while cells
        .last()
        .is_some_and(|row| row.iter().all(RawCell::is_blank))
    {
        cells.pop();
    }

    let mut headers: Vec<String> = header_row.iter().map(header_text).collect();
    let width = used_width(&headers, &cells);
    headers.truncate(width);
    for row in &mut cells {
        row.truncate(width);
    }

    debug!("Worksheet has {} columns and {} data rows", width, cells.len());

    RawTable::new(headers, cells)
}

/// Number of leading columns that carry a header or any value
fn used_width(headers: &[String], rows: &[Vec<RawCell>]) -> usize {
    let mut width = headers.len();
    while width > 0 {
        let column = width - 1;
        let header_blank = headers[column].trim().is_empty();
        let cells_blank = rows
            .iter()
            .all(|row| row.get(column).map_or(true, RawCell::is_blank));
        if !(header_blank && cells_blank) {
            break;
        }
        width -= 1;
    }
    width
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

pub fn to_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) if s.is_empty() => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => RawCell::Date(datetime.date()),
            None => RawCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) | Data::Empty => RawCell::Empty,
    }
}
