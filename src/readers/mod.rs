pub mod csv_reader;
pub mod workbook_reader;

pub use csv_reader::CsvTableReader;
pub use workbook_reader::WorkbookReader;

use std::path::Path;

use crate::error::{ProcessingError, Result};
use crate::models::RawTable;
use crate::utils::constants::DEFAULT_CSV_DELIMITER;

/// Input formats the station table can be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    Workbook,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" | "tsv" => Ok(InputFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Workbook),
            _ => Err(ProcessingError::UnsupportedInput(path.display().to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub sheet: Option<String>,
}

/// Load the raw station table, choosing the reader by file extension
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    match InputFormat::from_path(path)? {
        InputFormat::Delimited => {
            let is_tsv = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
            let delimiter = options
                .delimiter
                .unwrap_or(if is_tsv { b'\t' } else { DEFAULT_CSV_DELIMITER });
            CsvTableReader::with_delimiter(delimiter).read_table(path)
        }
        InputFormat::Workbook => match &options.sheet {
            Some(sheet) => WorkbookReader::with_sheet(sheet.clone()).read_table(path),
            None => WorkbookReader::new().read_table(path),
        },
    }
}
