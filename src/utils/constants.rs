/// Fixed positional layout of the station spreadsheet
pub const COLUMN_COUNT: usize = 5;
pub const COL_DATE: usize = 0;
pub const COL_TMAX: usize = 1;
pub const COL_TMIN: usize = 2;
pub const COL_HUMIDITY: usize = 3;
pub const COL_PRECIPITATION: usize = 4;

/// Canonical column names
pub const CANONICAL_COLUMNS: [&str; COLUMN_COUNT] =
    ["date", "tmax", "tmin", "humidity", "precipitation"];

/// Sentinel tokens
pub const TOKEN_NO_DATA: &str = "S/D";
pub const TOKEN_NO_DATA_LONG: &str = "SIN DATOS";
pub const TOKEN_DASH: &str = "-";
pub const TOKEN_TRACE: &str = "T";
pub const TRACE_PRECIPITATION_MM: f64 = 0.1;

/// Valid ranges
pub const MIN_VALID_TEMP: f64 = -20.0;
pub const MAX_VALID_TEMP: f64 = 50.0;
pub const MIN_VALID_HUMIDITY: f64 = 0.0;
pub const MAX_VALID_HUMIDITY: f64 = 100.0;
pub const MIN_VALID_PRECIPITATION: f64 = 0.0;

/// Spreadsheet serial dates count days from this epoch
pub const SPREADSHEET_EPOCH: (i32, u32, u32) = (1899, 12, 30);
pub const MAX_SPREADSHEET_SERIAL: f64 = 2_958_465.0; // 9999-12-31
/// Serials written as text must have at least five digits; shorter numbers read as years
pub const MIN_TEXT_SERIAL: f64 = 10_000.0; // 1927-05-18

/// Text date formats tried in order
pub const DEFAULT_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const CONFIG_ENV_PREFIX: &str = "STATION_CLEANER";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

/// Comparison chart palette, one colour per year
pub const YEAR_COLORS: [(i32, &str); 9] = [
    (2018, "#1f77b4"),
    (2019, "#ff7f0e"),
    (2020, "#2ca02c"),
    (2021, "#d62728"),
    (2022, "#9467bd"),
    (2023, "#8c564b"),
    (2024, "#e377c2"),
    (2025, "#7f7f7f"),
    (2026, "#bcbd22"),
];

pub const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
