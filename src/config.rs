use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_DATE_FORMATS, MAX_VALID_HUMIDITY, MAX_VALID_TEMP,
    MIN_VALID_HUMIDITY, MIN_VALID_PRECIPITATION, MIN_VALID_TEMP, TOKEN_DASH, TOKEN_NO_DATA,
    TOKEN_NO_DATA_LONG, TOKEN_TRACE, TRACE_PRECIPITATION_MM,
};

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN never falls inside a range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn validate_bounds(range: &ValueRange) -> std::result::Result<(), ValidationError> {
    if range.min.is_nan() || range.max.is_nan() || range.min > range.max {
        return Err(ValidationError::new("inverted_range"));
    }
    Ok(())
}

/// Token dictionary and valid ranges used by the cleaning pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CleaningConfig {
    #[validate(length(min = 1))]
    pub missing_tokens: Vec<String>,

    #[validate(length(min = 1))]
    pub trace_token: String,

    #[validate(range(min = 0.0))]
    pub trace_value: f64,

    #[validate(nested)]
    pub temperature_range: ValueRange,

    #[validate(nested)]
    pub humidity_range: ValueRange,

    pub precipitation_min: f64,

    #[validate(length(min = 1))]
    pub date_formats: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            missing_tokens: [TOKEN_NO_DATA, TOKEN_NO_DATA_LONG, TOKEN_DASH, ""]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            trace_token: TOKEN_TRACE.to_string(),
            trace_value: TRACE_PRECIPITATION_MM,
            temperature_range: ValueRange::new(MIN_VALID_TEMP, MAX_VALID_TEMP),
            humidity_range: ValueRange::new(MIN_VALID_HUMIDITY, MAX_VALID_HUMIDITY),
            precipitation_min: MIN_VALID_PRECIPITATION,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl CleaningConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `STATION_CLEANER__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("missing_tokens")
                .with_list_parse_key("date_formats")
                .try_parsing(true),
        );

        let config: CleaningConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Missing tokens in the upper-cased form cells are compared against
    pub fn normalized_missing_tokens(&self) -> Vec<String> {
        self.missing_tokens
            .iter()
            .map(|t| t.trim().to_uppercase())
            .collect()
    }

    pub fn normalized_trace_token(&self) -> String {
        self.trace_token.trim().to_uppercase()
    }

    pub fn precipitation_is_valid(&self, value: f64) -> bool {
        value >= self.precipitation_min
    }
}
