use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CleaningConfig;

/// The numeric fields of an observation, in imputation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationField {
    Tmax,
    Tmin,
    Humidity,
    Precipitation,
}

impl ObservationField {
    pub const ALL: [ObservationField; 4] = [
        ObservationField::Tmax,
        ObservationField::Tmin,
        ObservationField::Humidity,
        ObservationField::Precipitation,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            ObservationField::Tmax => "tmax",
            ObservationField::Tmin => "tmin",
            ObservationField::Humidity => "humidity",
            ObservationField::Precipitation => "precipitation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ObservationField::Tmax => "Maximum Temperature",
            ObservationField::Tmin => "Minimum Temperature",
            ObservationField::Humidity => "Relative Humidity",
            ObservationField::Precipitation => "Precipitation",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            ObservationField::Tmax | ObservationField::Tmin => "°C",
            ObservationField::Humidity => "%",
            ObservationField::Precipitation => "mm",
        }
    }
}

impl std::fmt::Display for ObservationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// One cleaned day of station observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalObservation {
    #[serde(skip)]
    pub index: usize,
    pub date: NaiveDate,
    pub tmax: f64,
    pub tmin: f64,
    pub humidity: f64,
    pub precipitation: f64,
}

impl CanonicalObservation {
    pub fn new(
        index: usize,
        date: NaiveDate,
        tmax: f64,
        tmin: f64,
        humidity: f64,
        precipitation: f64,
    ) -> Self {
        Self {
            index,
            date,
            tmax,
            tmin,
            humidity,
            precipitation,
        }
    }

    pub fn value(&self, field: ObservationField) -> f64 {
        match field {
            ObservationField::Tmax => self.tmax,
            ObservationField::Tmin => self.tmin,
            ObservationField::Humidity => self.humidity,
            ObservationField::Precipitation => self.precipitation,
        }
    }

    pub fn temperature_range(&self) -> f64 {
        self.tmax - self.tmin
    }

    /// Minimum above maximum: physically odd but not rejected by the pipeline
    pub fn has_temperature_inversion(&self) -> bool {
        self.tmin > self.tmax
    }

    pub fn is_within_ranges(&self, config: &CleaningConfig) -> bool {
        config.temperature_range.contains(self.tmax)
            && config.temperature_range.contains(self.tmin)
            && config.humidity_range.contains(self.humidity)
            && config.precipitation_is_valid(self.precipitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(tmax: f64, tmin: f64, humidity: f64, precipitation: f64) -> CanonicalObservation {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CanonicalObservation::new(0, date, tmax, tmin, humidity, precipitation)
    }

    #[test]
    fn test_range_checks() {
        let config = CleaningConfig::default();

        assert!(observation(30.5, 18.2, 70.0, 0.1).is_within_ranges(&config));
        assert!(observation(50.0, -20.0, 100.0, 0.0).is_within_ranges(&config));
        assert!(!observation(95.0, 18.2, 70.0, 0.0).is_within_ranges(&config));
        assert!(!observation(30.0, 18.2, 100.5, 0.0).is_within_ranges(&config));
        assert!(!observation(30.0, 18.2, 70.0, -1.0).is_within_ranges(&config));
    }

    #[test]
    fn test_field_accessors() {
        let obs = observation(31.0, 19.0, 70.0, 2.5);
        assert_eq!(obs.value(ObservationField::Tmax), 31.0);
        assert_eq!(obs.value(ObservationField::Precipitation), 2.5);
        assert_eq!(obs.temperature_range(), 12.0);
        assert!(!obs.has_temperature_inversion());
        assert!(observation(10.0, 12.0, 70.0, 0.0).has_temperature_inversion());
    }
}
