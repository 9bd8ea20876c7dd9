use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::{CanonicalObservation, ObservationField};

/// Descriptive statistics for one series of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
    /// Sample standard deviation; undefined below two values
    pub std_dev: Option<f64>,
}

impl SeriesStats {
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let std_dev = (values.len() >= 2).then(|| {
            let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (m2 / (n - 1.0)).sqrt()
        });

        Some(Self {
            count: values.len(),
            min,
            max,
            mean,
            sum,
            std_dev,
        })
    }
}

/// Aggregates for one (year, month)
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    pub year: i32,
    pub month: u32,
    pub days: usize,
    pub tmax: SeriesStats,
    pub tmin: SeriesStats,
    pub humidity: SeriesStats,
    pub precipitation: SeriesStats,
}

/// One row of the annual summary export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub days: usize,
    pub tmax_min: f64,
    pub tmax_max: f64,
    pub tmax_mean: f64,
    pub tmin_min: f64,
    pub tmin_max: f64,
    pub tmin_mean: f64,
    pub humidity_mean: f64,
    pub precipitation_sum: f64,
}

/// Whole-table statistics
#[derive(Debug, Clone)]
pub struct StationStatistics {
    pub total_records: usize,
    pub date_range: (NaiveDate, NaiveDate),
    pub fields: Vec<(ObservationField, SeriesStats)>,
}

impl StationStatistics {
    pub fn field(&self, field: ObservationField) -> Option<&SeriesStats> {
        self.fields.iter().find(|(f, _)| *f == field).map(|(_, s)| s)
    }

    pub fn summary(&self) -> String {
        format!(
            "Observations: {} days\n\
            Date Range: {} to {}",
            self.total_records,
            self.date_range.0.format("%d-%m-%Y"),
            self.date_range.1.format("%d-%m-%Y"),
        )
    }

    pub fn detailed_summary(&self) -> String {
        let mut summary = self.summary();

        for (field, stats) in &self.fields {
            let units = field.units();
            let std_dev = stats
                .std_dev
                .map(|s| format!("{:.2} {}", s, units))
                .unwrap_or_else(|| "n/a".to_string());

            summary.push_str(&format!(
                "\n\n{} ({}):\n\
                - Minimum: {:.2} {}\n\
                - Maximum: {:.2} {}\n\
                - Mean:    {:.2} {}\n\
                - Std Dev: {}",
                field.display_name(),
                units,
                stats.min,
                units,
                stats.max,
                units,
                stats.mean,
                units,
                std_dev
            ));
        }

        summary
    }
}

/// Groups the canonical table by year and month
pub struct StationAnalyzer;

impl StationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Per (year, month) aggregates, ascending
    pub fn monthly(&self, observations: &[CanonicalObservation]) -> Vec<MonthlyAggregate> {
        let groups = group_by(observations, |o| (o.date.year(), o.date.month()));

        groups
            .par_iter()
            .filter_map(|((year, month), rows)| {
                Some(MonthlyAggregate {
                    year: *year,
                    month: *month,
                    days: rows.len(),
                    tmax: field_stats(rows, ObservationField::Tmax)?,
                    tmin: field_stats(rows, ObservationField::Tmin)?,
                    humidity: field_stats(rows, ObservationField::Humidity)?,
                    precipitation: field_stats(rows, ObservationField::Precipitation)?,
                })
            })
            .collect()
    }

    /// Per-year summary rows, ascending, rounded to 2 decimals
    pub fn annual(&self, observations: &[CanonicalObservation]) -> Vec<AnnualSummary> {
        let groups = group_by(observations, |o| o.date.year());

        groups
            .par_iter()
            .filter_map(|(year, rows)| {
                let tmax = field_stats(rows, ObservationField::Tmax)?;
                let tmin = field_stats(rows, ObservationField::Tmin)?;
                let humidity = field_stats(rows, ObservationField::Humidity)?;
                let precipitation = field_stats(rows, ObservationField::Precipitation)?;

                Some(AnnualSummary {
                    year: *year,
                    days: rows.len(),
                    tmax_min: round2(tmax.min),
                    tmax_max: round2(tmax.max),
                    tmax_mean: round2(tmax.mean),
                    tmin_min: round2(tmin.min),
                    tmin_max: round2(tmin.max),
                    tmin_mean: round2(tmin.mean),
                    humidity_mean: round2(humidity.mean),
                    precipitation_sum: round2(precipitation.sum),
                })
            })
            .collect()
    }

    /// Whole-table statistics per field
    pub fn overall(&self, observations: &[CanonicalObservation]) -> Result<StationStatistics> {
        let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
            return Err(ProcessingError::InvalidFormat(
                "No observations to analyze".to_string(),
            ));
        };

        let rows: Vec<&CanonicalObservation> = observations.iter().collect();
        let fields = ObservationField::ALL
            .iter()
            .filter_map(|field| field_stats(&rows, *field).map(|s| (*field, s)))
            .collect();

        let (start, end) = if first.date <= last.date {
            (first.date, last.date)
        } else {
            (last.date, first.date)
        };

        Ok(StationStatistics {
            total_records: observations.len(),
            date_range: (start, end),
            fields,
        })
    }
}

impl Default for StationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn group_by<K: Ord + Copy>(
    observations: &[CanonicalObservation],
    key: impl Fn(&CanonicalObservation) -> K,
) -> Vec<(K, Vec<&CanonicalObservation>)> {
    let mut groups: BTreeMap<K, Vec<&CanonicalObservation>> = BTreeMap::new();
    for observation in observations {
        groups.entry(key(observation)).or_default().push(observation);
    }
    groups.into_iter().collect()
}

fn field_stats(rows: &[&CanonicalObservation], field: ObservationField) -> Option<SeriesStats> {
    let values: Vec<f64> = rows.iter().map(|o| o.value(field)).collect();
    SeriesStats::compute(&values)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
