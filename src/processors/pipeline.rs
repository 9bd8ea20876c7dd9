use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::CleaningConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{
    CanonicalObservation, CleaningReport, DropCounts, FieldImputations, ObservationField, RawCell,
    RawObservation, RawTable,
};
use crate::processors::cell_parser::{CellParser, ParsedValue};
use crate::processors::imputation::{impute_column, ImputationStrategy};
use crate::utils::constants::{COL_DATE, COL_HUMIDITY, COL_PRECIPITATION, COL_TMAX, COL_TMIN};

/// One value per numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldValues<T> {
    pub tmax: T,
    pub tmin: T,
    pub humidity: T,
    pub precipitation: T,
}

impl<T> FieldValues<T> {
    pub fn get(&self, field: ObservationField) -> &T {
        match field {
            ObservationField::Tmax => &self.tmax,
            ObservationField::Tmin => &self.tmin,
            ObservationField::Humidity => &self.humidity,
            ObservationField::Precipitation => &self.precipitation,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(ObservationField, &T) -> U) -> FieldValues<U> {
        FieldValues {
            tmax: f(ObservationField::Tmax, &self.tmax),
            tmin: f(ObservationField::Tmin, &self.tmin),
            humidity: f(ObservationField::Humidity, &self.humidity),
            precipitation: f(ObservationField::Precipitation, &self.precipitation),
        }
    }
}

/// Raw cells addressed by meaning instead of position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedRow<'a> {
    pub date: &'a RawCell,
    pub values: FieldValues<&'a RawCell>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRow {
    pub date: Option<NaiveDate>,
    pub values: FieldValues<ParsedValue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedRow {
    pub date: NaiveDate,
    pub values: FieldValues<ParsedValue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImputedRow {
    pub date: NaiveDate,
    pub values: FieldValues<Option<f64>>,
}

/// Canonical table plus the audit of how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOutput {
    pub observations: Vec<CanonicalObservation>,
    pub report: CleaningReport,
}

/// Turns a raw station table into the canonical observation table
pub struct CleaningPipeline {
    config: CleaningConfig,
    parser: CellParser,
}

impl CleaningPipeline {
    pub fn new(config: CleaningConfig) -> Self {
        let parser = CellParser::new(&config);
        Self { config, parser }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run every stage in order. Fails only when nothing survives.
    pub fn clean(&self, table: &RawTable) -> Result<CleaningOutput> {
        let mut report = CleaningReport {
            input_rows: table.len(),
            ..Default::default()
        };

        let (unique, duplicates) = remove_duplicates(table.rows());
        report.dropped.duplicates = duplicates;
        debug!("Removed {} exact duplicate rows", duplicates);

        let named = normalize_schema(&unique);
        let parsed = parse_values(&self.parser, &named);

        let (dated, missing_date) = filter_missing_dates(&parsed);
        report.dropped.missing_date = missing_date;
        debug!("Dropped {} rows without a resolvable date", missing_date);

        let (imputed, imputations) = impute_missing(&dated);
        report.imputed = imputations;

        let (in_range, range_drops) = reject_out_of_range(&self.config, &imputed);
        report.dropped.temperature_out_of_range = range_drops.temperature_out_of_range;
        report.dropped.humidity_out_of_range = range_drops.humidity_out_of_range;
        report.dropped.negative_precipitation = range_drops.negative_precipitation;
        debug!("Dropped {} out-of-range rows", range_drops.out_of_range());

        let (observations, conflicting) = order_by_date(in_range);
        report.dropped.conflicting_dates = conflicting;
        if conflicting > 0 {
            warn!(
                "Dropped {} rows sharing a date with an earlier row",
                conflicting
            );
        }

        report.output_rows = observations.len();

        if observations.is_empty() {
            return Err(ProcessingError::EmptyResult {
                input_rows: report.input_rows,
            });
        }

        info!(
            "Cleaned {} raw rows into {} observations ({} removed)",
            report.input_rows,
            report.output_rows,
            report.removed_rows()
        );

        Ok(CleaningOutput {
            observations,
            report,
        })
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

/// Clean a raw table with the built-in configuration
pub fn clean(table: &RawTable) -> Result<(Vec<CanonicalObservation>, CleaningReport)> {
    let output = CleaningPipeline::default().clean(table)?;
    Ok((output.observations, output.report))
}

/// Stage 1: drop rows identical to an earlier row
pub fn remove_duplicates(rows: &[RawObservation]) -> (Vec<&RawObservation>, usize) {
    let mut seen = HashSet::with_capacity(rows.len());
    let unique: Vec<&RawObservation> = rows.iter().filter(|row| seen.insert(*row)).collect();
    let dropped = rows.len() - unique.len();
    (unique, dropped)
}

/// Stage 2: name the five columns by position
pub fn normalize_schema<'a>(rows: &[&'a RawObservation]) -> Vec<NamedRow<'a>> {
    rows.iter()
        .map(|row| NamedRow {
            date: &row[COL_DATE],
            values: FieldValues {
                tmax: &row[COL_TMAX],
                tmin: &row[COL_TMIN],
                humidity: &row[COL_HUMIDITY],
                precipitation: &row[COL_PRECIPITATION],
            },
        })
        .collect()
}

/// Stage 3: parse every cell; unparseable cells become missing
pub fn parse_values(parser: &CellParser, rows: &[NamedRow<'_>]) -> Vec<ParsedRow> {
    rows.iter()
        .map(|row| ParsedRow {
            date: parser.parse_date(row.date),
            values: row.values.map(|_, cell| parser.parse_numeric(cell)),
        })
        .collect()
}

/// Stage 4: drop rows that cannot be placed on the timeline
pub fn filter_missing_dates(rows: &[ParsedRow]) -> (Vec<DatedRow>, usize) {
    let dated: Vec<DatedRow> = rows
        .iter()
        .filter_map(|row| {
            row.date.map(|date| DatedRow {
                date,
                values: row.values,
            })
        })
        .collect();
    let dropped = rows.len() - dated.len();
    (dated, dropped)
}

/// Stage 5: fill missing values column by column, in input order
pub fn impute_missing(rows: &[DatedRow]) -> (Vec<ImputedRow>, FieldImputations) {
    let mut imputations = FieldImputations::default();
    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(ObservationField::ALL.len());

    for field in ObservationField::ALL {
        let raw: Vec<Option<f64>> = rows.iter().map(|r| r.values.get(field).value()).collect();
        let trace = rows.iter().filter(|r| r.values.get(field).is_trace()).count();

        let column = impute_column(&raw, ImputationStrategy::for_field(field));
        if column.values.iter().any(Option::is_none) {
            warn!(
                "Column {} has no known values; its rows cannot be repaired",
                field
            );
        }

        let counts = imputations.get_mut(field);
        *counts = column.counts;
        counts.trace = trace;

        columns.push(column.values);
    }

    let imputed = rows
        .iter()
        .enumerate()
        .map(|(i, row)| ImputedRow {
            date: row.date,
            values: FieldValues {
                tmax: columns[0][i],
                tmin: columns[1][i],
                humidity: columns[2][i],
                precipitation: columns[3][i],
            },
        })
        .collect();

    (imputed, imputations)
}

/// Stage 6: drop whole rows with an impossible reading.
///
/// Checks run temperature, humidity, precipitation; a row is counted under the
/// first check it fails. Values still missing fail their check.
pub fn reject_out_of_range(
    config: &CleaningConfig,
    rows: &[ImputedRow],
) -> (Vec<CanonicalObservation>, DropCounts) {
    let mut drops = DropCounts::default();
    let mut kept = Vec::with_capacity(rows.len());

    for row in rows {
        let (Some(tmax), Some(tmin)) = (row.values.tmax, row.values.tmin) else {
            drops.temperature_out_of_range += 1;
            continue;
        };
        if !config.temperature_range.contains(tmax) || !config.temperature_range.contains(tmin) {
            drops.temperature_out_of_range += 1;
            continue;
        }

        let Some(humidity) = row.values.humidity.filter(|h| config.humidity_range.contains(*h))
        else {
            drops.humidity_out_of_range += 1;
            continue;
        };

        let Some(precipitation) = row
            .values
            .precipitation
            .filter(|p| config.precipitation_is_valid(*p))
        else {
            drops.negative_precipitation += 1;
            continue;
        };

        kept.push(CanonicalObservation::new(
            0,
            row.date,
            tmax,
            tmin,
            humidity,
            precipitation,
        ));
    }

    (kept, drops)
}

/// Stage 7: sort by date, keep the first row per date, re-index densely
pub fn order_by_date(mut rows: Vec<CanonicalObservation>) -> (Vec<CanonicalObservation>, usize) {
    rows.sort_by_key(|r| r.date);

    let before = rows.len();
    rows.dedup_by_key(|r| r.date);
    let conflicting = before - rows.len();

    for (index, row) in rows.iter_mut().enumerate() {
        row.index = index;
    }

    (rows, conflicting)
}
