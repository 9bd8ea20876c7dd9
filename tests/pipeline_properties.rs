use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use station_cleaner::config::CleaningConfig;
use station_cleaner::error::{ProcessingError, Result};
use station_cleaner::models::{CanonicalObservation, RawCell, RawTable};
use station_cleaner::processors::{
    clean, CellParser, CleaningPipeline, IntegrityChecker, ParsedValue,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(cells: [&str; 5]) -> Vec<RawCell> {
    cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                RawCell::Empty
            } else {
                RawCell::text(*c)
            }
        })
        .collect()
}

fn table(rows: Vec<Vec<RawCell>>) -> RawTable {
    let headers = ["FECHA", "TMAX", "TMIN", "HUMEDAD", "PRECIPITACION"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    RawTable::new(headers, rows).unwrap()
}

/// A messy month: sentinels, gaps, a duplicate, an undated row, an outlier
fn messy_table() -> RawTable {
    table(vec![
        row(["2024-01-03", "S/D", "18.0", "72", "T"]),
        row(["2024-01-01", "30.5", "18.2", "S/D", " t "]),
        row(["2024-01-02", "31.0", "-", "70", "0"]),
        row(["2024-01-02", "31.0", "-", "70", "0"]),
        row(["sin fecha", "29.0", "17.0", "65", "0"]),
        row(["04/01/2024", "33.5", "19.5", "", "12.4"]),
        row(["2024-01-05", "95", "19.0", "71", "0"]),
        row(["2024-01-06", "32.0", "SIN DATOS", "75", ""]),
        row(["2024-01-07", "30.0", "18.0", "7,4", "2.0"]),
    ])
}

#[test]
fn reference_scenario() -> Result<()> {
    let t = table(vec![
        row(["2024-01-01", "30.5", "18.2", "S/D", "T"]),
        row(["2024-01-02", "31.0", "19.0", "70", "0"]),
    ]);

    let (observations, report) = clean(&t)?;

    assert_eq!(
        observations,
        vec![
            CanonicalObservation::new(0, date(2024, 1, 1), 30.5, 18.2, 70.0, 0.1),
            CanonicalObservation::new(1, date(2024, 1, 2), 31.0, 19.0, 70.0, 0.0),
        ]
    );
    assert_eq!(report.imputed.humidity.mean_filled, 1);
    assert_eq!(report.imputed.humidity.interpolated, 0);
    assert_eq!(report.imputed.precipitation.trace, 1);
    assert_eq!(report.dropped.total(), 0);
    Ok(())
}

#[test]
fn out_of_range_temperature_is_dropped_and_counted() -> Result<()> {
    let t = table(vec![
        row(["2024-01-01", "30.0", "18.0", "70", "0"]),
        row(["2024-01-02", "95", "18.0", "70", "0"]),
    ]);

    let (observations, report) = clean(&t)?;

    assert_eq!(observations.len(), 1);
    assert!(observations.iter().all(|o| o.tmax != 95.0));
    assert_eq!(report.dropped.temperature_out_of_range, 1);
    Ok(())
}

#[test]
fn cleaning_is_idempotent() -> Result<()> {
    let pipeline = CleaningPipeline::default();
    let first = pipeline.clean(&messy_table())?;

    let again = pipeline.clean(&RawTable::from_canonical(&first.observations)?)?;

    assert_eq!(again.observations, first.observations);
    assert!(again.report.is_clean(), "{}", again.report.summary());
    Ok(())
}

#[test]
fn cleaning_is_deterministic() -> Result<()> {
    let pipeline = CleaningPipeline::default();
    let a = pipeline.clean(&messy_table())?;
    let b = pipeline.clean(&messy_table())?;

    assert_eq!(a.observations, b.observations);
    assert_eq!(a.report, b.report);
    Ok(())
}

#[test]
fn output_satisfies_canonical_invariants() -> Result<()> {
    let output = CleaningPipeline::default().clean(&messy_table())?;

    let integrity = IntegrityChecker::new(CleaningConfig::default()).check(&output.observations);
    assert!(integrity.is_valid(), "{:?}", integrity.violations);

    for pair in output.observations.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
    for (i, o) in output.observations.iter().enumerate() {
        assert_eq!(o.index, i);
        assert!((-20.0..=50.0).contains(&o.tmax));
        assert!((-20.0..=50.0).contains(&o.tmin));
        assert!((0.0..=100.0).contains(&o.humidity));
        assert!(o.precipitation >= 0.0);
    }
    Ok(())
}

#[test]
fn messy_table_report() -> Result<()> {
    let output = CleaningPipeline::default().clean(&messy_table())?;
    let report = &output.report;

    assert_eq!(report.input_rows, 9);
    assert_eq!(report.dropped.duplicates, 1);
    assert_eq!(report.dropped.missing_date, 1);
    assert_eq!(report.dropped.temperature_out_of_range, 1);
    assert_eq!(report.output_rows, 6);
    assert_eq!(report.removed_rows(), 3);

    let dates: Vec<NaiveDate> = output.observations.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 1, 4),
            date(2024, 1, 6),
            date(2024, 1, 7),
        ]
    );

    // Day-first date on the 4th
    assert_eq!(output.observations[3].tmax, 33.5);
    // "7,4" is not a number: filled with the column mean, never read as 7.4
    assert_eq!(report.imputed.humidity.mean_filled, 1);
    assert_eq!(report.imputed.humidity.interpolated, 2);
    assert!((output.observations[5].humidity - 429.5 / 6.0).abs() < 1e-9);
    // Both trace readings
    assert_eq!(report.imputed.precipitation.trace, 2);
    assert_eq!(output.observations[0].precipitation, 0.1);
    Ok(())
}

#[test]
fn sentinel_cells_parse_as_documented() {
    let parser = CellParser::new(&CleaningConfig::default());

    for trace in ["T", "t", "  T ", "\tt\n"] {
        assert_eq!(parser.parse_numeric(&RawCell::text(trace)), ParsedValue::Trace(0.1));
    }
    for missing in ["S/D", "s/d", " - ", "SIN DATOS"] {
        assert_eq!(parser.parse_numeric(&RawCell::text(missing)), ParsedValue::Missing);
    }
    assert_eq!(parser.parse_numeric(&RawCell::Empty), ParsedValue::Missing);
}

#[test]
fn duplicate_rows_collapse_to_one() -> Result<()> {
    let t = table(vec![
        row(["2024-02-01", "28.0", "16.0", "60", "1.5"]),
        row(["2024-02-01", "28.0", "16.0", "60", "1.5"]),
    ]);

    let (observations, report) = clean(&t)?;

    assert_eq!(observations.len(), 1);
    assert_eq!(report.dropped.duplicates, 1);
    assert_eq!(report.dropped.conflicting_dates, 0);
    Ok(())
}

#[test]
fn undated_rows_never_survive() -> Result<()> {
    let t = table(vec![
        row(["2024-02-01", "28.0", "16.0", "60", "1.5"]),
        row(["", "28.0", "16.0", "60", "1.5"]),
        row(["32/13/2024", "27.0", "15.0", "61", "0"]),
    ]);

    let (observations, report) = clean(&t)?;

    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].date, date(2024, 2, 1));
    assert_eq!(report.dropped.missing_date, 2);
    Ok(())
}

#[test]
fn nothing_surviving_is_an_error() {
    let t = table(vec![row(["fecha", "x", "y", "z", "w"])]);

    match clean(&t) {
        Err(ProcessingError::EmptyResult { input_rows }) => assert_eq!(input_rows, 1),
        other => panic!("expected EmptyResult, got {:?}", other.map(|(o, _)| o.len())),
    }
}
