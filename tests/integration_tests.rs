use std::fs;
use std::io::Write;
use tempfile::TempDir;

use station_cleaner::analyzers::{ExecutiveSummary, StationAnalyzer};
use station_cleaner::config::CleaningConfig;
use station_cleaner::error::ProcessingError;
use station_cleaner::processors::CleaningPipeline;
use station_cleaner::readers::{load_table, LoadOptions};
use station_cleaner::utils::OutputPaths;
use station_cleaner::writers::{ChartWriter, ComparisonChart, CsvWriter, ParquetWriter};

const STATION_CSV: &str = "\
FECHA;TEMPERATURA MAXIMA (°C);TEMPERATURA MINIMA (°C);HUMEDAD RELATIVA (%);PRECIPITACIÓN (mm/día)
31/12/2023;29.0;17.5;80;0
01/01/2024;30.5;18.2;S/D;T
02/01/2024;31.0;19.0;70;0
02/01/2024;31.0;19.0;70;0
03/01/2024;95;19.0;70;0
";

#[tokio::test]
async fn test_clean_and_write_all_artifacts() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("ESTACION_LOMAS.csv");
    fs::write(&input, STATION_CSV).unwrap();

    let options = LoadOptions {
        delimiter: Some(b';'),
        sheet: None,
    };
    let path = input.clone();
    let table = tokio::task::spawn_blocking(move || load_table(&path, &options))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.len(), 5);

    let output = CleaningPipeline::new(CleaningConfig::default())
        .clean(&table)
        .unwrap();
    assert_eq!(output.observations.len(), 3);
    assert_eq!(output.report.dropped.duplicates, 1);
    assert_eq!(output.report.dropped.temperature_out_of_range, 1);

    let out_dir = temp_dir.path().join("output");
    fs::create_dir_all(&out_dir).unwrap();
    let paths = OutputPaths::for_input(&input, Some(&out_dir));

    let analyzer = StationAnalyzer::new();
    let annual = analyzer.annual(&output.observations);
    let monthly = analyzer.monthly(&output.observations);

    let parquet = ParquetWriter::new().with_compression("zstd").unwrap();
    parquet
        .write_records(&output.observations, &paths.cleaned_parquet)
        .unwrap();
    CsvWriter::new()
        .write_observations(&output.observations, &paths.cleaned_csv)
        .unwrap();
    CsvWriter::new()
        .write_annual_summary(&annual, &paths.annual_summary)
        .unwrap();
    ChartWriter::new()
        .write_chart(&ComparisonChart::from_monthly(&monthly), &paths.comparison_chart)
        .unwrap();

    for path in paths.all() {
        assert!(path.exists(), "missing {}", path.display());
    }

    let info = parquet.get_file_info(&paths.cleaned_parquet).unwrap();
    assert_eq!(info.total_rows, 3);
    let sample = parquet
        .read_sample_records(&paths.cleaned_parquet, 10)
        .unwrap();
    assert_eq!(sample, output.observations);

    let cleaned = fs::read_to_string(&paths.cleaned_csv).unwrap();
    assert!(cleaned.starts_with("date,tmax,tmin,humidity,precipitation\n2023-12-31,29,17.5,80,0\n"));
    assert!(cleaned.contains("2024-01-01,30.5,18.2,"));

    let annual_csv = fs::read_to_string(&paths.annual_summary).unwrap();
    assert_eq!(annual_csv.lines().count(), 3);

    let chart: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.comparison_chart).unwrap()).unwrap();
    assert_eq!(chart["panels"].as_array().map(|p| p.len()), Some(4));
    assert_eq!(chart["panels"][0]["series"][0]["year"], 2023);

    let summary = ExecutiveSummary::new(&output.observations, &output.report, &annual).render();
    assert!(summary.contains("31-12-2023 to 02-01-2024"));
    assert!(summary.contains("YEAR 2023:"));
    assert!(summary.contains("YEAR 2024:"));
}

#[test]
fn test_wrong_shape_is_a_load_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("station.csv");
    let mut file = fs::File::create(&input).unwrap();
    writeln!(file, "FECHA,TMAX,TMIN,HUMEDAD").unwrap();
    writeln!(file, "2024-01-01,30,18,70").unwrap();

    let err = load_table(&input, &LoadOptions::default()).unwrap_err();
    assert!(err.is_load_failure());
    assert!(matches!(err, ProcessingError::ColumnCount { expected: 5, found: 4 }));
}

#[test]
fn test_header_only_is_a_load_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("station.csv");
    fs::write(&input, "FECHA,TMAX,TMIN,HUMEDAD,PP\n").unwrap();

    let err = load_table(&input, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ProcessingError::EmptyInput));
}

#[test]
fn test_config_file_changes_ranges() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("cleaning.toml");
    fs::write(
        &config_path,
        "[temperature_range]\nmin = -20.0\nmax = 100.0\n",
    )
    .unwrap();

    let config = CleaningConfig::load(Some(&config_path)).unwrap();
    assert_eq!(config.temperature_range.max, 100.0);

    let input = temp_dir.path().join("station.csv");
    fs::write(
        &input,
        "FECHA,TMAX,TMIN,HUMEDAD,PP\n2024-01-01,95,18,70,0\n2024-01-02,30,18,70,0\n",
    )
    .unwrap();
    let table = load_table(&input, &LoadOptions::default()).unwrap();

    let output = CleaningPipeline::new(config).clean(&table).unwrap();
    assert_eq!(output.observations.len(), 2);
}
