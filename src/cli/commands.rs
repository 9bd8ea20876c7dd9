use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::{Artifact, ExecutiveSummary, StationAnalyzer};
use crate::cli::args::{Cli, Commands};
use crate::config::CleaningConfig;
use crate::error::{ProcessingError, Result};
use crate::models::RawTable;
use crate::processors::{CleaningOutput, CleaningPipeline, IntegrityChecker, IntegrityReport};
use crate::readers::{load_table, LoadOptions};
use crate::utils::filename::OutputPaths;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ChartWriter, ComparisonChart, CsvWriter, ParquetWriter};

pub async fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Clean {
            input,
            output_dir,
            config,
            sheet,
            delimiter,
            compression,
            validate_only,
        } => {
            let config = CleaningConfig::load(config.as_deref())?;
            // Fail on a bad compression name before doing any work
            let parquet_writer = ParquetWriter::new().with_compression(&compression)?;
            let options = load_options(sheet, delimiter)?;

            println!("Cleaning station data...");
            println!("Input file: {}", input.display());

            let progress = ProgressReporter::new_spinner("Loading station table...", quiet);
            let table = load(input.clone(), options).await?;

            progress.set_message(&format!("Cleaning {} rows...", table.len()));
            let pipeline = CleaningPipeline::new(config.clone());
            let CleaningOutput {
                observations,
                report,
            } = pipeline.clean(&table)?;
            progress.finish_with_message(&format!(
                "Cleaned {} observations",
                observations.len()
            ));

            println!("\n{}", report.summary());

            let checker = IntegrityChecker::new(config);
            let integrity = checker.check(&observations);
            debug!(
                "Integrity check: {} violations, {} inversions",
                integrity.violations.len(),
                integrity.temperature_inversions.len()
            );
            if let Some(notice) = integrity_notice(&checker, &integrity) {
                println!("\n{}", notice);
            }

            if validate_only {
                println!("Validation complete - no output files written");
                return Ok(());
            }

            let paths = OutputPaths::for_input(&input, output_dir.as_deref());
            if let Some(parent) = paths.cleaned_csv.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let progress = ProgressReporter::new_spinner("Writing outputs...", quiet);

            let analyzer = StationAnalyzer::new();
            let monthly = analyzer.monthly(&observations);
            let annual = analyzer.annual(&observations);

            let csv_writer = CsvWriter::new();
            csv_writer.write_observations(&observations, &paths.cleaned_csv)?;
            parquet_writer.write_records(&observations, &paths.cleaned_parquet)?;
            csv_writer.write_annual_summary(&annual, &paths.annual_summary)?;
            ChartWriter::new().write_chart(
                &ComparisonChart::from_monthly(&monthly),
                &paths.comparison_chart,
            )?;

            progress.finish_with_message("Outputs written");
            info!("Wrote {} files for {}", paths.all().len(), input.display());

            println!("\nGenerated files:");
            for path in paths.all() {
                println!("  {}", path.display());
            }

            let file_info = parquet_writer.get_file_info(&paths.cleaned_parquet)?;
            println!("\n{}", file_info.summary());

            println!("Cleaning complete!");
        }

        Commands::Validate {
            input,
            config,
            sheet,
            delimiter,
        } => {
            let config = CleaningConfig::load(config.as_deref())?;
            let options = load_options(sheet, delimiter)?;

            println!("Validating station data...");
            println!("Input file: {}", input.display());

            let progress = ProgressReporter::new_spinner("Validating data...", quiet);
            let table = load(input, options).await?;
            let output = CleaningPipeline::new(config.clone()).clean(&table)?;
            progress.finish_with_message("Validation complete");

            println!("\n{}", output.report.summary());

            let checker = IntegrityChecker::new(config);
            let integrity = checker.check(&output.observations);

            match integrity_notice(&checker, &integrity) {
                Some(notice) => println!("\n{}", notice),
                None => {
                    println!("\n{}", checker.generate_summary(&integrity));
                    println!("✅ Cleaned table passed all integrity checks");
                }
            }
        }

        Commands::Summary {
            input,
            config,
            sheet,
            delimiter,
        } => {
            let config = CleaningConfig::load(config.as_deref())?;
            let options = load_options(sheet, delimiter)?;

            let progress = ProgressReporter::new_spinner("Cleaning station data...", quiet);
            let table = load(input.clone(), options).await?;
            let output = CleaningPipeline::new(config).clean(&table)?;
            progress.finish_and_clear();

            let annual = StationAnalyzer::new().annual(&output.observations);
            let paths = OutputPaths::for_input(&input, None);
            let artifacts = vec![
                artifact(&paths.cleaned_csv, "Cleaned data (CSV)"),
                artifact(&paths.cleaned_parquet, "Cleaned data (Parquet)"),
                artifact(&paths.annual_summary, "Annual summary"),
                artifact(&paths.comparison_chart, "Monthly comparison chart data"),
            ];

            let summary = ExecutiveSummary::new(&output.observations, &output.report, &annual)
                .with_artifacts(artifacts);
            println!("{}", summary.render());
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;

            println!("\nFile Details:");
            println!("{}", file_info.summary());

            let records = writer.read_sample_records(&file, usize::MAX)?;
            if let Ok(statistics) = StationAnalyzer::new().overall(&records) {
                println!("\n{}", statistics.detailed_summary());
            }

            if sample > 0 {
                println!("\nSample Records (showing {} records):", sample.min(records.len()));
                for (i, record) in records.iter().take(sample).enumerate() {
                    println!(
                        "{}. {}: tmax={:.1}°C, tmin={:.1}°C, humidity={:.1}%, precipitation={:.1}mm",
                        i + 1,
                        record.date.format("%d-%m-%Y"),
                        record.tmax,
                        record.tmin,
                        record.humidity,
                        record.precipitation
                    );
                }
            }
        }
    }

    Ok(())
}

/// Read the input table on the blocking pool
async fn load(path: PathBuf, options: LoadOptions) -> Result<RawTable> {
    tokio::task::spawn_blocking(move || load_table(&path, &options)).await?
}

fn load_options(sheet: Option<String>, delimiter: Option<char>) -> Result<LoadOptions> {
    let delimiter = match delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => {
            return Err(ProcessingError::Config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                c
            )))
        }
        None => None,
    };

    Ok(LoadOptions { delimiter, sheet })
}

/// Integrity summary plus a warning line, only when the check failed
fn integrity_notice(checker: &IntegrityChecker, integrity: &IntegrityReport) -> Option<String> {
    if integrity.is_valid() {
        return None;
    }

    Some(format!(
        "{}\n⚠️  Found {} integrity violations",
        checker.generate_summary(integrity),
        integrity.violations.len()
    ))
}

fn artifact(path: &Path, description: &str) -> Artifact {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Artifact::new(name, description)
}
