use crate::analyzers::station_analyzer::{AnnualSummary, StationAnalyzer};
use crate::models::{CanonicalObservation, CleaningReport, ObservationField};

/// Artifact written alongside the summary
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub description: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Human-readable overview of a cleaning run and the cleaned data
pub struct ExecutiveSummary<'a> {
    observations: &'a [CanonicalObservation],
    report: &'a CleaningReport,
    annual: &'a [AnnualSummary],
    artifacts: Vec<Artifact>,
}

impl<'a> ExecutiveSummary<'a> {
    pub fn new(
        observations: &'a [CanonicalObservation],
        report: &'a CleaningReport,
        annual: &'a [AnnualSummary],
    ) -> Self {
        Self {
            observations,
            report,
            annual,
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn render(&self) -> String {
        let rule = "-".repeat(80);
        let mut out = String::new();

        out.push_str(&"=".repeat(80));
        out.push_str("\n                 EXECUTIVE SUMMARY - STATION ANALYSIS\n");
        out.push_str(&"=".repeat(80));
        out.push('\n');

        out.push_str("\nDATA CLEANING STATISTICS\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "Original records:       {}\n",
            self.report.input_rows
        ));
        out.push_str(&format!(
            "Records after cleaning: {}\n",
            self.report.output_rows
        ));
        out.push_str(&format!(
            "Records removed:        {} ({:.1}%)\n",
            self.report.removed_rows(),
            self.report.removed_percentage()
        ));

        let statistics = StationAnalyzer::new().overall(self.observations).ok();
        if let Some(statistics) = &statistics {
            out.push_str(&format!(
                "Data period:            {} to {}\n",
                statistics.date_range.0.format("%d-%m-%Y"),
                statistics.date_range.1.format("%d-%m-%Y")
            ));
        }

        out.push_str("\nSTATISTICS BY VARIABLE\n");
        out.push_str(&rule);
        let fields = statistics.map(|s| s.fields).unwrap_or_default();
        for (field, stats) in &fields {
            let units = field.units();
            out.push_str(&format!("\n{} ({}):\n", field.display_name(), units));
            out.push_str(&format!("  - Minimum:   {:.2} {}\n", stats.min, units));
            out.push_str(&format!("  - Maximum:   {:.2} {}\n", stats.max, units));
            out.push_str(&format!("  - Mean:      {:.2} {}\n", stats.mean, units));
            match stats.std_dev {
                Some(std_dev) => {
                    out.push_str(&format!("  - Std. Dev.: {:.2} {}\n", std_dev, units))
                }
                None => out.push_str("  - Std. Dev.: n/a\n"),
            }
        }

        out.push_str("\nANNUAL ANALYSIS\n");
        out.push_str(&rule);
        out.push('\n');
        for year in self.annual {
            out.push_str(&format!("\nYEAR {}:\n", year.year));
            out.push_str(&format!("  - Records:       {}\n", year.days));
            out.push_str(&format!(
                "  - Tmax (°C):     Min: {:.1} | Mean: {:.1} | Max: {:.1}\n",
                year.tmax_min, year.tmax_mean, year.tmax_max
            ));
            out.push_str(&format!(
                "  - Tmin (°C):     Min: {:.1} | Mean: {:.1} | Max: {:.1}\n",
                year.tmin_min, year.tmin_mean, year.tmin_max
            ));
            out.push_str(&format!("  - Humidity (%):  {:.1}\n", year.humidity_mean));
            out.push_str(&format!(
                "  - Precipitation: {:.1} mm\n",
                year.precipitation_sum
            ));
        }

        if !self.artifacts.is_empty() {
            out.push_str("\nGENERATED FILES\n");
            out.push_str(&rule);
            out.push('\n');
            for artifact in &self.artifacts {
                out.push_str(&format!(
                    "  {:.<50} {}\n",
                    artifact.name, artifact.description
                ));
            }
        }

        out.push_str("\nPROBLEMS IDENTIFIED AND CORRECTED\n");
        out.push_str(&rule);
        out.push('\n');
        let problems = self.problems();
        if problems.is_empty() {
            out.push_str("  None: the input was already clean\n");
        }
        for (i, (problem, resolution)) in problems.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, problem));
            out.push_str(&format!("     -> {}\n", resolution));
        }

        out.push_str("\nCLEANING COMPLETED\n");
        out.push_str(&"=".repeat(80));
        out.push('\n');

        out
    }

    /// Problems found in the input, derived from the cleaning report
    pub fn problems(&self) -> Vec<(String, String)> {
        let report = self.report;
        let mut problems = Vec::new();

        let missing: Vec<String> = ObservationField::ALL
            .iter()
            .map(|f| (f, report.imputed.get(*f).missing()))
            .filter(|(_, n)| *n > 0)
            .map(|(f, n)| format!("{} {}", n, f.column_name()))
            .collect();
        if !missing.is_empty() {
            problems.push((
                "Missing values".to_string(),
                format!(
                    "{} (interpolated, mean-filled or zero-filled)",
                    missing.join(", ")
                ),
            ));
        }

        let trace: usize = ObservationField::ALL
            .iter()
            .map(|f| report.imputed.get(*f).trace)
            .sum();
        if trace > 0 {
            problems.push((
                "Special values".to_string(),
                format!("{} trace readings replaced with the trace amount", trace),
            ));
        }

        if report.dropped.missing_date > 0 {
            problems.push((
                "Missing dates".to_string(),
                format!("{} rows without a usable date removed", report.dropped.missing_date),
            ));
        }

        if report.dropped.out_of_range() > 0 {
            problems.push((
                "Outliers".to_string(),
                format!(
                    "{} temperature, {} humidity, {} negative precipitation rows removed",
                    report.dropped.temperature_out_of_range,
                    report.dropped.humidity_out_of_range,
                    report.dropped.negative_precipitation
                ),
            ));
        }

        if report.dropped.duplicates > 0 || report.dropped.conflicting_dates > 0 {
            problems.push((
                "Duplicates".to_string(),
                format!(
                    "{} duplicate rows and {} rows repeating a date removed",
                    report.dropped.duplicates, report.dropped.conflicting_dates
                ),
            ));
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observations() -> Vec<CanonicalObservation> {
        vec![
            CanonicalObservation::new(
                0,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                30.5,
                18.2,
                70.0,
                0.1,
            ),
            CanonicalObservation::new(
                1,
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                31.0,
                19.0,
                70.0,
                0.0,
            ),
        ]
    }

    #[test]
    fn test_render_sections() {
        let observations = observations();
        let annual = StationAnalyzer::new().annual(&observations);

        let mut report = CleaningReport {
            input_rows: 3,
            output_rows: 2,
            ..Default::default()
        };
        report.dropped.duplicates = 1;
        report.imputed.humidity.mean_filled = 1;
        report.imputed.precipitation.trace = 1;

        let text = ExecutiveSummary::new(&observations, &report, &annual)
            .with_artifacts(vec![Artifact::new("station-clean.csv", "Cleaned data")])
            .render();

        assert!(text.contains("Original records:       3"));
        assert!(text.contains("Records removed:        1 (33.3%)"));
        assert!(text.contains("01-01-2024 to 02-01-2024"));
        assert!(text.contains("YEAR 2024:"));
        assert!(text.contains("station-clean.csv"));
        assert!(text.contains("1 humidity"));
        assert!(text.contains("1 trace readings"));
        assert!(text.contains("1 duplicate rows"));
    }

    #[test]
    fn test_clean_input_has_no_problems() {
        let observations = observations();
        let annual = StationAnalyzer::new().annual(&observations);
        let report = CleaningReport {
            input_rows: 2,
            output_rows: 2,
            ..Default::default()
        };

        let summary = ExecutiveSummary::new(&observations, &report, &annual);
        assert!(summary.problems().is_empty());
        assert!(summary.render().contains("None: the input was already clean"));
    }

    #[test]
    fn test_render_without_observations() {
        let report = CleaningReport::default();
        let text = ExecutiveSummary::new(&[], &report, &[]).render();

        assert!(text.contains("Original records:       0"));
        assert!(!text.contains("Data period"));
    }
}
