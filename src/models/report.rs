use serde::{Deserialize, Serialize};

use crate::models::ObservationField;

/// Rows removed by the pipeline, by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCounts {
    pub duplicates: usize,
    pub missing_date: usize,
    pub temperature_out_of_range: usize,
    pub humidity_out_of_range: usize,
    pub negative_precipitation: usize,
    pub conflicting_dates: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.duplicates
            + self.missing_date
            + self.temperature_out_of_range
            + self.humidity_out_of_range
            + self.negative_precipitation
            + self.conflicting_dates
    }

    pub fn out_of_range(&self) -> usize {
        self.temperature_out_of_range + self.humidity_out_of_range + self.negative_precipitation
    }
}

/// Values substituted in one column, by strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputationCounts {
    pub trace: usize,
    pub interpolated: usize,
    pub mean_filled: usize,
    pub zero_filled: usize,
}

impl ImputationCounts {
    pub fn total(&self) -> usize {
        self.trace + self.interpolated + self.mean_filled + self.zero_filled
    }

    /// Missing values that needed a substitute (trace readings were present)
    pub fn missing(&self) -> usize {
        self.interpolated + self.mean_filled + self.zero_filled
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldImputations {
    pub tmax: ImputationCounts,
    pub tmin: ImputationCounts,
    pub humidity: ImputationCounts,
    pub precipitation: ImputationCounts,
}

impl FieldImputations {
    pub fn get(&self, field: ObservationField) -> &ImputationCounts {
        match field {
            ObservationField::Tmax => &self.tmax,
            ObservationField::Tmin => &self.tmin,
            ObservationField::Humidity => &self.humidity,
            ObservationField::Precipitation => &self.precipitation,
        }
    }

    pub fn get_mut(&mut self, field: ObservationField) -> &mut ImputationCounts {
        match field {
            ObservationField::Tmax => &mut self.tmax,
            ObservationField::Tmin => &mut self.tmin,
            ObservationField::Humidity => &mut self.humidity,
            ObservationField::Precipitation => &mut self.precipitation,
        }
    }
}

/// Audit of everything the cleaning pipeline changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped: DropCounts,
    pub imputed: FieldImputations,
}

impl CleaningReport {
    /// True when the input was already canonical
    pub fn is_clean(&self) -> bool {
        self.dropped.total() == 0
            && ObservationField::ALL
                .iter()
                .all(|f| self.imputed.get(*f).total() == 0)
    }

    pub fn removed_rows(&self) -> usize {
        self.input_rows.saturating_sub(self.output_rows)
    }

    pub fn removed_percentage(&self) -> f64 {
        if self.input_rows == 0 {
            return 0.0;
        }
        100.0 * self.removed_rows() as f64 / self.input_rows as f64
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!("Input Rows: {}\n", self.input_rows));
        summary.push_str(&format!("Output Rows: {}\n", self.output_rows));
        summary.push_str(&format!(
            "Removed Rows: {} ({:.1}%)\n",
            self.removed_rows(),
            self.removed_percentage()
        ));

        summary.push_str("\nDropped:\n");
        summary.push_str(&format!("  Exact duplicates: {}\n", self.dropped.duplicates));
        summary.push_str(&format!("  Missing date: {}\n", self.dropped.missing_date));
        summary.push_str(&format!(
            "  Temperature out of range: {}\n",
            self.dropped.temperature_out_of_range
        ));
        summary.push_str(&format!(
            "  Humidity out of range: {}\n",
            self.dropped.humidity_out_of_range
        ));
        summary.push_str(&format!(
            "  Negative precipitation: {}\n",
            self.dropped.negative_precipitation
        ));
        if self.dropped.conflicting_dates > 0 {
            summary.push_str(&format!(
                "  Conflicting dates: {}\n",
                self.dropped.conflicting_dates
            ));
        }

        summary.push_str("\nImputed Values:\n");
        for field in ObservationField::ALL {
            let counts = self.imputed.get(field);
            summary.push_str(&format!(
                "  {:<14} trace={} interpolated={} mean={} zero={}\n",
                field.column_name(),
                counts.trace,
                counts.interpolated,
                counts.mean_filled,
                counts.zero_filled
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_clean() {
        let report = CleaningReport {
            input_rows: 10,
            output_rows: 10,
            ..Default::default()
        };
        assert!(report.is_clean());
        assert_eq!(report.removed_rows(), 0);
        assert_eq!(report.removed_percentage(), 0.0);
    }

    #[test]
    fn test_counts_make_report_dirty() {
        let mut report = CleaningReport {
            input_rows: 4,
            output_rows: 3,
            ..Default::default()
        };
        report.dropped.duplicates = 1;
        assert!(!report.is_clean());
        assert_eq!(report.removed_percentage(), 25.0);

        let mut report = CleaningReport::default();
        report.imputed.get_mut(ObservationField::Precipitation).trace = 1;
        assert!(!report.is_clean());
    }

    #[test]
    fn test_summary_lists_every_field() {
        let mut report = CleaningReport {
            input_rows: 2,
            output_rows: 2,
            ..Default::default()
        };
        report.imputed.humidity.mean_filled = 1;

        let summary = report.summary();
        assert!(summary.contains("Input Rows: 2"));
        assert!(summary.contains("humidity"));
        assert!(summary.contains("mean=1"));
        assert!(!summary.contains("Conflicting dates"));
    }
}
