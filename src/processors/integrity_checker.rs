use crate::config::CleaningConfig;
use crate::models::{CanonicalObservation, ObservationField};

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub violations: Vec<IntegrityViolation>,
    pub temperature_inversions: Vec<chrono::NaiveDate>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct IntegrityViolation {
    pub index: usize,
    pub date: chrono::NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationType {
    OutOfRange(ObservationField),
    NonFinite(ObservationField),
    DuplicateDate,
    OutOfOrder,
    IndexGap,
}

/// Verifies the invariants of a canonical observation table
pub struct IntegrityChecker {
    config: CleaningConfig,
}

impl IntegrityChecker {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Check integrity of canonical observations
    pub fn check(&self, observations: &[CanonicalObservation]) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: observations.len(),
            ..Default::default()
        };

        for (position, observation) in observations.iter().enumerate() {
            let before = report.violations.len();

            self.check_values(observation, &mut report);

            if observation.index != position {
                report.violations.push(IntegrityViolation {
                    index: observation.index,
                    date: observation.date,
                    violation_type: ViolationType::IndexGap,
                    details: format!(
                        "row at position {} carries index {}",
                        position, observation.index
                    ),
                });
            }

            if observation.has_temperature_inversion() {
                report.temperature_inversions.push(observation.date);
            }

            if report.violations.len() == before {
                report.valid_records += 1;
            }
        }

        self.check_time_series(observations, &mut report);

        report
    }

    /// Check every field is finite and inside its valid range
    fn check_values(&self, observation: &CanonicalObservation, report: &mut IntegrityReport) {
        for field in ObservationField::ALL {
            let value = observation.value(field);

            if !value.is_finite() {
                report.violations.push(IntegrityViolation {
                    index: observation.index,
                    date: observation.date,
                    violation_type: ViolationType::NonFinite(field),
                    details: format!("{} is {}", field, value),
                });
                continue;
            }

            let in_range = match field {
                ObservationField::Tmax | ObservationField::Tmin => {
                    self.config.temperature_range.contains(value)
                }
                ObservationField::Humidity => self.config.humidity_range.contains(value),
                ObservationField::Precipitation => self.config.precipitation_is_valid(value),
            };

            if !in_range {
                report.violations.push(IntegrityViolation {
                    index: observation.index,
                    date: observation.date,
                    violation_type: ViolationType::OutOfRange(field),
                    details: format!("{} {} {} is outside its valid range", field, value, field.units()),
                });
            }
        }
    }

    /// Dates must be unique and strictly ascending
    fn check_time_series(
        &self,
        observations: &[CanonicalObservation],
        report: &mut IntegrityReport,
    ) {
        for window in observations.windows(2) {
            let prev = &window[0];
            let curr = &window[1];

            let violation_type = if curr.date == prev.date {
                ViolationType::DuplicateDate
            } else if curr.date < prev.date {
                ViolationType::OutOfOrder
            } else {
                continue;
            };

            report.violations.push(IntegrityViolation {
                index: curr.index,
                date: curr.date,
                violation_type,
                details: format!("{} follows {}", curr.date, prev.date),
            });
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        let valid_pct = if report.total_records == 0 {
            0.0
        } else {
            100.0 * report.valid_records as f64 / report.total_records as f64
        };
        summary.push_str(&format!(
            "Valid Records: {} ({:.1}%)\n",
            report.valid_records, valid_pct
        ));
        summary.push_str(&format!(
            "Temperature Inversions (tmin > tmax): {}\n",
            report.temperature_inversions.len()
        ));
        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. Row {} on {}: {}\n",
                    i + 1,
                    violation.index,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}
