use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::analyzers::AnnualSummary;
use crate::error::Result;
use crate::models::CanonicalObservation;
use crate::utils::constants::CANONICAL_COLUMNS;

/// Writes the cleaned table and the annual summary as comma-separated text
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn write_observations(&self, records: &[CanonicalObservation], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_observations_to(records, file)?;
        debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }

    /// Header `date,tmax,tmin,humidity,precipitation`, ISO dates
    pub fn write_observations_to<W: Write>(
        &self,
        records: &[CanonicalObservation],
        out: W,
    ) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(out);

        writer.write_record(CANONICAL_COLUMNS)?;
        for record in records {
            writer.write_record([
                record.date.format("%Y-%m-%d").to_string(),
                record.tmax.to_string(),
                record.tmin.to_string(),
                record.humidity.to_string(),
                record.precipitation.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_annual_summary(&self, rows: &[AnnualSummary], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_annual_summary_to(rows, file)?;
        debug!("Wrote {} annual rows to {}", rows.len(), path.display());
        Ok(())
    }

    pub fn write_annual_summary_to<W: Write>(&self, rows: &[AnnualSummary], out: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(out);

        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
