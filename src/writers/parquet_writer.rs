use crate::error::{ProcessingError, Result};
use crate::models::CanonicalObservation;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the cleaned table to a Parquet file
    pub fn write_records(&self, records: &[CanonicalObservation], path: &Path) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let schema = create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in records.chunks(self.row_group_size.max(1)) {
            let batch = records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }

    /// Read up to `limit` observations back from a Parquet file
    pub fn read_sample_records(
        &self,
        path: &Path,
        limit: usize,
    ) -> Result<Vec<CanonicalObservation>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let mut records = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let dates = column::<Date32Array>(&batch, 0, "date")?;
            let tmax = column::<Float64Array>(&batch, 1, "tmax")?;
            let tmin = column::<Float64Array>(&batch, 2, "tmin")?;
            let humidity = column::<Float64Array>(&batch, 3, "humidity")?;
            let precipitation = column::<Float64Array>(&batch, 4, "precipitation")?;

            for i in 0..batch.num_rows() {
                if records.len() >= limit {
                    return Ok(records);
                }

                records.push(CanonicalObservation::new(
                    records.len(),
                    date32_to_date(dates.value(i))?,
                    tmax.value(i),
                    tmin.value(i),
                    humidity.value(i),
                    precipitation.value(i),
                ));
            }
        }

        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            self.compression
        };

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn create_schema() -> Arc<Schema> {
    let fields = vec![
        Field::new("date", DataType::Date32, false),
        Field::new("tmax", DataType::Float64, false),
        Field::new("tmin", DataType::Float64, false),
        Field::new("humidity", DataType::Float64, false),
        Field::new("precipitation", DataType::Float64, false),
    ];

    Arc::new(Schema::new(fields))
}

fn records_to_batch(records: &[CanonicalObservation], schema: Arc<Schema>) -> Result<RecordBatch> {
    let dates: Vec<i32> = records.iter().map(|r| date_to_date32(r.date)).collect();
    let tmax: Vec<f64> = records.iter().map(|r| r.tmax).collect();
    let tmin: Vec<f64> = records.iter().map(|r| r.tmin).collect();
    let humidity: Vec<f64> = records.iter().map(|r| r.humidity).collect();
    let precipitation: Vec<f64> = records.iter().map(|r| r.precipitation).collect();

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Date32Array::from(dates)),
            Arc::new(Float64Array::from(tmax)),
            Arc::new(Float64Array::from(tmin)),
            Arc::new(Float64Array::from(humidity)),
            Arc::new(Float64Array::from(precipitation)),
        ],
    )?;

    Ok(batch)
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
    batch
        .columns()
        .get(index)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid {} column type", name)))
}

/// Date32 counts days since the Unix epoch
fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn date_to_date32(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

fn date32_to_date(days: i32) -> Result<NaiveDate> {
    unix_epoch()
        .checked_add_signed(Duration::days(days as i64))
        .ok_or_else(|| ProcessingError::InvalidFormat("Invalid date in Parquet file".to_string()))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
            avg_rows
        )
    }
}
