use arrow::array::{
    Array, ArrayRef, Date32Array, Float64Array, PrimitiveArray, StringArray, UInt32Array,
};
use arrow::datatypes::ArrowPrimitiveType;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, SimulationError};
use crate::models::{DailySummary, WeatherCondition};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};

/// 1970-01-01 counted from 0001-01-01; Arrow's Date32 counts from the former
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

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
                return Err(SimulationError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Rows per row group; 0 is treated as 1
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write summary rows to a Parquet file; an empty slice writes nothing
    pub fn write_summaries(&self, summaries: &[DailySummary], path: &Path) -> Result<()> {
        if summaries.is_empty() {
            return Ok(());
        }

        let schema = Self::create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in summaries.chunks(self.row_group_size) {
            writer.write(&Self::summaries_to_batch(chunk, schema.clone())?)?;
        }
        writer.close()?;

        Ok(())
    }

    fn create_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("city", DataType::Utf8, false),
            Field::new("date", DataType::Date32, false),
            Field::new("avg_temp", DataType::Float64, false),
            Field::new("max_temp", DataType::Float64, false),
            Field::new("min_temp", DataType::Float64, false),
            Field::new("avg_humidity", DataType::Float64, true),
            Field::new("max_wind_speed", DataType::Float64, true),
            Field::new("dominant_condition", DataType::Utf8, false),
            Field::new("sample_count", DataType::UInt32, true),
        ]))
    }

    fn summaries_to_batch(summaries: &[DailySummary], schema: Arc<Schema>) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                summaries.iter().map(|s| s.city.as_str()),
            )) as ArrayRef,
            Arc::new(Date32Array::from_iter_values(
                summaries
                    .iter()
                    .map(|s| s.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
            )),
            Arc::new(Float64Array::from_iter_values(summaries.iter().map(|s| s.avg_temp))),
            Arc::new(Float64Array::from_iter_values(summaries.iter().map(|s| s.max_temp))),
            Arc::new(Float64Array::from_iter_values(summaries.iter().map(|s| s.min_temp))),
            Arc::new(Float64Array::from(
                summaries.iter().map(|s| s.avg_humidity).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                summaries.iter().map(|s| s.max_wind_speed).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from_iter_values(
                summaries.iter().map(|s| s.dominant_condition.as_str()),
            )),
            Arc::new(UInt32Array::from(
                summaries.iter().map(|s| s.sample_count).collect::<Vec<_>>(),
            )),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Read every summary row back from a file written by [`Self::write_summaries`]
    pub fn read_summaries(&self, path: &Path) -> Result<Vec<DailySummary>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut summaries = Vec::new();
        for batch in reader {
            let batch = batch?;

            let cities = column::<StringArray>(&batch, "city")?;
            let dates = column::<Date32Array>(&batch, "date")?;
            let avg_temps = column::<Float64Array>(&batch, "avg_temp")?;
            let max_temps = column::<Float64Array>(&batch, "max_temp")?;
            let min_temps = column::<Float64Array>(&batch, "min_temp")?;
            let humidity = column::<Float64Array>(&batch, "avg_humidity")?;
            let wind = column::<Float64Array>(&batch, "max_wind_speed")?;
            let conditions = column::<StringArray>(&batch, "dominant_condition")?;
            let counts = column::<UInt32Array>(&batch, "sample_count")?;

            for i in 0..batch.num_rows() {
                let date =
                    NaiveDate::from_num_days_from_ce_opt(dates.value(i) + UNIX_EPOCH_DAYS_FROM_CE)
                        .ok_or_else(|| {
                            SimulationError::InvalidFormat("Invalid date in Parquet file".to_string())
                        })?;
                let condition = conditions.value(i);
                let dominant_condition = WeatherCondition::parse(condition)
                    .ok_or_else(|| SimulationError::UnknownCondition(condition.to_string()))?;

                summaries.push(DailySummary {
                    city: cities.value(i).to_string(),
                    date,
                    avg_temp: avg_temps.value(i),
                    max_temp: max_temps.value(i),
                    min_temp: min_temps.value(i),
                    avg_humidity: optional(humidity, i),
                    max_wind_speed: optional(wind, i),
                    dominant_condition,
                    sample_count: optional(counts, i),
                });
            }
        }

        Ok(summaries)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let reader = SerializedFileReader::new(File::open(path)?)?;
        let metadata = reader.metadata();

        let row_group_sizes: Vec<i64> = (0..metadata.num_row_groups())
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: row_group_sizes.len(),
            row_group_sizes,
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| SimulationError::InvalidFormat(format!("Invalid {} column", name)))
}

fn optional<T: ArrowPrimitiveType>(array: &PrimitiveArray<T>, i: usize) -> Option<T::Native> {
    if array.is_null(i) {
        None
    } else {
        Some(array.value(i))
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.1} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}
