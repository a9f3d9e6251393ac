// Parquet encoding and decoding for employee datasets
//
// Uses Snappy block compression and dictionary encoding; department and
// role are low-cardinality so dictionaries shrink them to a few bytes per row.

use crate::error::Result;
use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;

/// Writer properties for generated datasets
pub fn writer_properties(row_group_size: usize) -> WriterProperties {
    let metadata = vec![KeyValue {
        key: "anniversary.version".to_string(),
        value: Some(env!("CARGO_PKG_VERSION").to_string()),
    }];

    WriterProperties::builder()
        .set_dictionary_enabled(true)
        .set_statistics_enabled(EnabledStatistics::Page)
        .set_compression(Compression::SNAPPY)
        .set_data_page_size_limit(256 * 1024)
        .set_write_batch_size(row_group_size.min(32 * 1024))
        .set_max_row_group_size(row_group_size)
        .set_key_value_metadata(Some(metadata))
        .build()
}

/// Encode a record batch into an in-memory Parquet file.
pub fn encode_parquet(batch: &RecordBatch, properties: WriterProperties) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(properties))?;
        writer.write(batch)?;
        writer.close()?;
    }
    Ok(buffer)
}

/// Decode a whole Parquet file into one record batch.
///
/// Every row group is read and concatenated; the dataset is expected to
/// fit in memory.
pub fn decode_parquet(bytes: Bytes) -> Result<RecordBatch> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}
