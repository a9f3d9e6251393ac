//! CSV export of filtered results

use crate::error::Result;
use arrow::array::RecordBatch;
use arrow::csv::WriterBuilder;

/// Render a record batch as CSV with a header row.
///
/// Dates use ISO-8601 (`YYYY-MM-DD`). An empty batch produces just the header.
pub fn encode_csv(batch: &RecordBatch) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
    writer.write(batch)?;
    Ok(writer.into_inner())
}
