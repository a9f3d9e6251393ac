//! Tenure arithmetic and filtering
//!
//! Tenure is the difference between the current calendar year and the
//! start-date year. Month and day are ignored: someone who started in
//! December 2020 has a tenure of 1 on 1 January 2021.

use crate::error::{CoreError, Result};
use crate::schema::START_DATE;
use arrow::array::{Array, AsArray, BooleanArray, RecordBatch};
use arrow::compute::filter_record_batch;
use arrow::compute::kernels::temporal::{date_part, DatePart};
use arrow::datatypes::{DataType, Int32Type};
use chrono::{Datelike, NaiveDate};

/// Whole-year tenure for a start date as of `today`.
pub fn tenure_in_years(start_date: NaiveDate, today: NaiveDate) -> i64 {
    years_between(start_date.year(), today.year())
}

/// Year-only difference shared by the scalar and columnar paths
fn years_between(start_year: i32, current_year: i32) -> i64 {
    i64::from(current_year) - i64::from(start_year)
}

/// Keep only the rows whose tenure as of `today` equals `tenure_years`.
///
/// All columns are carried through untouched and row order is preserved.
/// Rows with a null `start_date` never match.
pub fn filter_by_tenure(
    batch: &RecordBatch,
    tenure_years: i64,
    today: NaiveDate,
) -> Result<RecordBatch> {
    let mask = tenure_mask(batch, tenure_years, today)?;
    let filtered = filter_record_batch(batch, &mask)?;

    tracing::debug!(
        input_rows = batch.num_rows(),
        matched_rows = filtered.num_rows(),
        tenure_years,
        "Filtered dataset by tenure"
    );

    Ok(filtered)
}

fn tenure_mask(batch: &RecordBatch, tenure_years: i64, today: NaiveDate) -> Result<BooleanArray> {
    let column = batch
        .column_by_name(START_DATE)
        .ok_or_else(|| CoreError::MissingColumn(START_DATE.to_string()))?;

    match column.data_type() {
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {}
        other => {
            return Err(CoreError::UnsupportedColumnType {
                column: START_DATE.to_string(),
                data_type: other.clone(),
            })
        }
    }

    let years = date_part(column.as_ref(), DatePart::Year)?;
    let years = years.as_primitive::<Int32Type>();
    let current_year = today.year();

    let mask = years
        .iter()
        .map(|year| {
            Some(matches!(year, Some(y) if years_between(y, current_year) == tenure_years))
        })
        .collect::<BooleanArray>();

    debug_assert_eq!(mask.len(), batch.num_rows());
    Ok(mask)
}
