use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Errors raised while building, encoding or filtering employee datasets
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Row number too large: requested {requested}, maximum is {max}")]
    TooManyRows { requested: usize, max: usize },

    #[error("Invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Column '{column}' has type {data_type}, expected a date or timestamp")]
    UnsupportedColumnType { column: String, data_type: DataType },

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
