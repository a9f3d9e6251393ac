//! Payload validation for the tenure filter

use crate::error::HandlerError;
use anniversary_writer::{validate_bucket_name, Location, StorageError};
use serde_json::{Map, Value};

pub const TENURE_YEARS: &str = "tenure_years";
pub const SOURCE_BUCKET: &str = "source_bucket";
pub const SOURCE_KEY: &str = "source_key";
pub const DESTINATION_PATH: &str = "destination_path";

/// Returned verbatim whenever `tenure_years` is not an integer
pub const INVALID_TENURE_MESSAGE: &str = "tenure_years must be a valid whole number of years";

/// A validated filter request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenureRequest {
    pub tenure_years: i64,
    pub source: Location,
    /// Destination as the caller wrote it; echoed back in the response
    pub destination_path: String,
    pub destination: Location,
}

impl TenureRequest {
    /// Validate a raw payload. `tenure_years` is checked first, then the
    /// remaining fields in declaration order.
    pub fn from_payload(payload: &Value) -> Result<Self, HandlerError> {
        let fields = payload
            .as_object()
            .ok_or_else(|| HandlerError::invalid_argument("payload must be a JSON object"))?;

        let tenure_years = parse_tenure(required(fields, TENURE_YEARS)?)?;
        let source_bucket = required_string(fields, SOURCE_BUCKET)?;
        let source_key = required_string(fields, SOURCE_KEY)?;
        let destination_path = required_string(fields, DESTINATION_PATH)?;

        validate_bucket_name(source_bucket).map_err(|e| invalid_field(SOURCE_BUCKET, e))?;
        let source = Location::try_new(source_bucket, source_key)
            .map_err(|e| invalid_field(SOURCE_KEY, e))?;
        let destination =
            Location::parse(destination_path).map_err(|e| invalid_field(DESTINATION_PATH, e))?;

        Ok(Self {
            tenure_years,
            source,
            destination_path: destination_path.to_string(),
            destination,
        })
    }
}

fn invalid_field(field: &str, err: StorageError) -> HandlerError {
    HandlerError::invalid_argument(format!("{} is invalid: {}", field, err))
}

/// Absent and explicit `null` are both "missing"
fn required<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a Value, HandlerError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(HandlerError::missing_field(field)),
        Some(value) => Ok(value),
    }
}

fn required_string<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a str, HandlerError> {
    let value = required(fields, field)?
        .as_str()
        .ok_or_else(|| HandlerError::invalid_argument(format!("{} must be a string", field)))?;

    if value.trim().is_empty() {
        return Err(HandlerError::invalid_argument(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(value)
}

/// Accepts JSON integers, integral floats and integer strings
fn parse_tenure(value: &Value) -> Result<i64, HandlerError> {
    let invalid = || HandlerError::invalid_argument(INVALID_TENURE_MESSAGE);

    match value {
        Value::Number(number) => {
            if let Some(years) = number.as_i64() {
                return Ok(years);
            }
            match number.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(invalid()),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
