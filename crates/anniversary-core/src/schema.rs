//! Arrow schema for the employee dataset

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::{Arc, OnceLock};

pub const NAME: &str = "name";
pub const START_DATE: &str = "start_date";
pub const DEPARTMENT: &str = "department";
pub const ROLE: &str = "role";

/// Schema written by the fixture generator.
///
/// `start_date` is a Date32 so readers get typed dates back without
/// re-parsing strings.
pub fn employee_schema() -> SchemaRef {
    static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Arc::new(Schema::new(vec![
                Field::new(NAME, DataType::Utf8, false),
                Field::new(START_DATE, DataType::Date32, false),
                Field::new(DEPARTMENT, DataType::Utf8, false),
                Field::new(ROLE, DataType::Utf8, false),
            ]))
        })
        .clone()
}
