// anniversary-core - Employee dataset model and tenure filtering
//
// Pure data logic: no async, no I/O. Storage adapters live in
// anniversary-writer and request orchestration in anniversary-handlers.

pub mod columnar;
pub mod csv;
pub mod error;
pub mod generator;
pub mod record;
pub mod schema;
pub mod tenure;

pub use self::csv::encode_csv;
pub use columnar::{decode_parquet, encode_parquet, writer_properties};
pub use error::{CoreError, Result};
pub use generator::{generate_records, MAX_ROWS};
pub use record::{records_to_batch, Department, EmployeeRecord, Role};
pub use schema::employee_schema;
pub use tenure::{filter_by_tenure, tenure_in_years};
