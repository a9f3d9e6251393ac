//! Request handling for anniversary
//!
//! Shared by the CLI and the Lambda runtime: payload validation, the
//! tenure filter pipeline, fixture generation and the error taxonomy that
//! turns every failure into an envelope.

pub mod error;
pub mod fixtures;
pub mod processor;
pub mod request;
pub mod response;

pub use error::HandlerError;
pub use fixtures::{generate_fixtures, FixtureRequest, FixtureSummary};
pub use processor::{
    handle_tenure_request, handle_tenure_request_on, process_tenure_request, ProcessingResult,
};
pub use request::{TenureRequest, INVALID_TENURE_MESSAGE};
pub use response::TenureResponse;
