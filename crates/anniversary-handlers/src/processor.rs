use crate::error::HandlerError;
use crate::request::TenureRequest;
use crate::response::TenureResponse;
use anniversary_core::filter_by_tenure;
use anniversary_writer::StorageClient;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

/// Result of a successful filter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub destination_path: String,
    pub rows_scanned: usize,
    pub row_count: usize,
    pub bytes_written: usize,
}

/// Validate → load → filter → write, stopping at the first failing stage.
///
/// `today` supplies the year tenure is measured against.
pub async fn process_tenure_request(
    storage: &StorageClient,
    payload: &Value,
    today: NaiveDate,
) -> Result<ProcessingResult, HandlerError> {
    let request = TenureRequest::from_payload(payload)?;
    tracing::debug!(
        tenure_years = request.tenure_years,
        source = %request.source,
        destination = %request.destination,
        "Validated tenure request"
    );

    let dataset = storage.read_dataset(&request.source).await?;
    let filtered = filter_by_tenure(&dataset, request.tenure_years, today)?;
    let bytes_written = storage.write_csv(&request.destination, &filtered).await?;

    Ok(ProcessingResult {
        destination_path: request.destination_path,
        rows_scanned: dataset.num_rows(),
        row_count: filtered.num_rows(),
        bytes_written,
    })
}

/// Handler entry point: measures tenure against today's UTC date and
/// converts every failure into an error envelope.
pub async fn handle_tenure_request(storage: &StorageClient, payload: &Value) -> TenureResponse {
    let today = Utc::now().date_naive();
    handle_tenure_request_on(storage, payload, today).await
}

/// Same as [`handle_tenure_request`] with an explicit "today"
pub async fn handle_tenure_request_on(
    storage: &StorageClient,
    payload: &Value,
    today: NaiveDate,
) -> TenureResponse {
    match process_tenure_request(storage, payload, today).await {
        Ok(result) => {
            tracing::info!(
                destination = %result.destination_path,
                rows_scanned = result.rows_scanned,
                row_count = result.row_count,
                bytes = result.bytes_written,
                "Tenure filter complete"
            );
            TenureResponse::done(result.destination_path, result.row_count)
        }
        Err(err) => {
            tracing::error!(error_type = err.error_type(), "{}", err);
            TenureResponse::error(err.message())
        }
    }
}
