// AWS Lambda runtime adapter
//
// Invoked directly (not through API Gateway): the event is the request
// payload and the return value is the JSON-encoded envelope.

use anniversary_config::{LogConfig, LogFormat, RuntimeConfig};
use anniversary_handlers::handle_tenure_request;
use anniversary_writer::StorageClient;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

/// Shared across invocations for the lifetime of the execution environment
#[derive(Clone)]
pub(crate) struct LambdaState {
    pub storage: StorageClient,
}

/// Lambda handler for tenure filter requests
async fn handle_request(event: LambdaEvent<Value>, state: Arc<LambdaState>) -> Result<String, Error> {
    let (payload, context) = event.into_parts();
    tracing::debug!(request_id = %context.request_id, "Received tenure request");

    // Failures are reported in the envelope, never as a Lambda error
    let response = handle_tenure_request(&state.storage, &payload).await;
    Ok(response.to_json())
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let config = RuntimeConfig::load()
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;

    init_tracing(&config.log);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        built = env!("BUILD_TIMESTAMP"),
        backend = %config.storage.backend,
        "Lambda cold start"
    );

    let storage = StorageClient::from_config(&config.storage)
        .map_err(|e| Error::from(format!("Failed to initialize storage: {}", e)))?;
    let state = Arc::new(LambdaState { storage });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let state = state.clone();
        async move { handle_request(event, state).await }
    }))
    .await
}

/// CloudWatch adds its own timestamps, so lines carry none
fn init_tracing(log: &LogConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_new(&log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let _ = match log.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().without_time().with_ansi(false)),
        ),
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().without_time().with_ansi(false)),
        ),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use anniversary_handlers::{generate_fixtures, FixtureRequest};
    use lambda_runtime::Context;
    use serde_json::json;

    async fn state_with_dataset() -> Arc<LambdaState> {
        let storage = StorageClient::memory().unwrap();
        let request = FixtureRequest {
            bucket: "fixtures".to_string(),
            key: "sample.parquet".to_string(),
            num_rows: 20,
            seed: Some(17),
        };
        generate_fixtures(&storage, &request).await.unwrap();
        Arc::new(LambdaState { storage })
    }

    #[tokio::test]
    async fn test_handler_returns_json_string_envelope() {
        let state = state_with_dataset().await;
        let payload = json!({
            "tenure_years": 20,
            "source_bucket": "fixtures",
            "source_key": "sample.parquet",
            "destination_path": "s3://output/twenty.csv",
        });

        let body = handle_request(LambdaEvent::new(payload, Context::default()), state)
            .await
            .unwrap();
        let envelope: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(envelope["status"], "done");
        assert_eq!(envelope["destination_path"], "s3://output/twenty.csv");
        assert!(envelope["row_count"].is_u64());
    }

    #[tokio::test]
    async fn test_handler_never_fails_the_invocation() {
        let state = state_with_dataset().await;
        let body = handle_request(
            LambdaEvent::new(json!({ "tenure_years": "abc" }), Context::default()),
            state,
        )
        .await
        .unwrap();

        let envelope: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            envelope["error_message"],
            anniversary_handlers::INVALID_TENURE_MESSAGE
        );
    }
}
