//! Success and error envelopes returned to the invoker

use serde_json::{json, Value};

pub const STATUS_DONE: &str = "done";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenureResponse {
    Done {
        destination_path: String,
        row_count: usize,
    },
    Error {
        error_message: String,
    },
}

impl TenureResponse {
    pub fn done(destination_path: impl Into<String>, row_count: usize) -> Self {
        Self::Done {
            destination_path: destination_path.into(),
            row_count,
        }
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        Self::Error {
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    pub fn row_count(&self) -> Option<usize> {
        match self {
            Self::Done { row_count, .. } => Some(*row_count),
            Self::Error { .. } => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Done {
                destination_path,
                row_count,
            } => json!({
                "status": STATUS_DONE,
                "destination_path": destination_path,
                "row_count": row_count,
            }),
            Self::Error { error_message } => json!({ "error_message": error_message }),
        }
    }

    /// JSON-encoded envelope, the form handed back to the invoker
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_envelope() {
        let response = TenureResponse::done("s3://out/result.csv", 0);
        let value: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(value["status"], "done");
        assert_eq!(value["destination_path"], "s3://out/result.csv");
        assert_eq!(value["row_count"], 0);
        assert!(value.get("error_message").is_none());
        assert!(response.is_success());
    }

    #[test]
    fn test_error_envelope() {
        let response = TenureResponse::error("'source_key' required in payload");
        let value: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(value["error_message"], "'source_key' required in payload");
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert_eq!(response.row_count(), None);
    }
}
