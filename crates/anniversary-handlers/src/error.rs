use anniversary_core::CoreError;
use anniversary_writer::StorageError;
use std::fmt;

/// Error classification shared by the filter handler and the fixture generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// A required field is absent from the payload
    InvalidPayload { field: String },
    /// A field is present but has the wrong type or format
    InvalidArgument { message: String },
    /// The object store cannot be reached or is misconfigured
    StorageUnavailable { message: String },
    /// Anything that goes wrong while loading, filtering or writing data
    TransformFailure { message: String },
}

impl HandlerError {
    pub fn missing_field(field: &str) -> Self {
        Self::InvalidPayload {
            field: field.to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Error type string for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidPayload { .. } => "InvalidPayload",
            Self::InvalidArgument { .. } => "InvalidArgument",
            Self::StorageUnavailable { .. } => "StorageUnavailable",
            Self::TransformFailure { .. } => "TransformFailure",
        }
    }

    /// Human-readable message, as placed in the error envelope
    pub fn message(&self) -> String {
        match self {
            Self::InvalidPayload { field } => format!("'{}' required in payload", field),
            Self::InvalidArgument { message } => message.clone(),
            Self::StorageUnavailable { message } => format!("Storage unavailable: {}", message),
            Self::TransformFailure { message } => message.clone(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for HandlerError {}

impl From<StorageError> for HandlerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidLocation { .. } => Self::InvalidArgument {
                message: err.to_string(),
            },
            err if err.is_unavailable() => Self::StorageUnavailable {
                message: err.to_string(),
            },
            err => Self::TransformFailure {
                message: err.to_string(),
            },
        }
    }
}

impl From<CoreError> for HandlerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TooManyRows { .. } => Self::InvalidArgument {
                message: err.to_string(),
            },
            err => Self::TransformFailure {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_field() {
        let err = HandlerError::missing_field("destination_path");
        assert_eq!(err.message(), "'destination_path' required in payload");
        assert_eq!(err.error_type(), "InvalidPayload");
    }

    #[test]
    fn test_storage_error_classification() {
        let err: HandlerError = StorageError::missing_credentials("AWS_ACCESS_KEY_ID").into();
        assert_eq!(err.error_type(), "StorageUnavailable");
        assert!(err.message().contains("AWS_ACCESS_KEY_ID"));

        let err: HandlerError = StorageError::not_found("s3://b/k").into();
        assert_eq!(err.error_type(), "TransformFailure");
        assert!(err.message().contains("s3://b/k"));

        let err: HandlerError = StorageError::invalid_location("b", "expected <bucket>/<key>").into();
        assert_eq!(err.error_type(), "InvalidArgument");
    }

    #[test]
    fn test_core_error_classification() {
        let err: HandlerError = CoreError::TooManyRows {
            requested: 2_000_000,
            max: 1_000_000,
        }
        .into();
        assert_eq!(err.error_type(), "InvalidArgument");
        assert!(err.message().contains("2000000"));

        let err: HandlerError = CoreError::MissingColumn("start_date".into()).into();
        assert_eq!(err.error_type(), "TransformFailure");
    }
}
