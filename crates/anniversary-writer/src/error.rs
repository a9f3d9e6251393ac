//! Error types for the storage crate

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Storage unreachable or rejected the request
    E001StorageUnreachable,
    /// E002: Credentials missing or invalid
    E002InvalidCredentials,
    /// E003: Object or bucket does not exist
    E003NotFound,
    /// E004: Configuration missing or invalid
    E004InvalidConfig,
    /// E005: Write operation failed
    E005WriteFailure,
    /// E006: Stored object could not be decoded
    E006ReadFailure,
    /// E007: Location string could not be parsed
    E007InvalidLocation,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001StorageUnreachable => "E001",
            Self::E002InvalidCredentials => "E002",
            Self::E003NotFound => "E003",
            Self::E004InvalidConfig => "E004",
            Self::E005WriteFailure => "E005",
            Self::E006ReadFailure => "E006",
            Self::E007InvalidLocation => "E007",
        }
    }
}

/// Errors that can occur while talking to object storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend refused or could not be reached
    #[error("[{code}] Storage unavailable at '{location}': {reason}")]
    Unavailable {
        code: &'static str,
        location: String,
        reason: String,
    },

    /// A required credential environment variable was not set
    #[error("[{code}] Missing credential: {variable} is not set")]
    MissingCredentials {
        code: &'static str,
        variable: &'static str,
    },

    /// Object not found
    #[error("[{code}] Object not found: {location}")]
    NotFound { code: &'static str, location: String },

    /// Invalid configuration provided
    #[error("[{code}] Invalid storage configuration: {message}")]
    InvalidConfig { code: &'static str, message: String },

    /// Encoding or uploading failed
    #[error("[{code}] Write to '{location}' failed: {reason}")]
    WriteFailure {
        code: &'static str,
        location: String,
        reason: String,
    },

    /// Object was read but is not a usable dataset
    #[error("[{code}] Read of '{location}' failed: {reason}")]
    ReadFailure {
        code: &'static str,
        location: String,
        reason: String,
    },

    /// Location string could not be parsed
    #[error("[{code}] Invalid location '{input}': {reason}")]
    InvalidLocation {
        code: &'static str,
        input: String,
        reason: String,
    },
}

impl StorageError {
    pub fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unavailable {
            code: ErrorCode::E001StorageUnreachable.as_str(),
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_credentials(variable: &'static str) -> Self {
        Self::MissingCredentials {
            code: ErrorCode::E002InvalidCredentials.as_str(),
            variable,
        }
    }

    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::E003NotFound.as_str(),
            location: location.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            code: ErrorCode::E004InvalidConfig.as_str(),
            message: message.into(),
        }
    }

    pub fn write_failure(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::WriteFailure {
            code: ErrorCode::E005WriteFailure.as_str(),
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn read_failure(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::ReadFailure {
            code: ErrorCode::E006ReadFailure.as_str(),
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_location(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            code: ErrorCode::E007InvalidLocation.as_str(),
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// True when the failure lies with the backend itself rather than the data
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::MissingCredentials { .. } | Self::InvalidConfig { .. }
        )
    }

    /// Classify an OpenDAL error for the object at `location`.
    pub(crate) fn from_opendal(location: &str, err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => Self::not_found(location),
            ErrorKind::ConfigInvalid => Self::invalid_config(err.to_string()),
            _ => Self::unavailable(location, err),
        }
    }
}

/// Result type alias for StorageError
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let err = StorageError::missing_credentials("AWS_ACCESS_KEY_ID");
        assert!(err.to_string().starts_with("[E002]"));
        assert!(err.to_string().contains("AWS_ACCESS_KEY_ID"));
        assert!(err.is_unavailable());

        let err = StorageError::not_found("s3://bucket/key");
        assert!(err.to_string().contains("[E003]"));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_from_opendal_classification() {
        let err = StorageError::from_opendal(
            "b/k",
            opendal::Error::new(opendal::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, StorageError::NotFound { .. }));

        let err = StorageError::from_opendal(
            "b/k",
            opendal::Error::new(opendal::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(err.is_unavailable());
    }
}
