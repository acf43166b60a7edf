//! Error types for dashboard operations

use std::time::Duration;
use thiserror::Error;

/// Classified failure of an analysis request
///
/// Every failed analysis cycle carries exactly one of these. The variants
/// are distinct so the dashboard can show a tailored message per cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No response arrived before the client-side deadline
    #[error("Analysis timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The request never produced an HTTP response (DNS, refused connection, reset)
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// The service answered with a non-success status
    #[error("Analysis service error {status}: {body}")]
    ServiceError { status: u16, body: String },

    /// The response body did not match the analysis schema
    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),
}

/// Fieldless tag for [`AnalysisError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisErrorKind {
    Timeout,
    TransportFailure,
    ServiceError,
    MalformedResponse,
}

impl AnalysisError {
    /// Classification tag without payload
    pub fn kind(&self) -> AnalysisErrorKind {
        match self {
            Self::Timeout(_) => AnalysisErrorKind::Timeout,
            Self::TransportFailure(_) => AnalysisErrorKind::TransportFailure,
            Self::ServiceError { .. } => AnalysisErrorKind::ServiceError,
            Self::MalformedResponse(_) => AnalysisErrorKind::MalformedResponse,
        }
    }

    /// Message suitable for showing next to a retry affordance
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout(deadline) => format!(
                "The analysis service did not answer within {} seconds. It may still be busy; try again shortly.",
                deadline.as_secs()
            ),
            Self::TransportFailure(_) => {
                "Could not reach the analysis service. Check that it is running and reachable."
                    .to_string()
            }
            Self::ServiceError { status, .. } if *status >= 500 => {
                format!("The analysis service failed ({status}). Try again.")
            }
            Self::ServiceError { status, body } => {
                format!("The analysis service rejected the request ({status}): {body}")
            }
            Self::MalformedResponse(_) => {
                "The analysis service returned data this client could not read.".to_string()
            }
        }
    }
}

/// Failure while loading quotes for a category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Category key is not in the catalog
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Quote provider could not be reached
    #[error("Quote provider request failed: {0}")]
    Transport(String),

    /// Quote provider answered with a non-success status
    #[error("Quote provider error {status}: {body}")]
    Status { status: u16, body: String },

    /// Response had no `data` field
    #[error("Quote provider response is missing `data`")]
    MissingData,

    /// Response could not be decoded
    #[error("Failed to decode quote response: {0}")]
    Decode(String),
}

/// Crate-level errors
#[derive(Debug, Error)]
pub enum DashError {
    /// Analysis request failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Market data fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Invalid input provided by the user
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Network or HTTP client error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::ServiceError {
            status: 500,
            body: "server error".to_string(),
        };
        assert_eq!(err.to_string(), "Analysis service error 500: server error");

        let err = AnalysisError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Analysis timed out after 30s");

        let err = FetchError::UnknownCategory("crypto".to_string());
        assert_eq!(err.to_string(), "Unknown category: crypto");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            AnalysisError::Timeout(Duration::from_secs(1)).kind(),
            AnalysisErrorKind::Timeout
        );
        assert_eq!(
            AnalysisError::TransportFailure("refused".into()).kind(),
            AnalysisErrorKind::TransportFailure
        );
        assert_eq!(
            AnalysisError::MalformedResponse("eof".into()).kind(),
            AnalysisErrorKind::MalformedResponse
        );
    }

    #[test]
    fn test_user_message_is_tailored() {
        let timeout = AnalysisError::Timeout(Duration::from_secs(30)).user_message();
        assert!(timeout.contains("30 seconds"));

        let client = AnalysisError::ServiceError {
            status: 422,
            body: "unknown symbol".into(),
        }
        .user_message();
        assert!(client.contains("unknown symbol"));

        let server = AnalysisError::ServiceError {
            status: 503,
            body: "<html>".into(),
        }
        .user_message();
        assert!(!server.contains("<html>"));
    }

    #[test]
    fn test_error_conversion() {
        let err: DashError = FetchError::MissingData.into();
        match err {
            DashError::Fetch(FetchError::MissingData) => {}
            other => panic!("Expected Fetch variant, got {other:?}"),
        }
    }
}
