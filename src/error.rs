//! Error types for the search pipeline
//!
//! Collaborator failures get their own enums (`OracleError`,
//! `RecognitionError`). The controller turns them into user-facing messages;
//! `AppError` is what the command-line front end reports and exits with.

use serde::Serialize;
use thiserror::Error;

/// Failure talking to the search service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("search service unreachable: {0}")]
    Unreachable(String),
    #[error("search service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("search request timed out: {0}")]
    Timeout(String),
    #[error("malformed search response: {0}")]
    Malformed(String),
}

impl OracleError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, OracleError::Timeout(_))
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OracleError::Timeout(err.to_string())
        } else if err.is_decode() {
            OracleError::Malformed(err.to_string())
        } else {
            OracleError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        OracleError::Malformed(err.to_string())
    }
}

/// Failure of a dictation session
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("speech recognition unavailable: {0}")]
    Unavailable(String),
    #[error("speech recognition aborted: {0}")]
    Aborted(String),
    #[error("no speech was recognized")]
    NoSpeech,
}

/// Application-level errors surfaced by the CLI
#[derive(Debug, Error, Serialize)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Search unavailable: {0}")]
    OracleUnavailable(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Voice input failed: {0}")]
    RecognitionFailure(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::OracleUnavailable(_) => "oracle_unavailable",
            AppError::Timeout(_) => "timeout",
            AppError::RecognitionFailure(_) => "recognition_failure",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) | AppError::Config(_) => 1,
            AppError::OracleUnavailable(_) => 2,
            AppError::RecognitionFailure(_) => 3,
            AppError::Timeout(_) => 4,
            AppError::Internal(_) => 5,
        }
    }
}

impl From<OracleError> for AppError {
    fn from(err: OracleError) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::OracleUnavailable(err.to_string())
        }
    }
}

impl From<RecognitionError> for AppError {
    fn from(err: RecognitionError) -> Self {
        AppError::RecognitionFailure(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Validate a query given on the command line
pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput("Query cannot be empty".to_string()));
    }

    if query.len() > 500 {
        return Err(AppError::InvalidInput(
            "Query too long, maximum 500 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_error_display() {
        let err = OracleError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "search service returned HTTP 503: maintenance");
        assert_eq!(
            OracleError::Timeout("30s elapsed".to_string()).to_string(),
            "search request timed out: 30s elapsed"
        );
    }

    #[test]
    fn test_oracle_error_to_app_error() {
        let app: AppError = OracleError::Timeout("slow".to_string()).into();
        assert_eq!(app.error_code(), "timeout");
        assert_eq!(app.exit_code(), 4);

        let app: AppError = OracleError::Unreachable("refused".to_string()).into();
        assert_eq!(app.error_code(), "oracle_unavailable");
        assert_eq!(app.exit_code(), 2);
    }

    #[test]
    fn test_recognition_error_to_app_error() {
        let app: AppError = RecognitionError::NoSpeech.into();
        assert_eq!(app.to_string(), "Voice input failed: no speech was recognized");
        assert_eq!(app.error_code(), "recognition_failure");
    }

    #[test]
    fn test_json_error_is_malformed_response() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(OracleError::from(err), OracleError::Malformed(_)));
    }

    #[test]
    fn test_validate_query() {
        assert!(validate_query("graph theory").is_ok());
        assert!(matches!(validate_query("   "), Err(AppError::InvalidInput(_))));
        assert!(validate_query(&"x".repeat(501)).is_err());
    }
}
