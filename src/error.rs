//! Error taxonomy for talking to the hosting API.
//!
//! Configuration problems are fatal before any network work starts. Transport,
//! API and parse failures are fatal only when listing repositories; everywhere
//! else the orchestrator reports them and moves on to the next unit of work.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// Missing environment variable, unreadable config file, bad base URL
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be sent or the response could not be read
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status other than the one the call expects
    #[error("{context}: HTTP {status} - {reason}")]
    Api {
        context: String,
        status: u16,
        reason: String,
    },

    /// The response body did not have the expected shape
    #[error("{context}: {message}")]
    Parse { context: String, message: String },
}

impl SweepError {
    pub fn config(message: impl Into<String>) -> Self {
        SweepError::Config(message.into())
    }

    /// HTTP status carried by an `Api` error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SweepError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_includes_status_and_reason() {
        let err = SweepError::Api {
            context: "Failed to fetch repositories".to_string(),
            status: 401,
            reason: "Unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch repositories: HTTP 401 - Unauthorized"
        );
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_config_error_has_no_status() {
        let err = SweepError::config("BITBUCKET_TOKEN environment variable is not set");
        assert!(err.to_string().contains("BITBUCKET_TOKEN"));
        assert_eq!(err.status(), None);
    }
}
