use std::path::PathBuf;
use thiserror::Error;

/// Why a scrape or load-more request failed. Exactly one variant is reported
/// per failure; its `Display` is the banner text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The API answered non-2xx with a structured `{"error": ...}` payload.
    #[error("Error: {message}")]
    RemoteRejection { status: u16, message: String },

    /// No usable response was received.
    #[error("Error: {0}")]
    TransportFailure(String),

    #[error("An unexpected error occurred: {0}")]
    Unclassified(String),
}

impl FetchError {
    /// The message without the banner prefix.
    pub fn detail(&self) -> &str {
        match self {
            FetchError::RemoteRejection { message, .. } => message,
            FetchError::TransportFailure(msg) | FetchError::Unclassified(msg) => msg,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RemoteRejection { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_text_per_variant() {
        let remote = FetchError::RemoteRejection {
            status: 400,
            message: "invalid url".to_string(),
        };
        assert_eq!(remote.to_string(), "Error: invalid url");
        assert_eq!(remote.status(), Some(400));

        let transport = FetchError::TransportFailure("connection refused".to_string());
        assert_eq!(transport.to_string(), "Error: connection refused");
        assert_eq!(transport.detail(), "connection refused");

        let other = FetchError::Unclassified("bad body".to_string());
        assert_eq!(other.to_string(), "An unexpected error occurred: bad body");
        assert_eq!(other.status(), None);
    }
}
