use thiserror::Error;

/// Main error type for cldsync operations
#[derive(Debug, Error)]
pub enum CldsyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Filesystem error on '{path}': {source}")]
    FileSystemError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request rejected by remote service (HTTP {status}): {body}")]
    RemoteRejection { status: u16, body: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Tracker storage error: {0}")]
    StorageError(String),

    #[error("Remote resource '{public_id}' was deleted but its tracker record could not be removed: {details}")]
    TrackerCleanupError { public_id: String, details: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl CldsyncError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn filesystem<S: Into<String>>(path: S, source: std::io::Error) -> Self {
        Self::FileSystemError {
            path: path.into(),
            source,
        }
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::NetworkError(msg.into())
    }

    pub fn remote_rejection<S: Into<String>>(status: u16, body: S) -> Self {
        Self::RemoteRejection {
            status,
            body: body.into(),
        }
    }

    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::DecodeError(msg.into())
    }

    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn tracker_cleanup<S: Into<String>>(public_id: S, details: S) -> Self {
        Self::TrackerCleanupError {
            public_id: public_id.into(),
            details: details.into(),
        }
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True for errors raised before any network activity because the
    /// service or tracker was misconfigured.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigError(_) | Self::UrlError(_))
    }
}

/// Result type alias for cldsync operations
pub type Result<T> = std::result::Result<T, CldsyncError>;

/// Convert MongoDB driver errors to CldsyncError
impl From<mongodb::error::Error> for CldsyncError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::StorageError(error.to_string())
    }
}

impl From<walkdir::Error> for CldsyncError {
    fn from(error: walkdir::Error) -> Self {
        let path = error
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match error.into_io_error() {
            Some(source) => Self::filesystem(path, source),
            None => Self::filesystem(
                path,
                std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_rejection_carries_status_and_body() {
        let err = CldsyncError::remote_rejection(401, "{\"error\":{\"message\":\"Invalid Signature\"}}");
        match &err {
            CldsyncError::RemoteRejection { status, body } => {
                assert_eq!(*status, 401);
                assert!(body.contains("Invalid Signature"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[test]
    fn test_config_errors_are_flagged() {
        assert!(CldsyncError::config("missing secret").is_config());
        assert!(!CldsyncError::storage("down").is_config());
    }
}
