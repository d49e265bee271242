use std::{error::Error, fmt};

/// Authentication failures. Deliberately coarse: the response body never
/// says more than the category, so a probing client learns nothing about
/// which part of the signature check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingHeaders,
    StaleTimestamp,
    BadSignature,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AuthError::*;
        match self {
            MissingHeaders => write!(f, "Missing authentication headers"),
            StaleTimestamp => write!(f, "Request timestamp too old or in future"),
            BadSignature => write!(f, "Invalid signature"),
        }
    }
}

impl Error for AuthError {}

#[derive(Debug)]
pub enum RepositoryError {
    /// Non-2xx response from the store, other than 404 on a read.
    /// Status and body are passed through for operator diagnosis.
    Api { status: u16, body: String },
    Transport(reqwest::Error),
    Encoding(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RepositoryError::*;
        match self {
            Api { status, body } => write!(f, "GitHub API error {}: {}", status, body),
            Transport(e) => write!(f, "Transport: {}", e),
            Encoding(s) => write!(f, "Encoding: {}", s),
        }
    }
}

impl Error for RepositoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use RepositoryError::*;
        match self {
            Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(error: reqwest::Error) -> Self {
        RepositoryError::Transport(error)
    }
}

#[derive(Debug)]
pub enum SyncError {
    Validation(String),
    Config(String),
    Repository(RepositoryError),
    Serialize(serde_json::Error),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SyncError::*;
        match self {
            Validation(s) => write!(f, "ValidationError: {}", s),
            Config(s) => write!(f, "ConfigError: {}", s),
            Repository(e) => write!(f, "RepositoryError: {}", e),
            Serialize(e) => write!(f, "SerializeError: {}", e),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use SyncError::*;
        match self {
            Repository(e) => Some(e),
            Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RepositoryError> for SyncError {
    fn from(error: RepositoryError) -> Self {
        SyncError::Repository(error)
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(error: serde_json::Error) -> Self {
        SyncError::Serialize(error)
    }
}
