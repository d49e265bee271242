use serde::Serialize;

/// Success body for `POST /sync`.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl SyncResponse {
    pub fn no_change() -> Self {
        SyncResponse {
            success: true,
            no_change: Some(true),
            path: None,
            message: "No changes detected".to_string(),
        }
    }

    pub fn synced(path: String, message: String) -> Self {
        SyncResponse {
            success: true,
            no_change: None,
            path: Some(path),
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub configured: bool,
}
