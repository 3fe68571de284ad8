// Error handling framework
// Directory transport failures and data validation

use thiserror::Error;

/// Errors reaching or reading the group directory service.
///
/// The resolver treats every variant the same way: the affected group
/// yields no data. They are kept apart for diagnostics.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory request failed: {0}")]
    RequestFailed(String),

    #[error("Directory responded with status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Invalid directory payload: {0}")]
    InvalidPayload(String),

    #[error("Directory reported failure: {0}")]
    Unsuccessful(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),
}

impl DirectoryError {
    /// Short label used as a metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            DirectoryError::RequestFailed(_) => "request_failed",
            DirectoryError::Status { .. } => "status",
            DirectoryError::InvalidPayload(_) => "invalid_payload",
            DirectoryError::Unsuccessful(_) => "unsuccessful",
            DirectoryError::GroupNotFound(_) => "not_found",
        }
    }
}

/// Validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid field value for {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Session {start}-{end} falls outside the operating window {window_start}-{window_end}")]
    OutsideWindow {
        start: String,
        end: String,
        window_start: String,
        window_end: String,
    },

    #[error("Session {start}-{end} overlaps the lunch break {lunch_start}-{lunch_end}")]
    OverlapsLunch {
        start: String,
        end: String,
        lunch_start: String,
        lunch_end: String,
    },
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DirectoryError::InvalidPayload(err.to_string())
        } else {
            DirectoryError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::InvalidPayload(err.to_string())
    }
}
