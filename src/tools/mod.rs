/// Nutrition operations shared by the HTTP API and the MCP tools
///
/// Each operation takes a storage implementation plus loosely-typed
/// request parameters, validates them and returns a typed response or a
/// `ToolError` classifying what went wrong.

pub mod analytics;
pub mod daily;
pub mod meal;
pub mod profile;

pub use analytics::*;
pub use daily::*;
pub use meal::*;
pub use profile::*;

use thiserror::Error;
use crate::domain::{DomainError, UserId};
use crate::storage::StorageError;

/// Operation-level failure taxonomy
#[derive(Error, Debug)]
pub enum ToolError {
    /// Caller supplied missing or invalid input
    #[error("{0}")]
    BadRequest(String),

    /// Referenced user does not exist
    #[error("{0}")]
    NotFound(String),

    /// Unexpected fault; detail is for logs only
    #[error("Internal failure: {0}")]
    Internal(StorageError),
}

impl From<StorageError> for ToolError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UserNotFound { user_id } => {
                ToolError::NotFound(format!("User not found: {}", user_id))
            }
            StorageError::Rejected(e) => ToolError::BadRequest(e.to_string()),
            other => ToolError::Internal(other),
        }
    }
}

impl From<DomainError> for ToolError {
    fn from(err: DomainError) -> Self {
        ToolError::BadRequest(err.to_string())
    }
}

/// Require a non-blank `userId`. A value that isn't a valid ID can't name
/// an existing user, so it is reported as not found.
pub(crate) fn require_user_id(raw: Option<&str>) -> Result<UserId, ToolError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::BadRequest("userId is required".to_string()))?;

    UserId::from_string(raw).map_err(|_| ToolError::NotFound(format!("User not found: {}", raw)))
}
