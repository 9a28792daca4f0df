use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every failed request: `{"success": false, "message": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
