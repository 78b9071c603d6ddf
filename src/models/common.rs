use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 错误响应体：`{"success": false, "error": {...}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    #[schema(example = "SMS_SEND_FAILED")]
    pub code: String,
    #[schema(example = "SMS could not be sent to +15551234567")]
    pub message: String,
}
