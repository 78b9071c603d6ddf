use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 待持久化的验证尝试，`id` 由存储层在保存时生成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVerificationAttempt {
    pub code: String,
    pub phone_number: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendVerificationRequest {
    #[schema(example = "+1 (555) 123-4567")]
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendVerificationResponse {
    #[schema(example = "+15551234567")]
    pub phone_number: String,
    pub attempt_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub attempt_id: Uuid,
    #[schema(example = "+15551234567")]
    pub phone_number: String,
    #[schema(example = "482913")]
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VerificationStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "invalid-code")]
    InvalidCode,
    #[serde(rename = "expired-code")]
    ExpiredCode,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Ok => write!(f, "ok"),
            VerificationStatus::InvalidCode => write!(f, "invalid-code"),
            VerificationStatus::ExpiredCode => write!(f, "expired-code"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeResponse {
    pub status: VerificationStatus,
}
