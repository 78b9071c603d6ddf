use crate::error::AppResult;
use async_trait::async_trait;

/// 短信发送能力。任何服务商（Twilio、云短信、测试桩）实现此 trait 即可接入验证流程。
///
/// - `Ok(true)`：服务商已接受消息
/// - `Ok(false)`：服务商明确拒绝
/// - `Err(_)`：网络或服务商错误
///
/// 调用方在同一请求内不得重试。
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, phone_number: &str, message: &str) -> AppResult<bool>;

    fn provider_name(&self) -> &str;
}
