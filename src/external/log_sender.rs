use crate::error::AppResult;
use crate::external::SmsSender;
use crate::utils::mask_phone;
use async_trait::async_trait;

/// 开发用发送器：只把短信内容写入日志并返回成功，不得用于生产环境
#[derive(Clone, Debug, Default)]
pub struct LogSmsSender;

impl LogSmsSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send_sms(&self, phone_number: &str, message: &str) -> AppResult<bool> {
        log::warn!(
            "SMS not delivered (log provider) to {}: {}",
            mask_phone(phone_number),
            message
        );
        Ok(true)
    }

    fn provider_name(&self) -> &str {
        "log"
    }
}
