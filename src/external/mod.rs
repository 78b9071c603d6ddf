pub mod log_sender;
pub mod sms;
pub mod twilio;

pub use log_sender::*;
pub use sms::*;
pub use twilio::*;

use crate::config::{SmsConfig, SmsProvider};
use crate::error::AppResult;
use std::sync::Arc;

/// 根据配置构建短信发送实现
pub fn build_sms_sender(config: &SmsConfig) -> AppResult<Arc<dyn SmsSender>> {
    let sender: Arc<dyn SmsSender> = match config.provider {
        SmsProvider::Twilio => Arc::new(TwilioSmsSender::new(config.clone())?),
        SmsProvider::Log => {
            log::warn!("SMS provider is \"log\": codes are logged, not delivered");
            Arc::new(LogSmsSender::new())
        }
    };
    log::info!("Using SMS provider: {}", sender.provider_name());
    Ok(sender)
}
