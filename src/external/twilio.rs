use crate::config::SmsConfig;
use crate::error::{AppError, AppResult};
use crate::external::SmsSender;
use crate::utils::mask_phone;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct SendSmsResponse {
    pub sid: Option<String>,
    pub status: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

#[derive(Clone)]
pub struct TwilioSmsSender {
    client: Client,
    config: SmsConfig,
}

impl TwilioSmsSender {
    pub fn new(config: SmsConfig) -> AppResult<Self> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            return Err(AppError::ConfigError(
                "Twilio account_sid and auth_token are required".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send_sms(&self, phone_number: &str, message: &str) -> AppResult<bool> {
        let params = [
            ("To", phone_number),
            ("From", self.config.from.as_str()),
            ("Body", message),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!(
                "Twilio rejected SMS to {}: {}",
                mask_phone(phone_number),
                error_text
            );
            return Err(AppError::ExternalApiError(format!(
                "SMS sending failed: {}",
                error_text
            )));
        }

        let body: SendSmsResponse = response.json().await?;
        match body.sid {
            Some(sid) if !sid.is_empty() => {
                log::info!(
                    "SMS sent to {} (sid={}, status={})",
                    mask_phone(phone_number),
                    sid,
                    body.status.as_deref().unwrap_or("unknown")
                );
                Ok(true)
            }
            _ => {
                log::error!(
                    "Twilio returned no message sid for {}: {:?} {:?}",
                    mask_phone(phone_number),
                    body.error_code,
                    body.error_message
                );
                Ok(false)
            }
        }
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}
