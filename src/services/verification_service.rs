use crate::database::VerificationAttemptStore;
use crate::error::{AppError, AppResult};
use crate::external::SmsSender;
use crate::models::{NewVerificationAttempt, SendVerificationResponse, VerificationStatus};
use crate::utils::{
    VERIFICATION_CODE_LENGTH, generate_numeric_code, mask_phone, normalize_phone, validate_phone,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// 验证码有效期（秒）
pub const VERIFICATION_TTL_SECONDS: i64 = 600;

#[derive(Debug, Clone)]
pub struct VerificationPolicy {
    /// 校验成功后立即删除该尝试，防止同一验证码重复使用
    pub consume_on_success: bool,
    /// 用于短信文案
    pub app_name: String,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            consume_on_success: true,
            app_name: "TILApp".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct VerificationService {
    sms_sender: Arc<dyn SmsSender>,
    store: Arc<dyn VerificationAttemptStore>,
    policy: VerificationPolicy,
}

impl VerificationService {
    pub fn new(
        sms_sender: Arc<dyn SmsSender>,
        store: Arc<dyn VerificationAttemptStore>,
        policy: VerificationPolicy,
    ) -> Self {
        Self {
            sms_sender,
            store,
            policy,
        }
    }

    /// 发送验证码短信，成功发送后才持久化尝试记录
    pub async fn begin_verification(&self, raw_phone: &str) -> AppResult<SendVerificationResponse> {
        let phone_number = normalize_phone(raw_phone);
        validate_phone(&phone_number)?;

        let code = generate_numeric_code(VERIFICATION_CODE_LENGTH);
        let message = format!(
            "Hello from {}! Your verification code is {}",
            self.policy.app_name, code
        );

        let sent = match self.sms_sender.send_sms(&phone_number, &message).await {
            Ok(sent) => sent,
            Err(e) => {
                log::error!(
                    "SMS provider {} failed for {}: {}",
                    self.sms_sender.provider_name(),
                    mask_phone(&phone_number),
                    e
                );
                false
            }
        };
        if !sent {
            return Err(AppError::SmsSendFailure { phone_number });
        }

        let attempt = self
            .store
            .save(NewVerificationAttempt {
                code,
                phone_number: phone_number.clone(),
                expires_at: Utc::now() + Duration::seconds(VERIFICATION_TTL_SECONDS),
            })
            .await?;

        log::info!(
            "Verification attempt {} issued for {}",
            attempt.id,
            mask_phone(&phone_number)
        );

        Ok(SendVerificationResponse {
            phone_number,
            attempt_id: attempt.id,
        })
    }

    pub async fn validate_code(
        &self,
        attempt_id: Uuid,
        raw_phone: &str,
        code: &str,
    ) -> AppResult<VerificationStatus> {
        self.validate_code_at(attempt_id, raw_phone, code, Utc::now())
            .await
    }

    /// 以给定时间点校验验证码；不区分哪个字段不匹配
    pub async fn validate_code_at(
        &self,
        attempt_id: Uuid,
        raw_phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<VerificationStatus> {
        let phone_number = normalize_phone(raw_phone);

        let Some(attempt) = self
            .store
            .find_by_identity_phone_code(attempt_id, &phone_number, code)
            .await?
        else {
            log::warn!("Invalid verification code for attempt {}", attempt_id);
            return Ok(VerificationStatus::InvalidCode);
        };

        if attempt.is_expired_at(now) {
            log::info!("Verification attempt {} expired", attempt_id);
            return Ok(VerificationStatus::ExpiredCode);
        }

        if self.policy.consume_on_success {
            // a concurrent validation may already have consumed it
            if !self.store.delete(attempt.id).await? {
                return Ok(VerificationStatus::InvalidCode);
            }
        }

        Ok(VerificationStatus::Ok)
    }

    /// 清理在 `cutoff` 之前已过期的尝试记录
    pub async fn purge_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        self.store.delete_expired_before(cutoff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryAttemptStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        outcome: Option<bool>,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSender {
        fn succeeding() -> Self {
            Self {
                outcome: Some(true),
                ..Default::default()
            }
        }

        fn declining() -> Self {
            Self {
                outcome: Some(false),
                ..Default::default()
            }
        }

        fn erroring() -> Self {
            Self::default()
        }

        fn last_code(&self) -> String {
            let sent = self.sent.lock().unwrap();
            let (_, message) = sent.last().expect("a message was sent");
            message
                .chars()
                .rev()
                .take(VERIFICATION_CODE_LENGTH)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect()
        }
    }

    #[async_trait]
    impl SmsSender for RecordingSender {
        async fn send_sms(&self, phone_number: &str, message: &str) -> AppResult<bool> {
            self.sent
                .lock()
                .unwrap()
                .push((phone_number.to_string(), message.to_string()));
            self.outcome
                .ok_or_else(|| AppError::ExternalApiError("provider down".to_string()))
        }

        fn provider_name(&self) -> &str {
            "recording"
        }
    }

    fn service_with(
        sender: Arc<RecordingSender>,
        consume_on_success: bool,
    ) -> (VerificationService, InMemoryAttemptStore) {
        let store = InMemoryAttemptStore::new();
        let service = VerificationService::new(
            sender,
            Arc::new(store.clone()),
            VerificationPolicy {
                consume_on_success,
                ..VerificationPolicy::default()
            },
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_begin_verification_persists_attempt() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender.clone(), true);

        let before = Utc::now();
        let resp = service.begin_verification("+1 (555) 123-4567").await.unwrap();
        let after = Utc::now();

        assert_eq!(resp.phone_number, "+15551234567");
        let attempt = store.get(resp.attempt_id).await.expect("attempt persisted");
        assert_eq!(attempt.phone_number, "+15551234567");
        assert_eq!(attempt.code.len(), 6);
        assert!(attempt.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(attempt.code, sender.last_code());
        assert!(attempt.expires_at >= before + Duration::seconds(VERIFICATION_TTL_SECONDS));
        assert!(attempt.expires_at <= after + Duration::seconds(VERIFICATION_TTL_SECONDS));

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent[0].0, "+15551234567");
        assert!(sent[0].1.contains(&attempt.code));
    }

    #[tokio::test]
    async fn test_declined_send_persists_nothing() {
        let sender = Arc::new(RecordingSender::declining());
        let (service, store) = service_with(sender, true);

        let err = service.begin_verification("+1 555 123 4567").await.unwrap_err();
        match err {
            AppError::SmsSendFailure { phone_number } => assert_eq!(phone_number, "+15551234567"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_provider_error_persists_nothing() {
        let sender = Arc::new(RecordingSender::erroring());
        let (service, store) = service_with(sender, true);

        assert!(matches!(
            service.begin_verification("+15551234567").await,
            Err(AppError::SmsSendFailure { .. })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_phone_is_rejected_before_sending() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender.clone(), true);

        assert!(matches!(
            service.begin_verification("not a phone").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(sender.sent.lock().unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_scenario_ok_then_expired() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender.clone(), false);

        let resp = service.begin_verification("+1 (555) 123-4567").await.unwrap();
        let code = sender.last_code();

        assert_eq!(
            service
                .validate_code(resp.attempt_id, "+15551234567", &code)
                .await
                .unwrap(),
            VerificationStatus::Ok
        );

        let expires_at = store.get(resp.attempt_id).await.unwrap().expires_at;
        for at in [expires_at, expires_at + Duration::seconds(1)] {
            assert_eq!(
                service
                    .validate_code_at(resp.attempt_id, "+15551234567", &code, at)
                    .await
                    .unwrap(),
                VerificationStatus::ExpiredCode
            );
        }
    }

    #[tokio::test]
    async fn test_any_altered_field_is_invalid() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, _store) = service_with(sender.clone(), false);

        let resp = service.begin_verification("+15551234567").await.unwrap();
        let code = sender.last_code();
        let wrong_code = if code == "000000" { "000001" } else { "000000" };

        for (id, phone, c) in [
            (resp.attempt_id, "+15551234567", wrong_code),
            (resp.attempt_id, "+15559999999", code.as_str()),
            (Uuid::new_v4(), "+15551234567", code.as_str()),
        ] {
            assert_eq!(
                service.validate_code(id, phone, c).await.unwrap(),
                VerificationStatus::InvalidCode
            );
        }
    }

    #[tokio::test]
    async fn test_phone_is_normalized_on_validation() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, _store) = service_with(sender.clone(), false);

        let resp = service.begin_verification("+15551234567").await.unwrap();
        let status = service
            .validate_code(resp.attempt_id, "+1 (555) 123-4567", &sender.last_code())
            .await
            .unwrap();
        assert_eq!(status, VerificationStatus::Ok);
    }

    #[tokio::test]
    async fn test_consume_on_success_prevents_replay() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender.clone(), true);

        let resp = service.begin_verification("+15551234567").await.unwrap();
        let code = sender.last_code();

        assert_eq!(
            service
                .validate_code(resp.attempt_id, "+15551234567", &code)
                .await
                .unwrap(),
            VerificationStatus::Ok
        );
        assert!(store.is_empty().await);
        assert_eq!(
            service
                .validate_code(resp.attempt_id, "+15551234567", &code)
                .await
                .unwrap(),
            VerificationStatus::InvalidCode
        );
    }

    #[tokio::test]
    async fn test_replay_allowed_when_not_consuming() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender.clone(), false);

        let resp = service.begin_verification("+15551234567").await.unwrap();
        let code = sender.last_code();

        for _ in 0..2 {
            assert_eq!(
                service
                    .validate_code(resp.attempt_id, "+15551234567", &code)
                    .await
                    .unwrap(),
                VerificationStatus::Ok
            );
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_attempt_is_not_consumed() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender.clone(), true);

        let resp = service.begin_verification("+15551234567").await.unwrap();
        let later = Utc::now() + Duration::seconds(VERIFICATION_TTL_SECONDS + 1);
        assert_eq!(
            service
                .validate_code_at(resp.attempt_id, "+15551234567", &sender.last_code(), later)
                .await
                .unwrap(),
            VerificationStatus::ExpiredCode
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_begins_create_independent_attempts() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender, true);

        let (a, b) = tokio::join!(
            service.begin_verification("+15551234567"),
            service.begin_verification("+15551234567")
        );
        assert_ne!(a.unwrap().attempt_id, b.unwrap().attempt_id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_begin_validate_consume_with_sea_orm_store() {
        use crate::config::DatabaseConfig;
        use crate::database::{SeaOrmAttemptStore, create_pool, run_migrations};

        let pool = create_pool(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        run_migrations(&pool).await.unwrap();

        let sender = Arc::new(RecordingSender::succeeding());
        let service = VerificationService::new(
            sender.clone(),
            Arc::new(SeaOrmAttemptStore::new(pool)),
            VerificationPolicy::default(),
        );

        let resp = service.begin_verification("+1 (555) 123-4567").await.unwrap();
        let code = sender.last_code();
        let wrong_code = if code == "000000" { "000001" } else { "000000" };

        assert_eq!(
            service
                .validate_code(resp.attempt_id, "+15551234567", wrong_code)
                .await
                .unwrap(),
            VerificationStatus::InvalidCode
        );

        let later = Utc::now() + Duration::seconds(VERIFICATION_TTL_SECONDS + 1);
        assert_eq!(
            service
                .validate_code_at(resp.attempt_id, "+15551234567", &code, later)
                .await
                .unwrap(),
            VerificationStatus::ExpiredCode
        );
        assert_eq!(
            service
                .validate_code(resp.attempt_id, "+15551234567", &code)
                .await
                .unwrap(),
            VerificationStatus::Ok
        );
        assert_eq!(
            service
                .validate_code(resp.attempt_id, "+15551234567", &code)
                .await
                .unwrap(),
            VerificationStatus::InvalidCode
        );
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let sender = Arc::new(RecordingSender::succeeding());
        let (service, store) = service_with(sender, true);

        service.begin_verification("+15551234567").await.unwrap();
        assert_eq!(service.purge_expired(Utc::now()).await.unwrap(), 0);
        let past_ttl = Utc::now() + Duration::seconds(VERIFICATION_TTL_SECONDS + 1);
        assert_eq!(service.purge_expired(past_ttl).await.unwrap(), 1);
        assert!(store.is_empty().await);
    }
}
