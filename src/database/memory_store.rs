use crate::database::VerificationAttemptStore;
use crate::entities::sms_verification_attempt_entity as attempts;
use crate::error::AppResult;
use crate::models::NewVerificationAttempt;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// 基于内存 HashMap 的存储，用于开发与测试，进程重启后数据丢失
#[derive(Clone, Default)]
pub struct InMemoryAttemptStore {
    attempts: Arc<RwLock<HashMap<Uuid, attempts::Model>>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.attempts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.attempts.read().await.is_empty()
    }

    pub async fn get(&self, id: Uuid) -> Option<attempts::Model> {
        self.attempts.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl VerificationAttemptStore for InMemoryAttemptStore {
    async fn save(&self, attempt: NewVerificationAttempt) -> AppResult<attempts::Model> {
        let model = attempts::Model {
            id: Uuid::new_v4(),
            code: attempt.code,
            phone_number: attempt.phone_number,
            expires_at: attempt.expires_at,
            created_at: Utc::now(),
        };
        self.attempts.write().await.insert(model.id, model.clone());
        Ok(model)
    }

    async fn find_by_identity_phone_code(
        &self,
        id: Uuid,
        phone_number: &str,
        code: &str,
    ) -> AppResult<Option<attempts::Model>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .get(&id)
            .filter(|a| a.phone_number == phone_number && a.code == code)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.attempts.write().await.remove(&id).is_some())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| a.expires_at > cutoff);
        Ok((before - attempts.len()) as u64)
    }
}
