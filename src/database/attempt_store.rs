use crate::database::DbPool;
use crate::entities::sms_verification_attempt_entity as attempts;
use crate::error::AppResult;
use crate::models::NewVerificationAttempt;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// 验证尝试的持久化接口
#[async_trait]
pub trait VerificationAttemptStore: Send + Sync {
    /// 保存新的尝试记录并返回带 id 的持久化结果
    async fn save(&self, attempt: NewVerificationAttempt) -> AppResult<attempts::Model>;

    /// id、手机号、验证码三者必须全部精确匹配
    async fn find_by_identity_phone_code(
        &self,
        id: Uuid,
        phone_number: &str,
        code: &str,
    ) -> AppResult<Option<attempts::Model>>;

    /// 返回是否确实删除了记录
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// 删除 `expires_at <= cutoff` 的记录，返回删除条数
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct SeaOrmAttemptStore {
    pool: DbPool,
}

impl SeaOrmAttemptStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationAttemptStore for SeaOrmAttemptStore {
    async fn save(&self, attempt: NewVerificationAttempt) -> AppResult<attempts::Model> {
        let model = attempts::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(attempt.code),
            phone_number: Set(attempt.phone_number),
            expires_at: Set(attempt.expires_at),
            created_at: Set(Utc::now()),
        };
        Ok(model.insert(&self.pool).await?)
    }

    async fn find_by_identity_phone_code(
        &self,
        id: Uuid,
        phone_number: &str,
        code: &str,
    ) -> AppResult<Option<attempts::Model>> {
        let found = attempts::Entity::find_by_id(id)
            .filter(attempts::Column::PhoneNumber.eq(phone_number))
            .filter(attempts::Column::Code.eq(code))
            .one(&self.pool)
            .await?;
        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let res = attempts::Entity::delete_by_id(id).exec(&self.pool).await?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let res = attempts::Entity::delete_many()
            .filter(attempts::Column::ExpiresAt.lte(cutoff))
            .exec(&self.pool)
            .await?;
        Ok(res.rows_affected)
    }
}
