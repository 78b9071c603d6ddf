use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum SmsVerificationAttempts {
    Table,
    Id,
    Code,
    PhoneNumber,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One row per issued SMS code. Rows are never updated; they are removed on
/// successful validation or by the expiry purge task.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SmsVerificationAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SmsVerificationAttempts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SmsVerificationAttempts::Code)
                            .string_len(6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SmsVerificationAttempts::PhoneNumber)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SmsVerificationAttempts::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SmsVerificationAttempts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // purge task scans by expiry
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sms_verification_attempts_expires_at")
                    .table(SmsVerificationAttempts::Table)
                    .col(SmsVerificationAttempts::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(SmsVerificationAttempts::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
