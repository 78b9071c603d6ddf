//! Background scheduled tasks.
//!
//! Call `spawn_all` once during startup.

use crate::config::VerificationConfig;
use crate::services::VerificationService;
use chrono::{DateTime, Duration, Utc};

/// Spawn all background tasks. Detaches via `tokio::spawn`; does not block.
pub fn spawn_all(verification_service: VerificationService, config: VerificationConfig) {
    spawn_attempt_purge(verification_service, config);
}

/// 清理截止时间 = now - 宽限期；溢出时返回 None
pub fn purge_cutoff(now: DateTime<Utc>, grace_secs: u64) -> Option<DateTime<Utc>> {
    let grace = Duration::try_seconds(i64::try_from(grace_secs).ok()?)?;
    now.checked_sub_signed(grace)
}

/// 定期删除过期超过宽限期的验证尝试，宽限期内仍可返回 `expired-code`
fn spawn_attempt_purge(verification_service: VerificationService, config: VerificationConfig) {
    if config.purge_interval_secs == 0 {
        log::info!("Verification attempt purge disabled");
        return;
    }

    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(config.purge_interval_secs));
        loop {
            interval.tick().await;
            let Some(cutoff) = purge_cutoff(Utc::now(), config.purge_grace_secs) else {
                log::error!(
                    "Purge grace {}s out of range, skipping verification attempt purge",
                    config.purge_grace_secs
                );
                continue;
            };
            match verification_service.purge_expired(cutoff).await {
                Ok(0) => {}
                Ok(n) => log::info!("Purged {} expired verification attempts", n),
                Err(e) => log::error!("Failed to purge verification attempts: {:?}", e),
            }
        }
    });
}
