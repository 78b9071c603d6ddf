use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sms: SmsConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 短信服务商，必须显式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    Twilio,
    /// 仅写日志不实际发送，只用于开发环境
    Log,
}

impl std::str::FromStr for SmsProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "twilio" => Ok(SmsProvider::Twilio),
            "log" => Ok(SmsProvider::Log),
            other => Err(AppError::ConfigError(format!(
                "Unknown SMS provider: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub provider: SmsProvider,
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    /// 发送方 ID 或号码
    #[serde(default)]
    pub from: String,
    #[serde(default = "default_twilio_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_sms_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl SmsConfig {
    pub fn for_provider(provider: SmsProvider) -> Self {
        Self {
            provider,
            account_sid: String::new(),
            auth_token: String::new(),
            from: String::new(),
            api_base_url: default_twilio_base_url(),
            timeout_secs: default_sms_timeout_secs(),
            app_name: default_app_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_true")]
    pub consume_on_success: bool,
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
    #[serde(default = "default_purge_grace_secs")]
    pub purge_grace_secs: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            consume_on_success: true,
            purge_interval_secs: default_purge_interval_secs(),
            purge_grace_secs: default_purge_grace_secs(),
        }
    }
}

fn default_twilio_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_sms_timeout_secs() -> u64 {
    10
}

fn default_app_name() -> String {
    "TILApp".to_string()
}

fn default_true() -> bool {
    true
}

fn default_purge_interval_secs() -> u64 {
    300
}

fn default_purge_grace_secs() -> u64 {
    3600
}

/// 宽限期上限（约 10 年），保证换算成 chrono 时长时不会溢出
pub const MAX_PURGE_GRACE_SECS: u64 = 10 * 365 * 24 * 3600;

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Without a config file everything comes from the environment.
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    AppError::ConfigError(
                        "DATABASE_URL is not set and no config.toml was found".to_string(),
                    )
                })?;

                let provider = get_env("SMS_PROVIDER")
                    .ok_or_else(|| {
                        AppError::ConfigError(
                            "SMS_PROVIDER is not set and no config.toml was found".to_string(),
                        )
                    })?
                    .parse()?;

                Config {
                    server: ServerConfig {
                        host: "0.0.0.0".to_string(),
                        port: 8080,
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: 10,
                    },
                    sms: SmsConfig::for_provider(provider),
                    verification: VerificationConfig::default(),
                }
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Unable to read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验取值范围
    pub fn validate(&self) -> AppResult<()> {
        if self.verification.purge_grace_secs > MAX_PURGE_GRACE_SECS {
            return Err(AppError::ConfigError(format!(
                "verification.purge_grace_secs must be at most {MAX_PURGE_GRACE_SECS}, got {}",
                self.verification.purge_grace_secs
            )));
        }
        Ok(())
    }

    /// 环境变量优先于配置文件
    fn apply_env_overrides(&mut self) -> AppResult<()> {
        if let Some(v) = get_env("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = get_env_parse("SERVER_PORT") {
            self.server.port = p;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = get_env_parse("DB_MAX_CONNECTIONS") {
            self.database.max_connections = mc;
        }

        if let Some(v) = get_env("SMS_PROVIDER") {
            self.sms.provider = v.parse()?;
        }
        if let Some(v) = get_env("TWILIO_ACCOUNT_SID") {
            self.sms.account_sid = v;
        }
        if let Some(v) = get_env("TWILIO_AUTH_TOKEN") {
            self.sms.auth_token = v;
        }
        if let Some(v) = get_env("SMS_FROM") {
            self.sms.from = v;
        }
        if let Some(v) = get_env("TWILIO_API_BASE_URL") {
            self.sms.api_base_url = v;
        }
        if let Some(n) = get_env_parse("SMS_TIMEOUT_SECS") {
            self.sms.timeout_secs = n;
        }
        if let Some(v) = get_env("SMS_APP_NAME") {
            self.sms.app_name = v;
        }

        if let Some(b) = get_env_parse("VERIFICATION_CONSUME_ON_SUCCESS") {
            self.verification.consume_on_success = b;
        }
        if let Some(n) = get_env_parse("VERIFICATION_PURGE_INTERVAL_SECS") {
            self.verification.purge_interval_secs = n;
        }
        if let Some(n) = get_env_parse("VERIFICATION_PURGE_GRACE_SECS") {
            self.verification.purge_grace_secs = n;
        }

        Ok(())
    }
}
