use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{7,15}$").expect("phone regex is valid"));

/// 去掉手机号中除数字和 `+` 以外的所有字符，例如 `+1 (555) 123-4567` -> `+15551234567`
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// 校验已规范化的手机号（可选 `+` 前缀，7-15 位数字）
pub fn validate_phone(phone: &str) -> AppResult<()> {
    if !PHONE_REGEX.is_match(phone) {
        return Err(AppError::ValidationError(format!(
            "Invalid phone number: {}",
            mask_phone(phone)
        )));
    }

    Ok(())
}

/// 日志中只保留手机号后四位
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible = chars.len() - 4;
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible && c.is_ascii_digit() { '*' } else { *c })
        .collect()
}
