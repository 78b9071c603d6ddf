use rand::Rng;
use rand::rngs::OsRng;

pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// 生成指定长度的数字验证码，每一位独立均匀取自操作系统随机源
pub fn generate_numeric_code(length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + OsRng.gen_range(0..10u8)))
        .collect()
}
