pub mod code_generator;
pub mod phone;

pub use code_generator::{VERIFICATION_CODE_LENGTH, generate_numeric_code};
pub use phone::*;
