pub mod sms_verification_attempts;

pub use sms_verification_attempts as sms_verification_attempt_entity;
