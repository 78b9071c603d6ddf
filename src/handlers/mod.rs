pub mod verification;

pub use verification::verification_config;
