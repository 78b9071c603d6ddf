pub mod common;
pub mod verification;

pub use common::*;
pub use verification::*;
