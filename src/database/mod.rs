pub mod attempt_store;
pub mod connection;
pub mod memory_store;

pub use attempt_store::*;
pub use connection::*;
pub use memory_store::*;
