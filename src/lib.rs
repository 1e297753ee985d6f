mod error;
pub mod client;
pub mod command;
pub mod proto;

pub use error::*;
