//! CLI command implementations

mod generate;
mod worker;

pub use generate::generate;
pub use worker::worker;
