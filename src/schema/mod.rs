//! Schema module - Recipe data model, configuration and run result types.

mod config;
mod evolution;
mod recipe;

pub use config::*;
pub use evolution::*;
pub use recipe::*;
