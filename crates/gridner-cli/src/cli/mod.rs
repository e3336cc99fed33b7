//! Command-line interface for gridner.

mod commands;
pub mod helpers;

pub use commands::{is_verbose, run};
