//! Command-line front end for `crosscheck_core`
//!
//! Loads a YAML scenario, applies parameter flags, runs the requested analysis
//! and prints a text table or JSON document.

pub mod cli;
pub mod commands;
pub mod data;
pub mod logging;
pub mod report;
pub mod util;

pub use cli::Cli;
pub use commands::execute;
pub use logging::init_logging;
