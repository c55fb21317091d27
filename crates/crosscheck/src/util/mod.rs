//! Utility modules

pub mod format;
pub mod io;
