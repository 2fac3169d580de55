//! Output formatters for verification results

pub mod console;
pub mod formatter;
