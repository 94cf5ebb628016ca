//! Output formatting module
//!
//! Live console lines and end-of-run report formats.

pub mod console;
mod formatter;

pub use formatter::{write_report_to_file, OutputFormat, ResultFormatter};
