pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod plan;

pub use batch::{BatchReport, process_all_files};
pub use config::FormatConfig;
pub use error::FormatError;
pub use format::{FileOutcome, Palette, format_workbook};
