mod crash;
mod failures;
mod junit;
mod locate;
mod output;

pub use crash::{scan_crash, scan_crash_lines};
pub use failures::{extract_failure, extract_failures};
pub use junit::{parse_report_str, parse_report_xml};
pub use locate::find_report_xml;
pub use output::{build_output, missing_report_output, write_json};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read log file {path}: {source}")]
    ReadLog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no report file found matching: {pattern}")]
    ReportNotFound { pattern: String },
    #[error("failed to read report {path}: {source}")]
    ReadReport {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse report {path}: {message}")]
    ParseReport { path: PathBuf, message: String },
    #[error("failed to write JSON: {0}")]
    WriteJson(serde_json::Error),
}
