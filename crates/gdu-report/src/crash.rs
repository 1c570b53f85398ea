use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use gdu_core::{CrashSignal, CRASH_MARKER, ENGINE_ERROR_PREFIX, SCRIPT_ERROR_PREFIX};

use crate::ReportError;

pub fn scan_crash(log_path: &Path) -> Result<Option<CrashSignal>, ReportError> {
    let read_error = |source| ReportError::ReadLog {
        path: log_path.to_path_buf(),
        source,
    };
    let file = File::open(log_path).map_err(read_error)?;
    scan_crash_lines(BufReader::new(file)).map_err(read_error)
}

pub fn scan_crash_lines<R: BufRead>(mut reader: R) -> io::Result<Option<CrashSignal>> {
    let mut signal = CrashSignal::default();
    let mut raw = Vec::new();

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches(['\n', '\r']);

        if line.contains(CRASH_MARKER) {
            signal.crash_lines.push(line.to_string());
        } else if line.starts_with(SCRIPT_ERROR_PREFIX) {
            signal.script_error_lines.push(line.to_string());
        } else if line.starts_with(ENGINE_ERROR_PREFIX) {
            signal.engine_error_lines.push(line.to_string());
        }
    }

    Ok(if signal.is_empty() { None } else { Some(signal) })
}
