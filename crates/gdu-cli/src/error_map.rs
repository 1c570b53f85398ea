use std::fmt::Display;

use gdu_core::ToolError;
use gdu_detect::DetectError;
use gdu_report::ReportError;
use gdu_runner::RunnerError;

use crate::ConfigError;

fn map_error(code: &'static str, error: impl Display) -> ToolError {
    ToolError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: ToolError) -> i32 {
    eprintln!("error[{}]: {}", error.code, error.message);
    2
}

pub(crate) fn map_config(error: ConfigError) -> ToolError {
    let code = match &error {
        ConfigError::NotExecutable { .. } => "CONFIG_GODOT_NOT_EXECUTABLE",
        ConfigError::NotFound => "CONFIG_GODOT_NOT_FOUND",
    };
    map_error(code, error)
}

pub(crate) fn map_detect(error: DetectError) -> ToolError {
    let code = match &error {
        DetectError::NoPaths => "DETECT_NO_PATHS",
        DetectError::CurrentDir(_) => "DETECT_CURRENT_DIR",
        DetectError::Access { .. } => "DETECT_ACCESS",
        DetectError::MarkerNotFound { .. } => "DETECT_MARKER_NOT_FOUND",
        DetectError::AddonMissing { .. } => "DETECT_ADDON_MISSING",
        DetectError::DifferentProject { .. } | DetectError::OutsideProject { .. } => {
            "DETECT_DIFFERENT_PROJECT"
        }
    };
    map_error(code, error)
}

pub(crate) fn map_runner(error: RunnerError) -> ToolError {
    let code = match &error {
        RunnerError::CreateSink(_) => "RUN_CREATE_SINK",
        RunnerError::StdinPipe(_) => "RUN_STDIN_PIPE",
        RunnerError::Spawn { .. } => "RUN_SPAWN",
        RunnerError::Wait(_) => "RUN_WAIT",
        RunnerError::TimedOut { .. } => "RUN_TIMEOUT",
    };
    map_error(code, error)
}

pub(crate) fn map_report(error: ReportError) -> ToolError {
    let code = match &error {
        ReportError::ReadLog { .. } => "REPORT_READ_LOG",
        ReportError::ReportNotFound { .. } => "REPORT_NOT_FOUND",
        ReportError::ReadReport { .. } => "REPORT_READ",
        ReportError::ParseReport { .. } => "REPORT_PARSE",
        ReportError::WriteJson(_) => "REPORT_WRITE_JSON",
    };
    map_error(code, error)
}
