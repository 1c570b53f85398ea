use std::io::Write;

use gdu_core::{AggregateOutput, ToolError};
use gdu_detect::detect_project;
use gdu_report::{
    build_output, find_report_xml, missing_report_output, parse_report_xml, scan_crash,
    ReportError,
};
use gdu_runner::{run_engine, EngineRun};
use tracing::{info, warn};

use crate::{map_detect, map_report, map_runner, RunnerConfig};

pub(crate) fn run_pipeline(
    config: &RunnerConfig,
    live_output: Option<Box<dyn Write + Send>>,
) -> Result<AggregateOutput, ToolError> {
    let location = detect_project(config.test_paths.as_slice()).map_err(map_detect)?;
    info!(
        root = %location.project_root.display(),
        paths = ?location.reference_paths,
        "detected Godot project"
    );

    let outcome = run_engine(EngineRun {
        engine: &config.godot_path,
        project_dir: &location.project_root,
        reference_paths: &location.reference_paths,
        timeout: config.timeout,
        live_output,
    })
    .map_err(map_runner)?;

    let crash = scan_crash(outcome.captured.path()).map_err(map_report);
    let result = crash.and_then(|crash| {
        if let Some(crash) = &crash {
            warn!(
                crash_lines = crash.crash_lines.len(),
                script_errors = crash.script_error_lines.len(),
                engine_errors = crash.engine_error_lines.len(),
                "crash indicators found in Godot output"
            );
        }

        match find_report_xml(&location.project_root) {
            Ok(report_path) => {
                info!(report = %report_path.display(), "parsing test report");
                let report = parse_report_xml(&report_path).map_err(map_report)?;
                Ok(build_output(Some(&report), crash.as_ref()))
            }
            Err(ReportError::ReportNotFound { .. }) if crash.is_some() => {
                Ok(build_output(None, crash.as_ref()))
            }
            Err(ReportError::ReportNotFound { .. }) => {
                warn!(
                    exit_code = outcome.exit_code,
                    "Godot produced no test report"
                );
                Ok(missing_report_output())
            }
            Err(error) => Err(map_report(error)),
        }
    });

    if let Err(error) = outcome.captured.release() {
        warn!(%error, "failed to remove captured Godot output");
    }
    result
}
