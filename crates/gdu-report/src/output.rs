use std::io::Write;

use gdu_core::{AggregateOutput, CrashSignal, RunStatus, Summary, SuiteReport};

use crate::{extract_failures, ReportError};

pub fn build_output(report: Option<&SuiteReport>, crash: Option<&CrashSignal>) -> AggregateOutput {
    let (total, failed) = report.map_or((0, 0), |report| {
        (report.total, report.failures.saturating_add(report.errors))
    });
    let crashed = crash.is_some();
    let status = if crashed {
        RunStatus::Crashed
    } else if failed > 0 {
        RunStatus::Failed
    } else {
        RunStatus::Passed
    };

    AggregateOutput {
        summary: Summary {
            total,
            passed: total.saturating_sub(failed),
            failed,
            crashed,
            status,
        },
        crash_details: crash.map(CrashSignal::details),
        failures: report.map(extract_failures).unwrap_or_default(),
    }
}

pub fn missing_report_output() -> AggregateOutput {
    let mut output = build_output(None, None);
    output.summary.status = RunStatus::NoReport;
    output
}

pub fn write_json<W: Write>(mut writer: W, output: &AggregateOutput) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, output).map_err(ReportError::WriteJson)?;
    writer
        .write_all(b"\n")
        .map_err(|error| ReportError::WriteJson(serde_json::Error::io(error)))
}
