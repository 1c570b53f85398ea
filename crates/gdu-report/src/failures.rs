use std::sync::LazyLock;

use gdu_core::{FailureRecord, SuiteReport, TestCaseRecord};
use regex::Regex;

static FAILED_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"FAILED:\s*(res://[^:]+):(\d+)").expect("failure location regex must compile")
});

static EXPECTED_ACTUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Expected\s+'([^']*)'\s+but was\s+'([^']*)'")
        .expect("expected/actual regex must compile")
});

pub fn extract_failures(report: &SuiteReport) -> Vec<FailureRecord> {
    report.cases.iter().filter_map(extract_failure).collect()
}

pub fn extract_failure(case: &TestCaseRecord) -> Option<FailureRecord> {
    let fault = case.fault()?;
    let mut record = FailureRecord {
        class: case.class_name.clone(),
        method: case.method_name.clone(),
        message: fault.message.clone(),
        ..FailureRecord::default()
    };

    if let Some(caps) = FAILED_LOCATION.captures(&fault.message) {
        record.file = caps[1].to_string();
        record.line = caps[2].parse().unwrap_or_default();
    }

    if let Some(caps) = EXPECTED_ACTUAL.captures(fault.body.trim()) {
        record.expected = caps[1].to_string();
        record.actual = caps[2].to_string();
    }

    Some(record)
}
