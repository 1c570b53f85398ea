use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    pub project_root: PathBuf,
    pub reference_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrashSignal {
    pub crash_lines: Vec<String>,
    pub script_error_lines: Vec<String>,
    pub engine_error_lines: Vec<String>,
}

impl CrashSignal {
    pub fn is_empty(&self) -> bool {
        self.crash_lines.is_empty()
            && self.script_error_lines.is_empty()
            && self.engine_error_lines.is_empty()
    }

    pub fn details(&self) -> CrashDetails {
        CrashDetails {
            crash_info: join_lines(&self.crash_lines),
            script_errors: join_lines(&self.script_error_lines),
            engine_errors: join_lines(&self.engine_error_lines),
        }
    }
}

fn join_lines(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub total: u32,
    pub failures: u32,
    pub errors: u32,
    pub cases: Vec<TestCaseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCaseRecord {
    pub suite: String,
    pub class_name: String,
    pub method_name: String,
    pub failure: Option<CaseFault>,
    pub error: Option<CaseFault>,
}

impl TestCaseRecord {
    /// The `<error>` payload wins when a malformed case carries both.
    pub fn fault(&self) -> Option<&CaseFault> {
        self.error.as_ref().or(self.failure.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFault {
    pub message: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub class: String,
    pub method: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub expected: String,
    #[serde(default)]
    pub actual: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Passed,
    Failed,
    Crashed,
    NoReport,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
            Self::Crashed | Self::NoReport => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub crashed: bool,
    pub status: RunStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_errors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_errors: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOutput {
    pub summary: Summary,
    pub crash_details: Option<CrashDetails>,
    pub failures: Vec<FailureRecord>,
}
