mod args;
mod capture;
mod deadline;
mod exec;
mod tail;

pub use args::build_args;
pub use capture::CapturedOutput;
pub use deadline::Deadline;
pub use exec::{run_engine, EngineRun, ExecutionOutcome};

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to create temp log file: {0}")]
    CreateSink(std::io::Error),
    #[error("failed to create stdin pipe: {0}")]
    StdinPipe(std::io::Error),
    #[error("failed to run Godot at {engine}: {source}")]
    Spawn {
        engine: PathBuf,
        source: std::io::Error,
    },
    #[error("failed waiting for Godot to exit: {0}")]
    Wait(std::io::Error),
    #[error("Godot process timed out after {timeout:?}")]
    TimedOut { timeout: Duration },
}
