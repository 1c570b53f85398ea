use std::fs::File;
use std::io;
use std::path::Path;

use tempfile::TempPath;

use crate::RunnerError;

const SINK_PREFIX: &str = "gdunit4-runner-";
const SINK_SUFFIX: &str = ".log";

#[derive(Debug)]
pub struct CapturedOutput {
    path: TempPath,
}

impl CapturedOutput {
    pub(crate) fn create() -> Result<(File, Self), RunnerError> {
        Self::create_in(&std::env::temp_dir())
    }

    pub(crate) fn create_in(dir: &Path) -> Result<(File, Self), RunnerError> {
        let (file, path) = tempfile::Builder::new()
            .prefix(SINK_PREFIX)
            .suffix(SINK_SUFFIX)
            .tempfile_in(dir)
            .map_err(RunnerError::CreateSink)?
            .into_parts();
        Ok((file, Self { path }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(self) -> io::Result<()> {
        self.path.close()
    }
}
