use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gdu_core::{GODOT_BINARY_NAME, GODOT_PATH_ENV};
use thiserror::Error;

use crate::Cli;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Godot binary not found or not executable: {path}")]
    NotExecutable { path: PathBuf },
    #[error("Godot binary not found; set --godot-path or {}", GODOT_PATH_ENV)]
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunnerConfig {
    pub(crate) test_paths: Vec<String>,
    pub(crate) godot_path: PathBuf,
    pub(crate) verbose: bool,
    pub(crate) timeout: Option<Duration>,
}

impl RunnerConfig {
    pub(crate) fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let godot_path = resolve_godot_path(
            cli.godot_path,
            std::env::var(GODOT_PATH_ENV).ok(),
            || which::which(GODOT_BINARY_NAME).ok(),
        )?;
        Ok(Self::with_engine(cli.paths, godot_path, cli.verbose, cli.timeout))
    }

    pub(crate) fn with_engine(
        test_paths: Vec<String>,
        godot_path: PathBuf,
        verbose: bool,
        timeout: Option<Duration>,
    ) -> Self {
        let test_paths = if test_paths.is_empty() {
            vec![".".to_string()]
        } else {
            test_paths
        };
        Self {
            test_paths,
            godot_path,
            verbose,
            timeout: timeout.filter(|timeout| !timeout.is_zero()),
        }
    }
}

/// An explicit flag or environment value is never skipped in favour of a
/// later source, even when it does not point to an executable.
pub(crate) fn resolve_godot_path(
    flag: Option<PathBuf>,
    env_value: Option<String>,
    path_lookup: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let explicit = flag.or_else(|| env_value.filter(|value| !value.is_empty()).map(PathBuf::from));
    if let Some(path) = explicit {
        return if is_executable(&path) {
            Ok(path)
        } else {
            Err(ConfigError::NotExecutable { path })
        };
    }

    path_lookup().ok_or(ConfigError::NotFound)
}

pub(crate) fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
