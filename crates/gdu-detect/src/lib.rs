use std::fs;
use std::path::{Component, Path, PathBuf};

use gdu_core::{ProjectLocation, ADDON_DIR, PROJECT_MARKER_FILE, RES_SCHEME};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("no test paths provided")]
    NoPaths,
    #[error("failed to resolve the current directory: {0}")]
    CurrentDir(std::io::Error),
    #[error("cannot access path {path}: {source}")]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(
        "{} not found above {path}; point the path to a subdirectory of your Godot project",
        PROJECT_MARKER_FILE
    )]
    MarkerNotFound { path: PathBuf },
    #[error("{}/ not found under {root}", ADDON_DIR)]
    AddonMissing { root: PathBuf },
    #[error("path {path} belongs to a different Godot project ({root}), expected {expected}")]
    DifferentProject {
        path: PathBuf,
        root: PathBuf,
        expected: PathBuf,
    },
    #[error("path {path} is outside of the project root {root}")]
    OutsideProject { path: PathBuf, root: PathBuf },
}

pub fn detect_project<P: AsRef<Path>>(paths: &[P]) -> Result<ProjectLocation, DetectError> {
    let Some(first) = paths.first() else {
        return Err(DetectError::NoPaths);
    };

    let project_root = find_project_root(first.as_ref())?;
    verify_addon(&project_root)?;
    debug!(root = %project_root.display(), "resolved project root");

    let mut reference_paths = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let absolute = absolutize(path)?;
        let root = find_project_root(&absolute)?;
        if root != project_root {
            return Err(DetectError::DifferentProject {
                path: path.to_path_buf(),
                root,
                expected: project_root,
            });
        }

        let reference = to_reference_path(&project_root, &absolute)?;
        debug!(input = %path.display(), %reference, "mapped test path");
        reference_paths.push(reference);
    }

    Ok(ProjectLocation {
        project_root,
        reference_paths,
    })
}

pub fn find_project_root(path: &Path) -> Result<PathBuf, DetectError> {
    let absolute = absolutize(path)?;
    let metadata = fs::metadata(&absolute).map_err(|source| DetectError::Access {
        path: absolute.clone(),
        source,
    })?;

    let start = if metadata.is_dir() {
        absolute.as_path()
    } else {
        absolute.parent().unwrap_or(absolute.as_path())
    };

    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER_FILE).exists())
        .map(Path::to_path_buf)
        .ok_or(DetectError::MarkerNotFound { path: absolute.clone() })
}

pub fn verify_addon(project_root: &Path) -> Result<(), DetectError> {
    if project_root.join(ADDON_DIR).is_dir() {
        Ok(())
    } else {
        Err(DetectError::AddonMissing {
            root: project_root.to_path_buf(),
        })
    }
}

pub fn to_reference_path(project_root: &Path, path: &Path) -> Result<String, DetectError> {
    let relative = path
        .strip_prefix(project_root)
        .map_err(|_| DetectError::OutsideProject {
            path: path.to_path_buf(),
            root: project_root.to_path_buf(),
        })?;

    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>();

    if segments.is_empty() {
        Ok(format!("{}.", RES_SCHEME))
    } else {
        Ok(format!("{}{}", RES_SCHEME, segments.join("/")))
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, DetectError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(DetectError::CurrentDir)?
            .join(path)
    };
    Ok(normalize_lexically(&joined))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
