use std::path::{Path, PathBuf};
use std::time::SystemTime;

use gdu_core::{REPORTS_DIR, REPORT_DIR_PREFIX, REPORT_FILE_NAME};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::ReportError;

pub fn find_report_xml(project_root: &Path) -> Result<PathBuf, ReportError> {
    let reports_dir = project_root.join(REPORTS_DIR);
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in WalkDir::new(&reports_dir)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(is_report_file)
    {
        let Some(modified) = entry
            .metadata()
            .ok()
            .and_then(|meta| meta.modified().ok())
        else {
            continue;
        };
        if newest.as_ref().map_or(true, |(current, _)| modified > *current) {
            newest = Some((modified, entry.into_path()));
        }
    }

    match newest {
        Some((_, path)) => {
            debug!(report = %path.display(), "selected report");
            Ok(path)
        }
        None => Err(ReportError::ReportNotFound {
            pattern: reports_dir
                .join(format!("{}*", REPORT_DIR_PREFIX))
                .join(REPORT_FILE_NAME)
                .display()
                .to_string(),
        }),
    }
}

fn is_report_file(entry: &DirEntry) -> bool {
    if !entry.file_type().is_file() || entry.file_name() != REPORT_FILE_NAME {
        return false;
    }
    entry
        .path()
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(REPORT_DIR_PREFIX))
}
