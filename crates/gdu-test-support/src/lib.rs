use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gdu_core::{ADDON_DIR, PROJECT_MARKER_FILE, REPORTS_DIR, REPORT_FILE_NAME};
use tempfile::TempDir;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn testdata_root() -> PathBuf {
    workspace_root().join("testdata")
}

pub fn testdata_path(name: &str) -> PathBuf {
    testdata_root().join(name)
}

pub fn read_testdata(name: &str) -> String {
    fs::read_to_string(testdata_path(name)).expect("testdata file should be readable")
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Self {
        let project = Self::without_addon();
        fs::create_dir_all(project.root().join(ADDON_DIR)).expect("addon dir should be created");
        project
    }

    pub fn without_addon() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("gdu-project-")
            .tempdir()
            .expect("temp project should be created");
        write_file(&dir.path().join(PROJECT_MARKER_FILE), "config_version=5\n");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).expect("dir should be created");
        path
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        write_file(&path, content);
        path
    }

    pub fn write_report(&self, dir_name: &str, xml: &str) -> PathBuf {
        self.write(
            &format!("{}/{}/{}", REPORTS_DIR, dir_name, REPORT_FILE_NAME),
            xml,
        )
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
pub fn write_fake_engine(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    write_file(&path, &format!("#!/bin/sh\n{}\n", body));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("script permissions should update");
    path
}

#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let bytes = self.inner.lock().expect("buffer lock").clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("buffer lock poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_points_to_workspace() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn testdata_root_contains_sample_reports() {
        assert!(testdata_path("sample_results.xml").is_file());
        assert!(testdata_path("sample_crash.log").is_file());
    }

    #[test]
    fn temp_project_creates_marker_and_addon() {
        let project = TempProject::new();
        assert!(project.root().join(PROJECT_MARKER_FILE).is_file());
        assert!(project.root().join(ADDON_DIR).is_dir());

        let bare = TempProject::without_addon();
        assert!(!bare.root().join(ADDON_DIR).exists());
    }

    #[test]
    fn write_report_uses_timestamped_layout() {
        let project = TempProject::new();
        let path = project.write_report("report_1", "<testsuites/>");
        assert!(path.ends_with("reports/report_1/results.xml"));
        assert!(path.is_file());
    }

    #[test]
    fn shared_buffer_collects_writes_from_clones() {
        let buffer = SharedBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"hello ").expect("write");
        writer.write_all(b"world").expect("write");
        assert_eq!(buffer.contents(), "hello world");
    }
}
