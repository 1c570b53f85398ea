pub const PROJECT_MARKER_FILE: &str = "project.godot";
pub const ADDON_DIR: &str = "addons/gdUnit4";
pub const RES_SCHEME: &str = "res://";
pub const CMD_TOOL_SCRIPT: &str = "res://addons/gdUnit4/bin/GdUnitCmdTool.gd";

pub const REPORTS_DIR: &str = "reports";
pub const REPORT_DIR_PREFIX: &str = "report_";
pub const REPORT_FILE_NAME: &str = "results.xml";

pub const CRASH_MARKER: &str = "handle_crash:";
pub const SCRIPT_ERROR_PREFIX: &str = "SCRIPT ERROR:";
pub const ENGINE_ERROR_PREFIX: &str = "ERROR:";

pub const GODOT_PATH_ENV: &str = "GODOT_PATH";
pub const GODOT_BINARY_NAME: &str = "godot";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    match option_env!("GDUNIT_RUNNER_BUILD") {
        Some(build) if !build.is_empty() => format!("{VERSION}+{build}"),
        _ => VERSION.to_string(),
    }
}
