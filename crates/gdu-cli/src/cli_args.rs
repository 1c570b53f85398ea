use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "gdunit4-test-runner")]
#[command(about = "Run gdUnit4 tests headlessly with Godot and print JSON results")]
#[command(disable_version_flag = true)]
pub(crate) struct Cli {
    /// Path to the Godot binary (falls back to GODOT_PATH, then `godot` on PATH)
    #[arg(long = "godot-path")]
    pub(crate) godot_path: Option<PathBuf>,
    /// Stream Godot output to stderr while it runs
    #[arg(long)]
    pub(crate) verbose: bool,
    /// Kill Godot after this duration (e.g. 30s, 500ms, 1m30s); 0 means no timeout
    #[arg(long, value_parser = parse_timeout)]
    pub(crate) timeout: Option<Duration>,
    /// Print version and exit
    #[arg(long)]
    pub(crate) version: bool,
    /// Test directories or files; defaults to the current directory
    #[arg(value_name = "PATHS")]
    pub(crate) paths: Vec<String>,
}

pub(crate) fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if raw == "0" {
        return Ok(Duration::ZERO);
    }
    if raw.is_empty() {
        return Err("empty duration".to_string());
    }

    let invalid = || format!("invalid duration \"{}\"; use e.g. 30s, 500ms, 2m, 1h", raw);
    let mut total = Duration::ZERO;
    let mut rest = raw;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(invalid());
        }
        let value = rest[..digits_end].parse::<u64>().map_err(|_| invalid())?;
        rest = &rest[digits_end..];

        let unit_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let part = match &rest[..unit_end] {
            "ms" => Some(Duration::from_millis(value)),
            "s" => Some(Duration::from_secs(value)),
            "m" => value.checked_mul(60).map(Duration::from_secs),
            "h" => value.checked_mul(3600).map(Duration::from_secs),
            _ => return Err(invalid()),
        };
        rest = &rest[unit_end..];

        total = part
            .and_then(|part| total.checked_add(part))
            .ok_or_else(invalid)?;
    }

    Ok(total)
}
