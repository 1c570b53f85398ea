use std::ffi::OsString;

use clap::Parser;
use gdu_core::{version_string, ToolError};

mod cli_args;
mod config;
mod error_map;
mod logging;
mod pipeline;

pub(crate) use cli_args::Cli;
#[cfg(test)]
pub(crate) use cli_args::parse_timeout;
#[cfg(test)]
pub(crate) use config::resolve_godot_path;
pub(crate) use config::{ConfigError, RunnerConfig};
pub(crate) use error_map::{emit_error, map_config, map_detect, map_report, map_runner};
pub(crate) use pipeline::run_pipeline;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    if cli.version {
        eprintln!("gdunit4-test-runner {}", version_string());
        return 0;
    }

    logging::init(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, ToolError> {
    let config = RunnerConfig::from_cli(cli).map_err(map_config)?;
    let live_output = config
        .verbose
        .then(|| Box::new(std::io::stderr()) as Box<dyn std::io::Write + Send>);

    let output = run_pipeline(&config, live_output)?;
    gdu_report::write_json(std::io::stdout().lock(), &output).map_err(map_report)?;
    Ok(output.summary.status.exit_code())
}
