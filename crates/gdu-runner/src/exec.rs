use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::Duration;

use tracing::{info, warn};

use crate::deadline::{wait_with_deadline, WaitOutcome};
use crate::tail::Tailer;
use crate::{build_args, CapturedOutput, Deadline, RunnerError};

pub struct EngineRun<'a> {
    pub engine: &'a Path,
    pub project_dir: &'a Path,
    pub reference_paths: &'a [String],
    pub timeout: Option<Duration>,
    pub live_output: Option<Box<dyn Write + Send>>,
}

#[derive(Debug)]
pub struct ExecutionOutcome {
    pub exit_code: i32,
    pub captured: CapturedOutput,
}

/// Stdout and stderr go straight to the capture file instead of pipes:
/// processes started by the engine inherit the handles and may keep them
/// open after the engine exits, which would block a pipe reader forever.
/// Stdin is the read end of a pipe whose writer is already closed, so the
/// engine's debugger sees a real end-of-file instead of prompting forever.
pub fn run_engine(run: EngineRun<'_>) -> Result<ExecutionOutcome, RunnerError> {
    let (sink, captured) = CapturedOutput::create()?;
    run_with_capture(run, sink, captured)
}

// Every early return drops `captured`, which deletes the file.
fn run_with_capture(
    run: EngineRun<'_>,
    sink: File,
    captured: CapturedOutput,
) -> Result<ExecutionOutcome, RunnerError> {
    let args = build_args(run.reference_paths);
    let sink_for_stderr = sink.try_clone().map_err(RunnerError::CreateSink)?;

    let (stdin_reader, stdin_writer) = std::io::pipe().map_err(RunnerError::StdinPipe)?;
    drop(stdin_writer);

    let mut command = Command::new(run.engine);
    command
        .args(&args)
        .current_dir(run.project_dir)
        .stdin(stdin_reader)
        .stdout(sink)
        .stderr(sink_for_stderr);

    let tailer = run
        .live_output
        .and_then(|output| Tailer::spawn(captured.path().to_path_buf(), output));

    info!(
        engine = %run.engine.display(),
        project = %run.project_dir.display(),
        ?args,
        "starting Godot"
    );
    let spawned = command.spawn();
    // Drops the parent's copies of the sink and stdin handles.
    drop(command);

    let mut child = match spawned {
        Ok(child) => child,
        Err(source) => {
            if let Some(tailer) = tailer {
                tailer.finish();
            }
            return Err(RunnerError::Spawn {
                engine: run.engine.to_path_buf(),
                source,
            });
        }
    };

    let deadline = Deadline::from_timeout(run.timeout);
    let waited = wait_with_deadline(&mut child, deadline);

    if let Some(tailer) = tailer {
        tailer.finish();
    }

    match waited.map_err(RunnerError::Wait)? {
        WaitOutcome::Exited(status) => {
            let exit_code = exit_code_of(status);
            info!(exit_code, "Godot exited");
            Ok(ExecutionOutcome {
                exit_code,
                captured,
            })
        }
        WaitOutcome::Expired => {
            let timeout = deadline.map(|deadline| deadline.timeout()).unwrap_or_default();
            warn!(?timeout, "Godot exceeded its deadline and was killed");
            Err(RunnerError::TimedOut { timeout })
        }
    }
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            warn!(signal, "Godot was terminated by a signal");
        }
    }
    -1
}

#[cfg(all(test, unix))]
mod exec_tests {
    use super::*;

    use std::time::Instant;

    use gdu_test_support::{write_fake_engine, SharedBuffer, TempProject};

    fn read_log(outcome: &ExecutionOutcome) -> String {
        let bytes = std::fs::read(outcome.captured.path()).expect("read log");
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn capture_dir_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).expect("read capture dir").count()
    }

    fn refs(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|path| path.to_string()).collect()
    }

    fn run_script(
        project: &TempProject,
        body: &str,
        timeout: Option<Duration>,
        live_output: Option<Box<dyn Write + Send>>,
    ) -> Result<ExecutionOutcome, RunnerError> {
        let bin_dir = tempfile::tempdir().expect("bin dir");
        let engine = write_fake_engine(bin_dir.path(), "fake-godot.sh", body);
        let reference_paths = refs(&["res://tests"]);
        run_engine(EngineRun {
            engine: &engine,
            project_dir: project.root(),
            reference_paths: &reference_paths,
            timeout,
            live_output,
        })
    }

    #[test]
    fn captures_stdout_and_stderr_in_one_file() {
        let project = TempProject::new();
        let outcome = run_script(
            &project,
            "echo 'hello from godot'\necho 'error line' >&2\nexit 0",
            None,
            None,
        )
        .expect("run should pass");

        assert_eq!(outcome.exit_code, 0);
        let log = read_log(&outcome);
        assert!(log.contains("hello from godot"));
        assert!(log.contains("error line"));
        outcome.captured.release().expect("release");
    }

    #[test]
    fn exit_code_is_passed_through() {
        let project = TempProject::new();
        let outcome =
            run_script(&project, "echo 'test failed'\nexit 100", None, None).expect("run");
        assert_eq!(outcome.exit_code, 100);
        assert!(outcome.captured.path().exists());
    }

    #[test]
    fn engine_receives_arguments_and_runs_in_project_dir() {
        let project = TempProject::new();
        let outcome = run_script(
            &project,
            "for arg in \"$@\"; do echo \"arg:$arg\"; done\ntest -f project.godot && echo in-project",
            None,
            None,
        )
        .expect("run should pass");

        let log = read_log(&outcome);
        let args = log
            .lines()
            .filter_map(|line| line.strip_prefix("arg:"))
            .collect::<Vec<_>>();
        assert_eq!(args, build_args(&["res://tests"]));
        assert!(log.contains("in-project"));
    }

    #[test]
    fn stdin_reports_end_of_file_immediately() {
        let project = TempProject::new();
        let outcome = run_script(
            &project,
            "if read -r line; then echo stdin:data; else echo stdin:eof; fi",
            Some(Duration::from_secs(10)),
            None,
        )
        .expect("run should pass");

        let log = read_log(&outcome);
        assert!(log.contains("stdin:eof"), "log was: {log}");
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let project = TempProject::new();
        let reference_paths = refs(&["res://tests"]);
        let error = run_engine(EngineRun {
            engine: Path::new("/nonexistent/godot"),
            project_dir: project.root(),
            reference_paths: &reference_paths,
            timeout: None,
            live_output: Some(Box::new(SharedBuffer::new())),
        })
        .expect_err("spawn should fail");
        assert!(matches!(error, RunnerError::Spawn { .. }));
    }

    #[test]
    fn spawn_failure_removes_capture_file() {
        let project = TempProject::new();
        let capture_dir = tempfile::tempdir().expect("capture dir");
        let (sink, captured) = CapturedOutput::create_in(capture_dir.path()).expect("sink");
        assert_eq!(capture_dir_entries(capture_dir.path()), 1);

        let reference_paths = refs(&["res://tests"]);
        let error = run_with_capture(
            EngineRun {
                engine: Path::new("/nonexistent/godot"),
                project_dir: project.root(),
                reference_paths: &reference_paths,
                timeout: None,
                live_output: Some(Box::new(SharedBuffer::new())),
            },
            sink,
            captured,
        )
        .expect_err("spawn should fail");

        assert!(matches!(error, RunnerError::Spawn { .. }));
        assert_eq!(capture_dir_entries(capture_dir.path()), 0);
    }

    #[test]
    fn timed_out_run_removes_capture_file() {
        let project = TempProject::new();
        let bin_dir = tempfile::tempdir().expect("bin dir");
        let engine = write_fake_engine(bin_dir.path(), "fake-godot.sh", "exec sleep 5");
        let capture_dir = tempfile::tempdir().expect("capture dir");
        let (sink, captured) = CapturedOutput::create_in(capture_dir.path()).expect("sink");

        let reference_paths = refs(&["res://tests"]);
        let error = run_with_capture(
            EngineRun {
                engine: &engine,
                project_dir: project.root(),
                reference_paths: &reference_paths,
                timeout: Some(Duration::from_millis(200)),
                live_output: None,
            },
            sink,
            captured,
        )
        .expect_err("run should time out");

        assert!(matches!(error, RunnerError::TimedOut { .. }));
        assert_eq!(capture_dir_entries(capture_dir.path()), 0);
    }

    #[test]
    fn oversized_timeout_does_not_abort_the_run() {
        let project = TempProject::new();
        let outcome = run_script(
            &project,
            "echo ok",
            Some(Duration::from_secs(u64::MAX)),
            None,
        )
        .expect("run should pass");
        assert_eq!(outcome.exit_code, 0);
        assert!(read_log(&outcome).contains("ok"));
    }

    #[test]
    fn deadline_kills_slow_engine() {
        let project = TempProject::new();
        let started = Instant::now();
        let error = run_script(
            &project,
            "exec sleep 5",
            Some(Duration::from_millis(200)),
            None,
        )
        .expect_err("run should time out");

        let RunnerError::TimedOut { timeout } = error else {
            panic!("expected timeout, got {error:?}");
        };
        assert_eq!(timeout, Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn background_descendants_do_not_block_completion() {
        let project = TempProject::new();
        let started = Instant::now();
        let outcome = run_script(&project, "sleep 5 &\necho done", None, None)
            .expect("run should pass");

        assert_eq!(outcome.exit_code, 0);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn verbose_run_forwards_full_output() {
        let project = TempProject::new();
        let buffer = SharedBuffer::new();
        let outcome = run_script(
            &project,
            "i=0\nwhile [ $i -lt 200 ]; do echo line-$i; i=$((i+1)); done\necho last >&2",
            None,
            Some(Box::new(buffer.clone())),
        )
        .expect("run should pass");

        let log = read_log(&outcome);
        assert_eq!(buffer.contents(), log);
        assert!(log.contains("line-199"));
        assert!(log.ends_with("last\n"));
    }
}
