//! Blocking subprocess execution with a hard deadline.

use crate::error::{GhiError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Exit status and captured output of a finished subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Locate `program`: a bare name is searched on `PATH`, a path such as
/// `./tools/gh` is resolved against `base` instead of the process cwd.
pub fn find_program(program: &str, base: &Path) -> Option<PathBuf> {
    let base = std::path::absolute(base).ok()?;
    which::which_in(program, std::env::var_os("PATH"), base).ok()
}

/// Run `cmd` to completion, capturing stdout and stderr, killing it once
/// `timeout` elapses.
///
/// Stdout/stderr are drained on dedicated threads so a chatty child cannot
/// block on a full pipe, and the wait happens on a third thread so the
/// deadline is enforced with `recv_timeout` instead of polling.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<Captured> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!(
        program = %program,
        args = ?cmd.get_args().collect::<Vec<_>>(),
        "spawning"
    );

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| GhiError::ToolSpawnFailed {
            program: program.clone(),
            reason: e.to_string(),
        })?;

    let child_pid = child.id();
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(mut r) = stdout_handle {
            let _ = r.read_to_end(&mut buf);
        }
        buf
    });
    let stderr_thread = std::thread::spawn(move || -> String {
        let mut buf = Vec::new();
        if let Some(mut r) = stderr_handle {
            let _ = r.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    });

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(child.wait());
    });

    let status = match rx.recv_timeout(timeout) {
        Ok(result) => result.map_err(|e| GhiError::ToolSpawnFailed {
            program: program.clone(),
            reason: format!("wait failed: {e}"),
        })?,
        Err(_) => {
            // Reader threads see EOF once the killed process is reaped.
            kill_process(child_pid);
            tracing::warn!(program = %program, secs = timeout.as_secs(), "timed out");
            return Err(GhiError::ToolTimeout {
                program,
                secs: timeout.as_secs(),
            });
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();
    tracing::debug!(program = %program, code = ?status.code(), "exited");

    Ok(Captured {
        code: status.code(),
        stdout,
        stderr,
    })
}

/// Best-effort SIGKILL by PID; errors are ignored.
#[cfg(unix)]
fn kill_process(pid: u32) {
    let _ = Command::new("kill")
        .arg("-9")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(windows)]
fn kill_process(pid: u32) {
    let _ = Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_output_and_exit_code() {
        let out = run_with_timeout(
            sh("printf 'hello'; echo oops >&2; exit 3"),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(out.code, Some(3));
        assert!(!out.success());
        assert_eq!(out.stdout, b"hello");
        assert_eq!(out.stderr_trimmed(), "oops");
    }

    #[test]
    fn success_on_zero_exit() {
        let out = run_with_timeout(sh("true"), Duration::from_secs(10)).unwrap();
        assert!(out.success());
        assert!(out.stdout.is_empty());
    }

    #[test]
    fn large_output_does_not_deadlock() {
        let out = run_with_timeout(
            sh("i=0; while [ $i -lt 20000 ]; do echo 0123456789; i=$((i+1)); done"),
            Duration::from_secs(30),
        )
        .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.len(), 20000 * 11);
    }

    #[test]
    fn slow_process_times_out() {
        let start = Instant::now();
        let err = run_with_timeout(sh("sleep 10"), Duration::from_millis(300)).unwrap_err();
        assert!(matches!(err, GhiError::ToolTimeout { .. }), "got {err:?}");
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let cmd = Command::new("ghi-definitely-not-a-real-program");
        let err = run_with_timeout(cmd, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, GhiError::ToolSpawnFailed { .. }), "got {err:?}");
    }
}
