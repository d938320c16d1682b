//! Bounded subprocess execution
//!
//! Spawns a child in its own process group with piped stdio, feeds it the
//! supplied stdin content, and waits under a wall-clock ceiling. On a
//! ceiling breach the whole process group is SIGKILLed (`kill_on_drop`
//! reaps the direct child as a backstop) and the outcome is `TimedOut`;
//! captured output is not preserved across a timeout.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Ceiling for toolchain version probes.
pub const PROBE_CEILING: Duration = Duration::from_secs(2);
/// Ceiling for managed-bytecode compile and run stages.
pub const BYTECODE_CEILING: Duration = Duration::from_secs(10);
/// Ceiling for every other compile and run stage.
pub const DEFAULT_CEILING: Duration = Duration::from_secs(30);

/// Raw outcome of a completed child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(ProcessOutput),
    TimedOut,
}

/// Run a command to completion under `ceiling`. Spawn failures (missing
/// binary) surface as `Err`; everything the child does, including a
/// non-zero exit, is a `Completed` outcome.
pub async fn run_with_timeout(
    program: impl AsRef<OsStr>,
    args: &[impl AsRef<OsStr>],
    dir: Option<&Path>,
    stdin: Option<&str>,
    ceiling: Duration,
) -> std::io::Result<RunOutcome> {
    let mut cmd = Command::new(&program);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    debug!(program = ?program.as_ref(), ?ceiling, "spawning child process");
    let mut child = cmd.spawn()?;
    let pid = child.id();
    let stdin_pipe = child.stdin.take();

    // Feed stdin concurrently with the wait, inside the timed section: a
    // child that never drains its stdin must not stall the ceiling. The
    // child may also exit before reading, so a broken pipe is not an
    // error; the pipe is dropped either way to signal end of input.
    let feed = async {
        if let Some(mut pipe) = stdin_pipe {
            if let Some(content) = stdin {
                let _ = pipe.write_all(content.as_bytes()).await;
            }
            drop(pipe);
        }
    };

    let fed_wait = async { tokio::join!(feed, child.wait_with_output()).1 };
    match tokio::time::timeout(ceiling, fed_wait).await {
        Ok(output) => {
            let output = output?;
            Ok(RunOutcome::Completed(ProcessOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }))
        }
        Err(_) => {
            debug!(?pid, "ceiling breached, killing process group");
            if let Some(pid) = pid {
                kill_process_group(pid);
            }
            Ok(RunOutcome::TimedOut)
        }
    }
}

/// SIGKILL an entire process group. The group may already be reaped, so
/// delivery failure is ignored.
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}
