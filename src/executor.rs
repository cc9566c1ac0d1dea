//! Subprocess execution with a hard wall-clock budget.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{info, warn};

/// Terminal state of one script run.
#[derive(Debug)]
pub enum ExecOutcome {
    Succeeded { stdout: String },
    Failed { exit_code: Option<i32>, stderr: String },
    TimedOut,
}

/// Run `interpreter script_path` with the workspace as its working
/// directory, capturing stdout and stderr separately. The child gets its
/// own process group so that on timeout the whole tree is killed, not
/// just the direct child. Script content is never inspected here.
pub async fn execute_script(
    interpreter: &str,
    script_path: &Path,
    workdir: &Path,
    limit: Duration,
) -> std::io::Result<ExecOutcome> {
    let mut child = Command::new(interpreter)
        .arg(script_path)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true)
        .spawn()?;

    // With process_group(0) the child's pgid equals its pid.
    let pgid = child.id().map(|pid| Pid::from_raw(pid as i32));

    // Drain both pipes concurrently so a chatty script cannot deadlock on
    // a full pipe buffer while we wait for exit.
    let mut stdout_pipe = child.stdout.take().unwrap();
    let mut stderr_pipe = child.stderr.take().unwrap();
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    let status = match tokio::time::timeout(limit, child.wait()).await {
        Err(_) => {
            if let Some(pgid) = pgid {
                if let Err(err) = killpg(pgid, Signal::SIGKILL) {
                    warn!("killpg {} failed: {}", pgid, err);
                }
            }
            let _ = child.wait().await;
            stdout_task.abort();
            stderr_task.abort();
            info!(limit_secs = limit.as_secs(), "script timed out, process group killed");
            return Ok(ExecOutcome::TimedOut);
        }
        Ok(status) => status?,
    };

    let stdout = String::from_utf8_lossy(&stdout_task.await.unwrap_or_default()).into_owned();
    let stderr = String::from_utf8_lossy(&stderr_task.await.unwrap_or_default()).into_owned();
    info!(
        exit = ?status.code(),
        stdout_len = stdout.len(),
        stderr_len = stderr.len(),
        "script finished"
    );

    if status.success() {
        Ok(ExecOutcome::Succeeded { stdout })
    } else {
        Ok(ExecOutcome::Failed {
            exit_code: status.code(),
            stderr,
        })
    }
}
