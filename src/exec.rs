use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::AppError;

/// Captured result of one external command invocation
#[derive(Debug, Clone, Default)]
pub struct CmdOutput {
    /// Exit code; `None` when the command was killed after its timeout
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout and stderr joined, for phrase scanning
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Narrow capability for invoking external tools, so workflows can be
/// tested against a fake implementation
pub trait CommandRunner {
    fn run(
        &self,
        argv: &[&str],
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CmdOutput, AppError>;
}

/// Runs commands through `std::process`, polling with a deadline and
/// killing the child when the timeout elapses
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        argv: &[&str],
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CmdOutput, AppError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| AppError::Validation("empty command line".to_string()))?;

        log::debug!("running: {}", argv.join(" "));

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::ToolMissing(program.to_string())
            } else {
                AppError::Io(e)
            }
        })?;

        // Pipes are drained on threads so a chatty child cannot block on a
        // full pipe buffer while we poll for exit.
        let stdout_handle = spawn_reader(child.stdout.take());
        let stderr_handle = spawn_reader(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status.code();
            }
            if Instant::now() >= deadline {
                log::warn!("command timed out after {:?}: {}", timeout, argv.join(" "));
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
            thread::sleep(Duration::from_millis(50));
        };

        Ok(CmdOutput {
            status,
            stdout: join_reader(stdout_handle),
            stderr: join_reader(stderr_handle),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn join_reader(handle: JoinHandle<Vec<u8>>) -> String {
    String::from_utf8_lossy(&handle.join().unwrap_or_default()).into_owned()
}

/// Checks that an SSH client is installed
pub fn ssh_available(runner: &dyn CommandRunner) -> Result<(), AppError> {
    let out = runner.run(&["ssh", "-V"], None, Duration::from_secs(20))?;
    if out.success() {
        Ok(())
    } else {
        Err(AppError::ToolMissing("ssh".to_string()))
    }
}

/// Probes SSH authentication for a host alias. GitHub closes the
/// connection with a nonzero exit even on success, so only the output
/// phrase counts.
pub fn ssh_auth_probe(runner: &dyn CommandRunner, host_alias: &str) -> bool {
    let target = format!("git@{host_alias}");
    match runner.run(&["ssh", "-T", &target], None, Duration::from_secs(30)) {
        Ok(out) => out
            .combined()
            .to_lowercase()
            .contains("successfully authenticated"),
        Err(e) => {
            log::warn!("ssh probe for {host_alias} failed to run: {e}");
            false
        }
    }
}
