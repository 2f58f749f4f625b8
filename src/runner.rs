//! Privileged command execution
//!
//! `PrivilegedCommandRunner` is the only place that launches the elevation
//! program. Every task action reaches the host through the `CommandRunner`
//! trait, so tests and `--dry-run` can swap the implementation without the
//! engine noticing.
//!
//! # Outcome classification
//!
//! | Situation                          | `FailureKind`          |
//! |------------------------------------|------------------------|
//! | elevation program missing          | `ElevationUnavailable` |
//! | wall-clock bound exceeded          | `TimedOut`             |
//! | exit 126 / 127                     | `AuthenticationFailed` |
//! | any other non-zero exit or signal  | `ExitedNonZero`        |
//!
//! The timeout check wins over the exit status: a command killed for running
//! too long is never reported as a plain non-zero exit. The bound covers
//! collecting output too, so a detached process holding the pipes open
//! cannot stretch a run past it.

use crate::config::RunnerConfig;
use crate::error::CommandFailure;
use crate::process_guard::{signal_process_group, ChildRegistry, CommandProcessGroup};
use log::{debug, info, warn};
use nix::sys::signal::Signal;
use std::io::{ErrorKind, Read};
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Exit codes the elevation program reserves for "not authorized" and
/// "dismissed the prompt".
const AUTH_EXIT_CODES: [i32; 2] = [126, 127];

/// Bound on reaping and output collection once a command has been killed
const KILL_GRACE: Duration = Duration::from_secs(1);

/// Output of a privileged command that exited with status 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
}

/// Capability handed to task actions for running host commands.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str) -> Result<CommandResult, CommandFailure>;
}

/// Runs commands through the configured elevation program (`pkexec` by default).
#[derive(Debug, Clone)]
pub struct PrivilegedCommandRunner {
    config: RunnerConfig,
}

impl PrivilegedCommandRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Build the argv handed to `Command`: `[elevation, shell, "-c", text]`
    pub fn command_line(&self, command: &str) -> Vec<String> {
        vec![
            self.config.elevation_program.clone(),
            self.config.shell.clone(),
            "-c".to_string(),
            wrap_noninteractive(command, self.config.noninteractive),
        ]
    }

    fn spawn(&self, argv: &[String]) -> Result<Child, CommandFailure> {
        let program = &self.config.elevation_program;
        Command::new(program)
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .in_new_process_group()
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    warn!("Elevation program '{}' not found", program);
                    CommandFailure::elevation_unavailable(program)
                } else {
                    warn!("Failed to launch '{}': {}", program, e);
                    CommandFailure::launch_failed(program, &e)
                }
            })
    }
}

impl CommandRunner for PrivilegedCommandRunner {
    fn run(&self, command: &str) -> Result<CommandResult, CommandFailure> {
        let argv = self.command_line(command);
        let timeout = self.config.timeout();
        info!(
            "Running privileged command via {} (timeout {}s)",
            self.config.elevation_program,
            timeout.as_secs()
        );
        debug!("argv: {:?}", argv);

        let deadline = Instant::now() + timeout;
        let mut child = self.spawn(&argv)?;
        let pid = child.id();
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }

        let output = read_pipes(&mut child);

        let status = match child.wait_timeout(timeout) {
            Ok(Some(status)) => Some(status),
            Ok(None) => {
                warn!("Command exceeded {}s, killing process group {}", timeout.as_secs(), pid);
                kill_and_reap(&mut child, pid);
                None
            }
            Err(e) => {
                warn!("Waiting on PID {} failed: {}", pid, e);
                kill_and_reap(&mut child, pid);
                return Err(CommandFailure::launch_failed(&self.config.elevation_program, &e));
            }
        };

        let Some(status) = status else {
            // Killed: output is only diagnostic, don't wait long for it
            let _ = collect_output(&output, Instant::now() + KILL_GRACE);
            return Err(CommandFailure::timed_out(timeout.as_secs()));
        };

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(pid);
        }

        match collect_output(&output, deadline) {
            Some((stdout, stderr)) => classify(status, stdout, &stderr),
            None => {
                // A process outside our reach (setsid, daemonized helper) kept the pipes
                warn!(
                    "Output of PID {} still open after {}s; abandoning readers",
                    pid,
                    timeout.as_secs()
                );
                signal_process_group(pid, Signal::SIGKILL);
                Err(CommandFailure::timed_out(timeout.as_secs()))
            }
        }
    }
}

/// Kill the command's process group and reap the leader, waiting at most
/// `KILL_GRACE`.
///
/// Once the elevation program has switched to root, signals from an
/// unprivileged parent fail with EPERM and the command keeps running. The
/// bounded reap keeps the runner's deadline, and the PID stays registered so
/// the exit-time cleanup tries again.
fn kill_and_reap(child: &mut Child, pid: u32) {
    signal_process_group(pid, Signal::SIGKILL);
    let _ = child.kill();
    match child.wait_timeout(KILL_GRACE) {
        Ok(Some(_)) => {
            if let Ok(mut registry) = ChildRegistry::global().lock() {
                registry.unregister(pid);
            }
        }
        _ => warn!("PID {} survived SIGKILL; leaving it for exit cleanup", pid),
    }
}

/// Prefix the command so package tools never stop for a prompt
pub fn wrap_noninteractive(command: &str, enabled: bool) -> String {
    if enabled {
        format!("export DEBIAN_FRONTEND=noninteractive; {}", command)
    } else {
        command.to_string()
    }
}

fn classify(status: ExitStatus, stdout: String, stderr: &str) -> Result<CommandResult, CommandFailure> {
    if status.success() {
        debug!("Privileged command succeeded");
        return Ok(CommandResult { stdout });
    }

    let code = match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(sig)) => -sig,
        (None, None) => -1,
    };
    info!("Privileged command failed with exit code {}", code);

    if AUTH_EXIT_CODES.contains(&code) {
        Err(CommandFailure::authentication_failed())
    } else {
        Err(CommandFailure::exited(code, stderr))
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Read both pipes to the end on helper threads so a chatty child never
/// blocks. Each thread sends its buffer once its pipe closes.
fn read_pipes(child: &mut Child) -> Receiver<(Stream, Vec<u8>)> {
    let (tx, rx) = mpsc::channel();
    spawn_reader(Stream::Stdout, child.stdout.take(), tx.clone());
    spawn_reader(Stream::Stderr, child.stderr.take(), tx);
    rx
}

fn spawn_reader<R: Read + Send + 'static>(
    stream: Stream,
    pipe: Option<R>,
    tx: Sender<(Stream, Vec<u8>)>,
) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        // The receiver is gone if the run was abandoned
        let _ = tx.send((stream, buf));
    });
}

/// Gather `(stdout, stderr)` unless `deadline` passes first.
///
/// On `None` the reader threads are left behind; they end when the last
/// holder of the pipes closes them.
fn collect_output(output: &Receiver<(Stream, Vec<u8>)>, deadline: Instant) -> Option<(String, String)> {
    let mut stdout = None;
    let mut stderr = None;

    while stdout.is_none() || stderr.is_none() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match output.recv_timeout(remaining) {
            Ok((Stream::Stdout, bytes)) => stdout = Some(bytes),
            Ok((Stream::Stderr, bytes)) => stderr = Some(bytes),
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let text = |bytes: Option<Vec<u8>>| String::from_utf8_lossy(&bytes.unwrap_or_default()).into_owned();
    Some((text(stdout), text(stderr)))
}

/// Logs commands instead of running them. Every command "succeeds".
#[derive(Debug, Clone)]
pub struct DryRunRunner {
    noninteractive: bool,
}

impl DryRunRunner {
    pub fn new(noninteractive: bool) -> Self {
        Self { noninteractive }
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &str) -> Result<CommandResult, CommandFailure> {
        info!(
            "[DRY RUN] Skipped: {}",
            wrap_noninteractive(command, self.noninteractive)
        );
        Ok(CommandResult::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_wrap_noninteractive() {
        assert_eq!(
            wrap_noninteractive("apt-get install -y preload", true),
            "export DEBIAN_FRONTEND=noninteractive; apt-get install -y preload"
        );
        assert_eq!(wrap_noninteractive("true", false), "true");
    }

    #[test]
    fn test_command_line_shape() {
        let runner = PrivilegedCommandRunner::new(RunnerConfig::default());
        let argv = runner.command_line("sysctl --system");
        assert_eq!(argv[0], "pkexec");
        assert_eq!(argv[1], "bash");
        assert_eq!(argv[2], "-c");
        assert!(argv[3].ends_with("; sysctl --system"));
    }

    #[test]
    fn test_classify_auth_codes() {
        for code in AUTH_EXIT_CODES {
            let status = ExitStatus::from_raw(code << 8);
            let err = classify(status, String::new(), "").unwrap_err();
            assert_eq!(err.kind, FailureKind::AuthenticationFailed);
        }
    }

    #[test]
    fn test_classify_nonzero_and_signal() {
        let err = classify(ExitStatus::from_raw(2 << 8), String::new(), " boom \n").unwrap_err();
        assert_eq!(err.kind, FailureKind::ExitedNonZero { code: 2 });
        assert_eq!(err.details, "boom");

        // Raw wait status 9 means "killed by SIGKILL"
        let err = classify(ExitStatus::from_raw(9), String::new(), "").unwrap_err();
        assert_eq!(err.kind, FailureKind::ExitedNonZero { code: -9 });
    }

    #[test]
    fn test_classify_success_keeps_stdout() {
        let ok = classify(ExitStatus::from_raw(0), "hello\n".into(), "").unwrap();
        assert_eq!(ok.stdout, "hello\n");
    }

    #[test]
    fn test_collect_output_gives_up_at_deadline() {
        let (tx, rx) = mpsc::channel();
        tx.send((Stream::Stdout, b"partial".to_vec())).unwrap();

        // stderr never arrives while tx is alive
        let start = Instant::now();
        assert!(collect_output(&rx, start + Duration::from_millis(50)).is_none());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_collect_output_both_streams() {
        let (tx, rx) = mpsc::channel();
        tx.send((Stream::Stderr, b"warn\n".to_vec())).unwrap();
        tx.send((Stream::Stdout, b"ok\n".to_vec())).unwrap();

        let (stdout, stderr) = collect_output(&rx, Instant::now() + Duration::from_secs(1)).unwrap();
        assert_eq!(stdout, "ok\n");
        assert_eq!(stderr, "warn\n");
    }

    #[test]
    fn test_dry_run_always_succeeds() {
        let runner = DryRunRunner::new(true);
        assert_eq!(runner.run("rm -rf /nonexistent").unwrap(), CommandResult::default());
    }
}
