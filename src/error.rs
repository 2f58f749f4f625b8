//! Error handling module for debtune
//!
//! Two families of errors live here:
//! - `CommandFailure`: the outcome of a privileged command (or a task action)
//!   that did not succeed. It is shown to the operator verbatim.
//! - `DebtuneError`: everything else (configuration, profiles, terminal setup,
//!   registry construction).

use std::fmt;
use thiserror::Error;

/// Classification of a failed privileged command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The elevation program itself is not installed
    ElevationUnavailable,
    /// The command exceeded its wall-clock bound and was killed
    TimedOut,
    /// The elevation program refused the credentials (exit 126/127)
    AuthenticationFailed,
    /// The wrapped command exited with a non-zero status
    ExitedNonZero { code: i32 },
    /// The process could not be spawned for a reason other than "not found"
    LaunchFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElevationUnavailable => write!(f, "elevation unavailable"),
            Self::TimedOut => write!(f, "timed out"),
            Self::AuthenticationFailed => write!(f, "authentication failed"),
            Self::ExitedNonZero { code } => write!(f, "exited with code {}", code),
            Self::LaunchFailed => write!(f, "launch failed"),
        }
    }
}

/// A privileged command or task action failed.
///
/// `message` is the short headline (dialog title, status line); `details` is
/// the longer explanation, usually captured standard error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CommandFailure {
    pub kind: FailureKind,
    pub message: String,
    pub details: String,
}

impl CommandFailure {
    /// The elevation program could not be found on this host
    pub fn elevation_unavailable(program: &str) -> Self {
        Self {
            kind: FailureKind::ElevationUnavailable,
            message: format!("Command '{}' not found", program),
            details: "Please ensure PolicyKit is installed and configured on your system."
                .to_string(),
        }
    }

    /// The command ran past `limit_secs` seconds
    pub fn timed_out(limit_secs: u64) -> Self {
        Self {
            kind: FailureKind::TimedOut,
            message: "Operation Timed Out".to_string(),
            details: format!(
                "The command took too long to complete (more than {}).",
                describe_duration(limit_secs)
            ),
        }
    }

    /// The elevation program rejected the operator's credentials
    pub fn authentication_failed() -> Self {
        Self {
            kind: FailureKind::AuthenticationFailed,
            message: "Authentication Failed".to_string(),
            details: "Could not get administrator privileges. Please try again.".to_string(),
        }
    }

    /// The wrapped command exited non-zero; `stderr` is trimmed
    pub fn exited(code: i32, stderr: &str) -> Self {
        Self {
            kind: FailureKind::ExitedNonZero { code },
            message: format!("Command failed with exit code {}", code),
            details: stderr.trim().to_string(),
        }
    }

    /// Spawning the elevation program failed for an unexpected reason
    pub fn launch_failed(program: &str, err: &std::io::Error) -> Self {
        Self {
            kind: FailureKind::LaunchFailed,
            message: format!("Failed to launch '{}'", program),
            details: err.to_string(),
        }
    }
}

/// Render a second count the way the operator reads it ("10 minutes")
fn describe_duration(secs: u64) -> String {
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", secs)
    }
}

/// Main error type for debtune outside the command path
#[derive(Error, Debug)]
pub enum DebtuneError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A selection or profile names a task the registry does not know
    #[error("Unknown optimization: {0}")]
    UnknownTask(String),

    /// Registry construction errors (duplicate ids)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for debtune operations
pub type Result<T> = std::result::Result<T, DebtuneError>;

impl DebtuneError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown-task error
    pub fn unknown_task(id: impl Into<String>) -> Self {
        Self::UnknownTask(id.into())
    }

    /// Create a registry error
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}
