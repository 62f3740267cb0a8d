//! Failure classes shared by the three helpers and their exit codes.

use std::fmt;
use std::process::ExitCode;

use tracing::debug;

/// Coarse failure class. Decides the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad flag combination, out-of-range size, unreadable config file
    Config,
    /// No usable output / connector / CRTC / plane
    Discovery,
    /// Exclusive device access was refused
    Permission,
    /// A display-protocol or system call failed
    Protocol,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Discovery | ErrorKind::Permission | ErrorKind::Protocol => 1,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Config => "configuration error",
            ErrorKind::Discovery => "discovery error",
            ErrorKind::Permission => "permission error",
            ErrorKind::Protocol => "protocol error",
        })
    }
}

/// Implemented by every tool error so `main` can pick an exit status.
pub trait Classify: std::error::Error {
    fn kind(&self) -> ErrorKind;
}

/// Report a tool result on stderr and turn it into the process exit status.
pub fn finish<E: Classify>(tool: &str, result: Result<(), E>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = e.kind();
            debug!(%kind, "{:?}", e);
            eprintln!("{tool}: {e}");
            ExitCode::from(kind.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_two() {
        assert_eq!(ErrorKind::Config.exit_code(), 2);
        assert_eq!(ErrorKind::Discovery.exit_code(), 1);
        assert_eq!(ErrorKind::Permission.exit_code(), 1);
        assert_eq!(ErrorKind::Protocol.exit_code(), 1);
    }
}
