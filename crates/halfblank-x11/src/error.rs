use std::io;

use halfblank::{Classify, ConfigError, ErrorKind};
use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

pub type X11Result<T> = std::result::Result<T, X11Error>;

#[derive(Debug, Error)]
pub enum X11Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load configuration: {0:#}")]
    Settings(anyhow::Error),

    #[error("failed to install signal handlers: {0}")]
    Signals(io::Error),

    #[error("cannot open X display: {0}")]
    Connect(#[from] ConnectError),

    #[error("X server has no screen {0}")]
    NoScreen(usize),

    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("X request failed: {0}")]
    ReplyOrId(#[from] ReplyOrIdError),
}

impl Classify for X11Error {
    fn kind(&self) -> ErrorKind {
        match self {
            X11Error::Config(_) | X11Error::Settings(_) => ErrorKind::Config,
            X11Error::Connect(_) | X11Error::NoScreen(_) => ErrorKind::Discovery,
            X11Error::Signals(_)
            | X11Error::Connection(_)
            | X11Error::Reply(_)
            | X11Error::ReplyOrId(_) => ErrorKind::Protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(X11Error::from(ConfigError::ActiveSizeZero).kind().exit_code(), 2);
        assert_eq!(X11Error::NoScreen(1).kind(), ErrorKind::Discovery);
        let lost = X11Error::from(ConnectionError::UnknownError);
        assert_eq!(lost.kind().exit_code(), 1);
    }
}
