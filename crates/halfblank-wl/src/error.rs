use std::io;

use halfblank::{Classify, ConfigError, ErrorKind};
use nix::errno::Errno;
use thiserror::Error;
use wayland_client::{ConnectError, DispatchError, backend::WaylandError};

pub type WlResult<T> = std::result::Result<T, WlError>;

#[derive(Debug, Error)]
pub enum WlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load configuration: {0:#}")]
    Settings(anyhow::Error),

    #[error("failed to connect to the Wayland display: {0}")]
    Connect(#[from] ConnectError),

    #[error("compositor does not advertise {0}")]
    MissingGlobal(&'static str),

    #[error("failed to dispatch Wayland events: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Wayland connection error: {0}")]
    Wayland(#[from] WaylandError),

    #[error("poll on the Wayland socket failed: {0}")]
    Poll(Errno),

    #[error("Wayland display connection hung up")]
    Hangup,

    #[error("failed to allocate shared-memory buffer: {0}")]
    Buffer(io::Error),

    #[error("buffer {width}x{height} is too large")]
    BufferTooLarge { width: u32, height: u32 },

    #[error("failed to install signal handlers: {0}")]
    Signals(io::Error),
}

impl Classify for WlError {
    fn kind(&self) -> ErrorKind {
        match self {
            WlError::Config(_) | WlError::Settings(_) => ErrorKind::Config,
            WlError::Connect(_) | WlError::MissingGlobal(_) => ErrorKind::Discovery,
            WlError::Dispatch(_)
            | WlError::Wayland(_)
            | WlError::Poll(_)
            | WlError::Hangup
            | WlError::Buffer(_)
            | WlError::BufferTooLarge { .. }
            | WlError::Signals(_) => ErrorKind::Protocol,
        }
    }
}
