use std::io::Error as IoError;
use std::path::PathBuf;

use drm::ClientCapability;
use drm::control::{crtc, encoder, plane, property};
use halfblank::{Classify, ConfigError, ErrorKind};
use thiserror::Error;

pub type DrmResult<T> = std::result::Result<T, DrmError>;

#[derive(Debug, Error)]
pub enum DrmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load configuration: {0:#}")]
    Settings(anyhow::Error),

    #[error("unable to open {}: {1}", .0.display())]
    OpenCard(PathBuf, IoError),

    #[error("not DRM master (another compositor may own {}): {1}", .0.display())]
    NotMaster(PathBuf, IoError),

    #[error("unable to request {0:?}: {1}")]
    ClientCapability(ClientCapability, IoError),

    #[error("could not load resource handles: {0}")]
    Resources(IoError),

    #[error("no connected connector found")]
    NoConnector,

    #[error("connector {0} has no encoder")]
    NoEncoder(String),

    #[error("failed to get info for encoder {0:?}: {1}")]
    EncoderInfo(encoder::Handle, IoError),

    #[error("encoder {0:?} has no CRTC")]
    NoCrtc(encoder::Handle),

    #[error("failed to get info for CRTC {0:?}: {1}")]
    CrtcInfo(crtc::Handle, IoError),

    #[error("CRTC {0:?} has no valid mode")]
    NoMode(crtc::Handle),

    #[error("failed to get planes: {0}")]
    Planes(IoError),

    #[error("failed to find active primary plane for CRTC {0:?}")]
    NoPrimaryPlane(crtc::Handle),

    #[error("failed to get properties for plane {0:?}: {1}")]
    PlaneProperties(plane::Handle, IoError),

    #[error("failed to get info for property {0:?}: {1}")]
    PropertyInfo(property::Handle, IoError),

    #[error("plane {plane:?} has no {name} property")]
    MissingProperty { plane: plane::Handle, name: &'static str },

    #[error("clip failed: {0}")]
    Commit(IoError),
}

impl Classify for DrmError {
    fn kind(&self) -> ErrorKind {
        match self {
            DrmError::Config(_) | DrmError::Settings(_) => ErrorKind::Config,
            DrmError::NotMaster(..) => ErrorKind::Permission,
            DrmError::NoConnector
            | DrmError::NoEncoder(_)
            | DrmError::NoCrtc(_)
            | DrmError::NoMode(_)
            | DrmError::NoPrimaryPlane(_)
            | DrmError::MissingProperty { .. } => ErrorKind::Discovery,
            DrmError::OpenCard(..)
            | DrmError::ClientCapability(..)
            | DrmError::Resources(_)
            | DrmError::EncoderInfo(..)
            | DrmError::CrtcInfo(..)
            | DrmError::Planes(_)
            | DrmError::PlaneProperties(..)
            | DrmError::PropertyInfo(..)
            | DrmError::Commit(_) => ErrorKind::Protocol,
        }
    }
}
