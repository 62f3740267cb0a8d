use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};

use drm::Device;
pub use drm::control::Device as ControlDevice;
use nix::unistd::{AccessFlags, access};

use crate::error::{DrmError, DrmResult};

/// Tried first; falls back to card0 when it is not read/write accessible.
const PREFERRED_CARD: &str = "/dev/dri/card1";
const FALLBACK_CARD: &str = "/dev/dri/card0";

/// An opened DRM device node.
#[derive(Debug)]
pub struct Card {
    file: File,
    path: PathBuf,
}

impl AsFd for Card {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl Device for Card {}

impl ControlDevice for Card {}

impl Card {
    pub fn open(path: &Path) -> DrmResult<Card> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| DrmError::OpenCard(path.to_path_buf(), e))?;
        Ok(Card {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn default_path() -> PathBuf {
        if access(PREFERRED_CARD, AccessFlags::R_OK | AccessFlags::W_OK).is_ok() {
            PathBuf::from(PREFERRED_CARD)
        } else {
            PathBuf::from(FALLBACK_CARD)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
