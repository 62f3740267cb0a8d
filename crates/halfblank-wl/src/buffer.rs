//! Black shared-memory buffer backed by an unlinked temporary file.

use std::fs::File;
use std::os::fd::AsFd;

use tracing::debug;
use wayland_client::protocol::{wl_buffer::WlBuffer, wl_shm, wl_shm::WlShm, wl_shm_pool::WlShmPool};
use wayland_client::{Dispatch, QueueHandle};

use crate::error::{WlError, WlResult};

const BYTES_PER_PIXEL: u32 = 4;

/// Stride and total size of an XRGB8888 buffer, if they fit the protocol's
/// `int` arguments.
pub fn layout(width: u32, height: u32) -> Option<(i32, i32)> {
    let stride = width.checked_mul(BYTES_PER_PIXEL)?;
    let size = stride.checked_mul(height)?;
    Some((i32::try_from(stride).ok()?, i32::try_from(size).ok()?))
}

/// A configure only replaces the buffer when its device-pixel size changed.
pub fn needs_realloc(current: Option<(u32, u32)>, next: (u32, u32)) -> bool {
    current != Some(next)
}

#[derive(Debug)]
pub struct ShmBuffer {
    _file: File,
    pool: WlShmPool,
    buffer: WlBuffer,
    width: u32,
    height: u32,
}

impl ShmBuffer {
    pub fn new<D>(shm: &WlShm, qh: &QueueHandle<D>, width: u32, height: u32) -> WlResult<Self>
    where
        D: Dispatch<WlShmPool, ()> + Dispatch<WlBuffer, ()> + 'static,
    {
        let too_large = || WlError::BufferTooLarge { width, height };
        if width == 0 || height == 0 {
            return Err(too_large());
        }
        let (stride, size) = layout(width, height).ok_or_else(too_large)?;

        let file = tempfile::tempfile().map_err(WlError::Buffer)?;
        // Zero bytes are opaque black in XRGB8888.
        file.set_len(size as u64).map_err(WlError::Buffer)?;

        let pool = shm.create_pool(file.as_fd(), size, qh, ());
        let buffer = pool.create_buffer(
            0,
            width as i32,
            height as i32,
            stride,
            wl_shm::Format::Xrgb8888,
            qh,
            (),
        );
        debug!("Allocated {}x{} shm buffer ({} bytes)", width, height, size);

        Ok(Self {
            _file: file,
            pool,
            buffer,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn wl_buffer(&self) -> &WlBuffer {
        &self.buffer
    }

    pub fn destroy(self) {
        self.buffer.destroy();
        self.pool.destroy();
    }
}
