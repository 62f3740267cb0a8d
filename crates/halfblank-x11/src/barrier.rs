//! XFixes pointer barrier
//!
//! Best effort: a missing extension or a rejected request only costs the
//! barrier. The window and struts keep working and the clamp loop still
//! corrects the pointer.

use halfblank::{BarrierLine, Direction};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xfixes::{self, BarrierDirections, ConnectionExt as _};
use x11rb::protocol::xproto::Window;

use crate::error::X11Result;

/// Pointer barriers need XFixes 5.0.
const XFIXES_MAJOR: u32 = 5;
const XFIXES_MINOR: u32 = 0;

fn directions(allow: Direction) -> BarrierDirections {
    match allow {
        Direction::PositiveX => BarrierDirections::POSITIVE_X,
        Direction::NegativeX => BarrierDirections::NEGATIVE_X,
        Direction::PositiveY => BarrierDirections::POSITIVE_Y,
        Direction::NegativeY => BarrierDirections::NEGATIVE_Y,
    }
}

fn coord(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

/// Whether the server speaks XFixes >= 5.0. Logs and returns false otherwise.
pub fn negotiate<C: Connection>(conn: &C) -> bool {
    match conn.extension_information(xfixes::X11_EXTENSION_NAME) {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("XFixes not available, continuing without a pointer barrier");
            return false;
        }
        Err(e) => {
            warn!("XFixes query failed ({}), continuing without a pointer barrier", e);
            return false;
        }
    }

    let reply = conn
        .xfixes_query_version(XFIXES_MAJOR, XFIXES_MINOR)
        .map_err(ReplyError::from)
        .and_then(|cookie| cookie.reply());
    match reply {
        Ok(version) if version.major_version >= XFIXES_MAJOR => {
            debug!("XFixes {}.{}", version.major_version, version.minor_version);
            true
        }
        Ok(version) => {
            warn!(
                "XFixes {}.{} has no pointer barriers, continuing without one",
                version.major_version, version.minor_version
            );
            false
        }
        Err(e) => {
            warn!("XFixes version query failed ({}), continuing without a pointer barrier", e);
            false
        }
    }
}

#[derive(Debug)]
pub struct PointerBarrier {
    id: xfixes::Barrier,
}

impl PointerBarrier {
    /// Create a barrier along `line`. Protocol errors are logged with their
    /// error code and yield `None`; only a lost connection is an error.
    pub fn create<C: Connection>(
        conn: &C,
        root: Window,
        line: &BarrierLine,
    ) -> X11Result<Option<Self>> {
        let id = conn.generate_id()?;
        let cookie = conn.xfixes_create_pointer_barrier(
            id,
            root,
            coord(line.x1),
            coord(line.y1),
            coord(line.x2),
            coord(line.y2),
            directions(line.allow),
            &[],
        )?;

        match cookie.check() {
            Ok(()) => {
                info!(
                    "Pointer barrier ({},{})-({},{}) allowing {:?}",
                    line.x1, line.y1, line.x2, line.y2, line.allow
                );
                Ok(Some(Self { id }))
            }
            Err(ReplyError::X11Error(e)) => {
                warn!(
                    "Pointer barrier rejected (X error code {}, {:?}), continuing without it",
                    e.error_code, e.error_kind
                );
                Ok(None)
            }
            Err(ReplyError::ConnectionError(e)) => Err(e.into()),
        }
    }

    pub fn destroy<C: Connection>(self, conn: &C) -> X11Result<()> {
        conn.xfixes_delete_pointer_barrier(self.id)?;
        Ok(())
    }
}
