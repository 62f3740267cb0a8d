//! Event pump
//!
//! One bounded wait on the display socket per call: dispatch what is queued,
//! flush, then `prepare_read` + `poll` + `read`. A timeout or an interrupted
//! poll cancels the read and returns 0 so the caller can recheck its stop
//! flag. The library's own blocking dispatch is never used.

use std::io::ErrorKind as IoErrorKind;

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use wayland_client::EventQueue;
use wayland_client::backend::WaylandError;

use crate::app::App;
use crate::error::{WlError, WlResult};

/// Error, hang-up or a closed descriptor all end the session.
fn is_hangup(revents: PollFlags) -> bool {
    revents.intersects(PollFlags::POLLERR | PollFlags::POLLHUP | PollFlags::POLLNVAL)
}

/// Wait up to `timeout` for events and dispatch them. Returns the number of
/// events dispatched.
pub fn pump(queue: &mut EventQueue<App>, app: &mut App, timeout: PollTimeout) -> WlResult<usize> {
    let pending = queue.dispatch_pending(app)?;
    if pending > 0 {
        return Ok(pending);
    }
    queue.flush()?;

    let Some(guard) = queue.prepare_read() else {
        return Ok(queue.dispatch_pending(app)?);
    };

    let revents = {
        let mut fds = [PollFd::new(guard.connection_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, timeout) {
            Ok(0) => return Ok(0),
            Ok(_) => fds[0].revents().unwrap_or(PollFlags::empty()),
            Err(Errno::EINTR) => return Ok(0),
            Err(e) => return Err(WlError::Poll(e)),
        }
    };

    if is_hangup(revents) {
        return Err(WlError::Hangup);
    }

    match guard.read() {
        Ok(_) => {}
        Err(WaylandError::Io(e)) if e.kind() == IoErrorKind::WouldBlock => {}
        Err(e) => return Err(e.into()),
    }

    Ok(queue.dispatch_pending(app)?)
}
