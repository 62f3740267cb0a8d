//! Process-wide stop flag
//!
//! Set from SIGINT/SIGTERM (and by the Wayland helper when the compositor
//! closes its surface). Event loops check it once per iteration.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::signal::{SIGINT, SIGTERM};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag that SIGINT and SIGTERM will set.
    pub fn install() -> io::Result<Self> {
        let stop = Self::new();
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&stop.flag))?;
        }
        debug!("Installed SIGINT/SIGTERM handlers");
        Ok(stop)
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let stop = StopFlag::new();
        let seen_by_loop = stop.clone();
        assert!(!seen_by_loop.is_set());
        stop.trigger();
        assert!(seen_by_loop.is_set());
    }
}
