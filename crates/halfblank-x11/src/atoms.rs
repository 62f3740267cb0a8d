use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, ConnectionExt as _};

use crate::error::X11Result;

/// Atoms used by the dock window, interned once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Atoms {
    pub utf8_string: Atom,
    pub net_wm_name: Atom,
    pub net_wm_window_type: Atom,
    pub net_wm_window_type_dock: Atom,
    pub net_wm_state: Atom,
    pub net_wm_state_above: Atom,
    pub net_wm_state_sticky: Atom,
    pub net_wm_state_skip_taskbar: Atom,
    pub net_wm_state_skip_pager: Atom,
    pub net_wm_strut: Atom,
    pub net_wm_strut_partial: Atom,
}

impl Atoms {
    pub fn new<C: Connection>(conn: &C) -> X11Result<Self> {
        let intern = |name: &str| -> X11Result<Atom> {
            Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
        };

        Ok(Self {
            utf8_string: intern("UTF8_STRING")?,
            net_wm_name: intern("_NET_WM_NAME")?,
            net_wm_window_type: intern("_NET_WM_WINDOW_TYPE")?,
            net_wm_window_type_dock: intern("_NET_WM_WINDOW_TYPE_DOCK")?,
            net_wm_state: intern("_NET_WM_STATE")?,
            net_wm_state_above: intern("_NET_WM_STATE_ABOVE")?,
            net_wm_state_sticky: intern("_NET_WM_STATE_STICKY")?,
            net_wm_state_skip_taskbar: intern("_NET_WM_STATE_SKIP_TASKBAR")?,
            net_wm_state_skip_pager: intern("_NET_WM_STATE_SKIP_PAGER")?,
            net_wm_strut: intern("_NET_WM_STRUT")?,
            net_wm_strut_partial: intern("_NET_WM_STRUT_PARTIAL")?,
        })
    }

    /// Value of `_NET_WM_STATE` for the dock window.
    pub fn dock_states(&self) -> [Atom; 4] {
        [
            self.net_wm_state_above,
            self.net_wm_state_sticky,
            self.net_wm_state_skip_taskbar,
            self.net_wm_state_skip_pager,
        ]
    }
}
