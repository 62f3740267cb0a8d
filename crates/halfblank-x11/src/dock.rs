//! Dock window
//!
//! Black, undecorated `_NET_WM_WINDOW_TYPE_DOCK` window over the blank region.
//! The window manager keeps other windows out of it through the struts.

use halfblank::{Plan, Rect};
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    AtomEnum, ConfigureWindowAux, ConnectionExt as _, CreateWindowAux, EventMask, PropMode,
    Screen, StackMode, Window, WindowClass,
};
use x11rb::wrapper::ConnectionExt as _;
use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT};

use crate::atoms::Atoms;
use crate::error::X11Result;
use crate::strut::{strut, strut_partial};

/// `WM_CLASS`: instance and class, each NUL terminated.
const WM_CLASS: &[u8] = b"halfblank\0Halfblank\0";

/// X geometry for `rect`. Screen sizes are 16-bit on the wire.
fn geometry(rect: &Rect) -> (i16, i16, u16, u16) {
    let coord = |v: u32| i16::try_from(v).unwrap_or(i16::MAX);
    let size = |v: u32| u16::try_from(v).unwrap_or(u16::MAX).max(1);
    (coord(rect.x), coord(rect.y), size(rect.width), size(rect.height))
}

#[derive(Debug)]
pub struct Dock {
    pub window: Window,
}

impl Dock {
    /// Create the window, set its hints and map it raised.
    pub fn create<C: Connection>(
        conn: &C,
        screen: &Screen,
        atoms: &Atoms,
        plan: &Plan,
        name: &str,
    ) -> X11Result<Self> {
        let window = conn.generate_id()?;
        let (x, y, width, height) = geometry(&plan.blank);

        conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            screen.root,
            x,
            y,
            width,
            height,
            0,
            WindowClass::INPUT_OUTPUT,
            COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .background_pixel(screen.black_pixel)
                .border_pixel(screen.black_pixel)
                .event_mask(EventMask::EXPOSURE | EventMask::STRUCTURE_NOTIFY),
        )?;

        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            name.as_bytes(),
        )?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            atoms.net_wm_name,
            atoms.utf8_string,
            name.as_bytes(),
        )?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            WM_CLASS,
        )?;

        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms.net_wm_window_type,
            AtomEnum::ATOM,
            &[atoms.net_wm_window_type_dock],
        )?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms.net_wm_state,
            AtomEnum::ATOM,
            &atoms.dock_states(),
        )?;

        let dock = Self { window };
        dock.set_struts(conn, atoms, plan)?;

        conn.configure_window(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;
        conn.map_window(window)?;
        conn.flush()?;

        info!("Dock window {} covers {}", window, plan.blank);
        Ok(dock)
    }

    fn set_struts<C: Connection>(&self, conn: &C, atoms: &Atoms, plan: &Plan) -> X11Result<()> {
        conn.change_property32(
            PropMode::REPLACE,
            self.window,
            atoms.net_wm_strut,
            AtomEnum::CARDINAL,
            &strut(plan),
        )?;
        conn.change_property32(
            PropMode::REPLACE,
            self.window,
            atoms.net_wm_strut_partial,
            AtomEnum::CARDINAL,
            &strut_partial(plan),
        )?;
        Ok(())
    }

    /// Move the window onto `plan`'s blank region and update the struts.
    pub fn apply<C: Connection>(&self, conn: &C, atoms: &Atoms, plan: &Plan) -> X11Result<()> {
        let (x, y, width, height) = geometry(&plan.blank);
        conn.configure_window(
            self.window,
            &ConfigureWindowAux::new()
                .x(i32::from(x))
                .y(i32::from(y))
                .width(u32::from(width))
                .height(u32::from(height))
                .stack_mode(StackMode::ABOVE),
        )?;
        self.set_struts(conn, atoms, plan)?;
        debug!("Dock window {} moved to {}", self.window, plan.blank);
        Ok(())
    }

    pub fn destroy<C: Connection>(self, conn: &C) -> X11Result<()> {
        conn.destroy_window(self.window)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_matches_blank_rect() {
        assert_eq!(geometry(&Rect::new(0, 1240, 2560, 360)), (0, 1240, 2560, 360));
    }

    #[test]
    fn geometry_saturates() {
        assert_eq!(
            geometry(&Rect::new(40_000, 0, 70_000, 0)),
            (i16::MAX, 0, u16::MAX, 1)
        );
    }

    #[test]
    fn class_is_two_nul_terminated_strings() {
        let parts: Vec<&[u8]> = WM_CLASS.split(|b| *b == 0).collect();
        assert_eq!(parts, [&b"halfblank"[..], &b"Halfblank"[..], &b""[..]]);
    }
}
