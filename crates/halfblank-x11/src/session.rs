//! Steady state: window, barrier and pointer clamp
//!
//! Every tick drains pending events, warps the pointer out of the blank
//! region if it got in, then sleeps. The barrier alone is not trusted.

use std::thread;
use std::time::Duration;

use halfblank::{BlankSettings, Extent, Plan, StopFlag, plan};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    ChangeWindowAttributesAux, ConnectionExt as _, EventMask, Screen, Window,
};

use crate::atoms::Atoms;
use crate::barrier::{self, PointerBarrier};
use crate::dock::Dock;
use crate::error::X11Result;

pub struct Session<'c, C: Connection> {
    conn: &'c C,
    root: Window,
    atoms: Atoms,
    settings: BlankSettings,
    plan: Plan,
    dock: Option<Dock>,
    xfixes: bool,
    barrier: Option<PointerBarrier>,
}

impl<'c, C: Connection> Session<'c, C> {
    /// Plan for the screen, create the dock window and try the barrier.
    pub fn start(conn: &'c C, screen: &Screen, settings: BlankSettings) -> X11Result<Self> {
        let extent = Extent::new(
            u32::from(screen.width_in_pixels),
            u32::from(screen.height_in_pixels),
        );
        let plan = plan(extent, settings.side, settings.active_size, 1)?;
        info!("Screen {}, blanking {} ({})", extent, plan.side, plan.blank);

        let atoms = Atoms::new(conn)?;
        let dock = Dock::create(conn, screen, &atoms, &plan, &settings.name)?;

        conn.change_window_attributes(
            screen.root,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::STRUCTURE_NOTIFY),
        )?;

        let xfixes = barrier::negotiate(conn);
        let mut session = Self {
            conn,
            root: screen.root,
            atoms,
            settings,
            plan,
            dock: Some(dock),
            xfixes,
            barrier: None,
        };
        session.barrier = session.create_barrier()?;
        conn.flush()?;
        Ok(session)
    }

    fn create_barrier(&self) -> X11Result<Option<PointerBarrier>> {
        if !self.xfixes {
            return Ok(None);
        }
        PointerBarrier::create(self.conn, self.root, &self.plan.barrier())
    }

    /// Clamp once, then tick until `stop` is set.
    pub fn run(&mut self, stop: &StopFlag, interval: Duration) -> X11Result<()> {
        self.clamp()?;
        while !stop.is_set() {
            self.drain_events()?;
            self.clamp()?;
            thread::sleep(interval);
        }
        info!("Stop requested");
        Ok(())
    }

    fn drain_events(&mut self) -> X11Result<()> {
        while let Some(event) = self.conn.poll_for_event()? {
            match event {
                Event::ConfigureNotify(e) if e.window == self.root => {
                    self.resize(Extent::new(u32::from(e.width), u32::from(e.height)))?;
                }
                Event::Error(e) => {
                    warn!("X error code {} ({:?})", e.error_code, e.error_kind);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Re-plan for a new screen size. An invalid result keeps the old layout.
    fn resize(&mut self, extent: Extent) -> X11Result<()> {
        if extent == self.plan.extent {
            return Ok(());
        }
        let next = match plan(extent, self.settings.side, self.settings.active_size, 1) {
            Ok(next) => next,
            Err(e) => {
                warn!("Screen resized to {}: {}; keeping the previous layout", extent, e);
                return Ok(());
            }
        };

        if let Some(barrier) = self.barrier.take() {
            barrier.destroy(self.conn)?;
        }
        if let Some(dock) = &self.dock {
            dock.apply(self.conn, &self.atoms, &next)?;
        }
        self.plan = next;
        self.barrier = self.create_barrier()?;
        self.conn.flush()?;
        info!("Screen resized to {}, blanking {}", extent, next.blank);
        Ok(())
    }

    /// Warp the pointer out of the blank region if it is inside.
    fn clamp(&self) -> X11Result<()> {
        let pointer = self.conn.query_pointer(self.root)?.reply()?;
        if !pointer.same_screen {
            return Ok(());
        }
        let (x, y) = (i32::from(pointer.root_x), i32::from(pointer.root_y));
        if let Some((nx, ny)) = self.plan.clamp_pointer(x, y) {
            debug!("Pointer at ({}, {}), warping to ({}, {})", x, y, nx, ny);
            self.conn.warp_pointer(
                x11rb::NONE,
                self.root,
                0,
                0,
                0,
                0,
                wire(nx),
                wire(ny),
            )?;
            self.conn.flush()?;
        }
        Ok(())
    }

    /// Barrier first, then the window.
    pub fn teardown(mut self) -> X11Result<()> {
        if let Some(barrier) = self.barrier.take() {
            barrier.destroy(self.conn)?;
        }
        if let Some(dock) = self.dock.take() {
            dock.destroy(self.conn)?;
        }
        self.conn.flush()?;
        debug!("Dock window and barrier removed");
        Ok(())
    }
}

fn wire(v: i32) -> i16 {
    i16::try_from(v).unwrap_or(if v < 0 { i16::MIN } else { i16::MAX })
}
