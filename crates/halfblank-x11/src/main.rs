//! halfblank-x11
//!
//! Covers the blank part of the screen with a black dock window, reserves it
//! with EWMH struts, blocks the pointer with an XFixes barrier when the
//! server allows it, and warps the pointer back out on a short timer.

mod atoms;
mod barrier;
mod dock;
mod error;
mod session;
mod strut;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use halfblank::{BlankArgs, Config, ConfigError, StopFlag};
use tracing::{info, warn};
use x11rb::connection::Connection;
use x11rb::rust_connection::RustConnection;

use crate::error::{X11Error, X11Result};
use crate::session::Session;

#[derive(Debug, Parser)]
#[command(
    name = "halfblank-x11",
    version,
    about = "Cover part of an X11 screen with a dock window and fence off the pointer"
)]
struct Cli {
    /// X display, e.g. :0 [default: $DISPLAY]
    #[arg(long, value_name = "DISPLAY")]
    display: Option<String>,

    #[command(flatten)]
    blank: BlankArgs,
}

fn main() -> ExitCode {
    halfblank::logging::init();
    let cli = Cli::parse();
    halfblank::error::finish("halfblank-x11", run(cli))
}

fn run(cli: Cli) -> X11Result<()> {
    let config = Config::load().map_err(X11Error::Settings)?;
    let settings = cli.blank.resolve(&config);
    if settings.active_size == 0 {
        return Err(ConfigError::ActiveSizeZero.into());
    }
    let display = cli.display.or(config.x11.display);
    let interval = Duration::from_millis(config.x11.poll_interval_ms);
    let stop = StopFlag::install().map_err(X11Error::Signals)?;

    let (conn, screen_num) = RustConnection::connect(display.as_deref())?;
    let screen = conn
        .setup()
        .roots
        .get(screen_num)
        .cloned()
        .ok_or(X11Error::NoScreen(screen_num))?;
    info!(
        "Connected to screen {} ({}x{})",
        screen_num, screen.width_in_pixels, screen.height_in_pixels
    );

    let mut session = Session::start(&conn, &screen, settings)?;
    let result = session.run(&stop, interval);
    if let Err(e) = session.teardown() {
        warn!("Teardown failed: {}", e);
    }
    result
}
