//! halfblank-wl
//!
//! Keeps a black layer-shell overlay over the blank part of the first output
//! and reserves that space through its exclusive zone. Runs until SIGINT,
//! SIGTERM or the compositor closes the surface.

mod app;
mod buffer;
mod error;
mod layer;
mod pump;

use std::process::ExitCode;

use clap::Parser;
use halfblank::{BlankArgs, Config, ConfigError, StopFlag, plan};
use nix::poll::PollTimeout;
use tracing::{debug, info, warn};
use wayland_client::{Connection, EventQueue, QueueHandle};

use crate::app::App;
use crate::error::{WlError, WlResult};
use crate::pump::pump;

#[derive(Debug, Parser)]
#[command(
    name = "halfblank-wl",
    version,
    about = "Cover part of a Wayland output with a black layer-shell overlay"
)]
struct Cli {
    #[command(flatten)]
    blank: BlankArgs,
}

fn main() -> ExitCode {
    halfblank::logging::init();
    let cli = Cli::parse();
    halfblank::error::finish("halfblank-wl", run(cli))
}

fn run(cli: Cli) -> WlResult<()> {
    let config = Config::load().map_err(WlError::Settings)?;
    let settings = cli.blank.resolve(&config);
    if settings.active_size == 0 {
        return Err(ConfigError::ActiveSizeZero.into());
    }
    let timeout = PollTimeout::from(config.wayland.poll_timeout_ms);
    let stop = StopFlag::install().map_err(WlError::Signals)?;

    let conn = Connection::connect_to_env()?;
    let mut queue = conn.new_event_queue();
    let qh = queue.handle();
    let display = conn.display();
    let _registry = display.get_registry(&qh, ());
    display.sync(&qh, ());

    let mut app = App::new(settings, stop);
    let result = drive(&mut queue, &mut app, &qh, timeout);

    app.teardown();
    if let Err(e) = conn.flush() {
        warn!("Failed to flush teardown requests: {}", e);
    }
    info!("Overlay removed");
    result
}

fn drive(
    queue: &mut EventQueue<App>,
    app: &mut App,
    qh: &QueueHandle<App>,
    timeout: PollTimeout,
) -> WlResult<()> {
    wait(queue, app, timeout)?;
    if app.stop.is_set() {
        return Ok(());
    }
    app.check_globals()?;

    if app.waiting() {
        warn!("Output has not reported its current mode yet, waiting");
    }
    wait(queue, app, timeout)?;
    let Some(extent) = app.mode() else {
        return Ok(());
    };
    if app.stop.is_set() {
        return Ok(());
    }

    let plan = plan(extent, app.settings.side, app.settings.active_size, app.scale())?;
    debug!(?plan, "Planned layout");
    app.create_surface(plan, qh)?;

    wait(queue, app, timeout)
}

/// Pump until the current phase is satisfied, a stop is requested or a
/// handler failed.
fn wait(queue: &mut EventQueue<App>, app: &mut App, timeout: PollTimeout) -> WlResult<()> {
    while app.waiting() && !app.should_exit() {
        pump(queue, app, timeout)?;
    }
    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halfblank::Side;

    #[test]
    fn parses_shared_flags() {
        let cli = Cli::try_parse_from([
            "halfblank-wl",
            "--side",
            "right",
            "--top-height",
            "900",
            "--name",
            "fold",
        ])
        .unwrap();
        let settings = cli.blank.resolve(&Config::default());
        assert_eq!(settings.side, Side::Right);
        assert_eq!(settings.active_size, 900);
        assert_eq!(settings.name, "fold");
    }

    #[test]
    fn help_exits_zero_and_junk_exits_two() {
        let help = Cli::try_parse_from(["halfblank-wl", "--help"]).unwrap_err();
        assert_eq!(help.exit_code(), 0);
        let junk = Cli::try_parse_from(["halfblank-wl", "--bogus"]).unwrap_err();
        assert_eq!(junk.exit_code(), 2);
    }
}
