//! halfblank-drm
//!
//! Blanks the lower part of the internal panel without any compositor by
//! shrinking the scan-out of its primary plane. Needs DRM master for `half`
//! and `full`; `status` works read-only.

mod card;
mod clip;
mod discover;
mod error;
mod props;
mod status;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use drm::ClientCapability;
use drm::Device;
use halfblank::{Config, Side, plan};
use tracing::{debug, warn};

use crate::card::Card;
use crate::clip::PlaneClip;
use crate::discover::Pipeline;
use crate::error::{DrmError, DrmResult};

#[derive(Debug, Parser)]
#[command(
    name = "halfblank-drm",
    version,
    about = "Shrink the panel's primary DRM plane to its upper part"
)]
struct Cli {
    /// DRM device node [default: /dev/dri/card1 if usable, else card0]
    #[arg(long, value_name = "PATH")]
    card: Option<PathBuf>,

    /// Connector name, e.g. eDP-1 [default: first connected eDP]
    #[arg(long, value_name = "NAME")]
    connector: Option<String>,

    /// Visible height for `half` [default: 1240]
    #[arg(long, value_name = "PX")]
    height: Option<u32>,

    #[arg(value_enum)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Print the current connector, CRTC and plane state as JSON
    Status,
    /// Show only the top `--height` rows
    Half,
    /// Restore the full panel
    Full,
}

fn main() -> ExitCode {
    halfblank::logging::init();
    let cli = Cli::parse();
    halfblank::error::finish("halfblank-drm", run(cli))
}

fn run(cli: Cli) -> DrmResult<()> {
    let config = Config::load().map_err(DrmError::Settings)?;
    let card_path = cli
        .card
        .or(config.drm.card)
        .unwrap_or_else(Card::default_path);
    let connector = cli.connector.or(config.drm.connector);
    let height = cli.height.unwrap_or(config.drm.height);

    let card = Card::open(&card_path)?;
    debug!("Opened {}", card.path().display());

    match card.acquire_master_lock() {
        Ok(()) => debug!("Acquired DRM master"),
        Err(e) if cli.command == Command::Status => {
            warn!("Not DRM master, reading state only: {}", e)
        }
        Err(e) => return Err(DrmError::NotMaster(card_path, e)),
    }

    for cap in [ClientCapability::UniversalPlanes, ClientCapability::Atomic] {
        card.set_client_capability(cap, true)
            .map_err(|e| DrmError::ClientCapability(cap, e))?;
    }

    let pipeline = Pipeline::discover(&card, connector.as_deref())?;

    let region = match cli.command {
        Command::Status => {
            print!("{}", pipeline.status());
            return Ok(());
        }
        Command::Half => plan(pipeline.extent(), Side::Bottom, height, 1)?.active,
        Command::Full => pipeline.extent().bounds(),
    };

    clip::apply(
        &card,
        &pipeline.props,
        pipeline.crtc,
        pipeline.framebuffer,
        &PlaneClip::show(region),
    )
}
