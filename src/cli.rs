//! Command-line flags shared by the Wayland and X11 helpers.

use clap::Args;

use crate::config::Config;
use crate::geometry::Side;

/// Flags describing the split. Unset flags fall back to the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct BlankArgs {
    /// Edge to blank; the opposite edge stays active
    #[arg(long, value_enum, value_name = "SIDE")]
    pub side: Option<Side>,

    /// Pixels kept active along the split axis [default: 1240]
    #[arg(long = "active-size", visible_alias = "top-height", value_name = "PX")]
    pub active_size: Option<u32>,

    /// Name for the blanking surface [default: X1FOLD_HALFBLANK]
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Split settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankSettings {
    pub side: Side,
    pub active_size: u32,
    pub name: String,
}

impl BlankArgs {
    pub fn resolve(&self, config: &Config) -> BlankSettings {
        BlankSettings {
            side: self.side.unwrap_or(config.side),
            active_size: self.active_size.unwrap_or(config.active_size),
            name: self.name.clone().unwrap_or_else(|| config.name.clone()),
        }
    }
}
