//! Halfblank
//!
//! Shared region model for the fold helpers. When the panel is folded only
//! part of it is usable: one side stays active, the other is blanked,
//! reserved from window placement and kept free of the pointer.
//!
//! The backends live in their own crates:
//! - `halfblank-drm`: shrinks the primary DRM plane (no compositor needed)
//! - `halfblank-wl`: black layer-shell surface with an exclusive zone
//! - `halfblank-x11`: dock window with struts plus an XFixes pointer barrier

pub mod barrier;
pub mod clamp;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod plan;
pub mod stop;

pub use barrier::{BarrierLine, Direction};
pub use cli::{BlankArgs, BlankSettings};
pub use config::Config;
pub use error::{Classify, ErrorKind};
pub use geometry::{Axis, Extent, Rect, Side};
pub use plan::{ConfigError, LogicalPlan, Plan, plan};
pub use stop::StopFlag;
