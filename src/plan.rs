//! Region planner
//!
//! Splits an extent into an active part and a blank part with one straight
//! cut across the whole screen. Pure and deterministic: every backend calls
//! [`plan`] again whenever the extent changes.

use thiserror::Error;

use crate::barrier::BarrierLine;
use crate::geometry::{Axis, Extent, Rect, Side};

/// Invalid size configuration. Never retried and never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("--active-size must be >= 1")]
    ActiveSizeZero,

    #[error(
        "--active-size must be in 1..{} for {side} (got {active_size}, screen is {extent})",
        last_legal(.extent, .side)
    )]
    ActiveSizeOutOfRange {
        active_size: u64,
        extent: Extent,
        side: Side,
    },

    #[error("output scale must be >= 1 (got {0})")]
    InvalidScale(u32),

    #[error("screen size {0} is empty")]
    EmptyExtent(Extent),
}

fn last_legal(extent: &Extent, side: &Side) -> u32 {
    extent.along(side.axis()).saturating_sub(1)
}

/// Result of splitting an extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Full extent in device pixels
    pub extent: Extent,
    pub side: Side,
    /// Logical → device factor the plan was computed with
    pub scale: u32,
    /// Active size in device pixels, after scale conversion
    pub active_size: u32,
    /// Region kept visible
    pub active: Rect,
    /// Region covered, reserved and kept free of the pointer
    pub blank: Rect,
    /// Thickness of `blank` along the split axis
    pub exclusive_size: u32,
}

/// Blank thickness and exclusive zone in logical (surface) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPlan {
    pub extent: Extent,
    pub blank: Rect,
    pub exclusive_size: u32,
}

/// Split `extent` so that `active_size` (logical units, multiplied by
/// `scale`) stays active on the side opposite to `side`.
pub fn plan(extent: Extent, side: Side, active_size: u32, scale: u32) -> Result<Plan, ConfigError> {
    if scale == 0 {
        return Err(ConfigError::InvalidScale(scale));
    }
    if extent.is_empty() {
        return Err(ConfigError::EmptyExtent(extent));
    }
    if active_size == 0 {
        return Err(ConfigError::ActiveSizeZero);
    }

    let device_active = u64::from(active_size) * u64::from(scale);
    let axis_len = extent.along(side.axis());
    let out_of_range = || ConfigError::ActiveSizeOutOfRange {
        active_size: device_active,
        extent,
        side,
    };
    if device_active >= u64::from(axis_len) {
        return Err(out_of_range());
    }
    let active_size = u32::try_from(device_active).map_err(|_| out_of_range())?;
    let thickness = axis_len - active_size;

    let (width, height) = (extent.width, extent.height);
    let (active, blank) = match side {
        Side::Bottom => (
            Rect::new(0, 0, width, active_size),
            Rect::new(0, active_size, width, thickness),
        ),
        Side::Top => (
            Rect::new(0, thickness, width, active_size),
            Rect::new(0, 0, width, thickness),
        ),
        Side::Left => (
            Rect::new(thickness, 0, active_size, height),
            Rect::new(0, 0, thickness, height),
        ),
        Side::Right => (
            Rect::new(0, 0, active_size, height),
            Rect::new(active_size, 0, thickness, height),
        ),
    };

    Ok(Plan {
        extent,
        side,
        scale,
        active_size,
        active,
        blank,
        exclusive_size: thickness,
    })
}

impl Plan {
    /// Boundary between active and blank along the split axis.
    pub fn boundary(&self) -> u32 {
        match self.side {
            Side::Bottom | Side::Right => self.active_size,
            Side::Top | Side::Left => self.exclusive_size,
        }
    }

    /// Thickness of the blank region along the split axis.
    pub fn blank_thickness(&self) -> u32 {
        match self.side.axis() {
            Axis::Vertical => self.blank.height,
            Axis::Horizontal => self.blank.width,
        }
    }

    /// The plan expressed in logical units (device ÷ scale, rounded down).
    pub fn to_logical(&self) -> LogicalPlan {
        let s = self.scale.max(1);
        let blank = Rect::new(
            self.blank.x / s,
            self.blank.y / s,
            self.blank.width / s,
            self.blank.height / s,
        );
        LogicalPlan {
            extent: Extent::new(self.extent.width / s, self.extent.height / s),
            blank,
            exclusive_size: self.exclusive_size / s,
        }
    }

    /// Pointer barrier on the active/blank boundary.
    pub fn barrier(&self) -> BarrierLine {
        BarrierLine::for_plan(self)
    }

    /// Where to warp a pointer found at `(x, y)`, or `None` if it may stay.
    pub fn clamp_pointer(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        crate::clamp::clamp_pointer(self, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes() -> impl Iterator<Item = (u32, u32)> {
        (1..=12).flat_map(|w| (1..=12).map(move |h| (w, h)))
    }

    #[test]
    fn bottom_scenario() {
        let plan = plan(Extent::new(2560, 1600), Side::Bottom, 1240, 1).unwrap();
        assert_eq!(plan.blank, Rect::new(0, 1240, 2560, 360));
        assert_eq!(plan.active, Rect::new(0, 0, 2560, 1240));
        assert_eq!(plan.exclusive_size, 360);
    }

    #[test]
    fn top_scenario() {
        let plan = plan(Extent::new(2560, 1600), Side::Top, 1240, 1).unwrap();
        assert_eq!(plan.blank, Rect::new(0, 0, 2560, 360));
        assert_eq!(plan.active, Rect::new(0, 360, 2560, 1240));
        assert_eq!(plan.exclusive_size, 360);
    }

    #[test]
    fn left_scenario() {
        let plan = plan(Extent::new(1600, 2560), Side::Left, 800, 1).unwrap();
        assert_eq!(plan.blank, Rect::new(0, 0, 800, 2560));
        assert_eq!(plan.exclusive_size, 800);
    }

    #[test]
    fn right_scenario() {
        let plan = plan(Extent::new(1600, 2560), Side::Right, 1000, 1).unwrap();
        assert_eq!(plan.blank, Rect::new(1000, 0, 600, 2560));
        assert_eq!(plan.active, Rect::new(0, 0, 1000, 2560));
        assert_eq!(plan.exclusive_size, 600);
    }

    #[test]
    fn scaled_scenario() {
        let plan = plan(Extent::new(5120, 3200), Side::Bottom, 1240, 2).unwrap();
        assert_eq!(plan.active_size, 2480);
        assert_eq!(plan.blank, Rect::new(0, 2480, 5120, 720));

        let logical = plan.to_logical();
        assert_eq!(logical.extent, Extent::new(2560, 1600));
        assert_eq!(logical.blank, Rect::new(0, 1240, 2560, 360));
        assert_eq!(logical.exclusive_size, 360);
    }

    #[test]
    fn active_and_blank_tile_the_extent() {
        for (w, h) in sizes() {
            let extent = Extent::new(w, h);
            for side in Side::ALL {
                for active in 1..extent.along(side.axis()) {
                    let plan = plan(extent, side, active, 1).unwrap();
                    assert!(!plan.active.intersects(&plan.blank), "{side} {extent} {active}");
                    assert_eq!(plan.active.area() + plan.blank.area(), extent.bounds().area());
                    for y in 0..h as i64 {
                        for x in 0..w as i64 {
                            assert!(plan.active.contains(x, y) ^ plan.blank.contains(x, y));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn blank_spans_cross_axis_and_matches_exclusive_size() {
        for (w, h) in sizes() {
            let extent = Extent::new(w, h);
            for side in Side::ALL {
                for active in 1..extent.along(side.axis()) {
                    let plan = plan(extent, side, active, 1).unwrap();
                    assert_eq!(plan.blank_thickness(), plan.exclusive_size);
                    match side.axis() {
                        Axis::Vertical => {
                            assert_eq!((plan.blank.x, plan.blank.width), (0, w));
                        }
                        Axis::Horizontal => {
                            assert_eq!((plan.blank.y, plan.blank.height), (0, h));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_range_is_rejected_not_clamped() {
        let extent = Extent::new(2560, 1600);
        assert_eq!(plan(extent, Side::Bottom, 0, 1), Err(ConfigError::ActiveSizeZero));
        for side in Side::ALL {
            let len = extent.along(side.axis());
            for active in [len, len + 1, u32::MAX] {
                assert!(matches!(
                    plan(extent, side, active, 1),
                    Err(ConfigError::ActiveSizeOutOfRange { .. })
                ));
            }
        }
        // Valid logically, out of range once scaled.
        assert!(matches!(
            plan(extent, Side::Bottom, 900, 2),
            Err(ConfigError::ActiveSizeOutOfRange { active_size: 1800, .. })
        ));
        assert!(matches!(
            plan(extent, Side::Bottom, u32::MAX, u32::MAX),
            Err(ConfigError::ActiveSizeOutOfRange { .. })
        ));
    }

    #[test]
    fn one_pixel_blank_strip_is_legal() {
        let plan = plan(Extent::new(2, 2), Side::Bottom, 1, 1).unwrap();
        assert_eq!(plan.blank, Rect::new(0, 1, 2, 1));
        assert_eq!(plan.exclusive_size, 1);
    }

    #[test]
    fn rejects_bad_scale_and_empty_extent() {
        assert_eq!(
            plan(Extent::new(10, 10), Side::Top, 5, 0),
            Err(ConfigError::InvalidScale(0))
        );
        assert!(matches!(
            plan(Extent::new(0, 10), Side::Top, 5, 1),
            Err(ConfigError::EmptyExtent(_))
        ));
    }

    #[test]
    fn plan_is_deterministic() {
        let extent = Extent::new(2560, 1600);
        let first = plan(extent, Side::Left, 700, 1);
        let second = plan(extent, Side::Left, 700, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn boundary_per_side() {
        let extent = Extent::new(2560, 1600);
        assert_eq!(plan(extent, Side::Bottom, 1240, 1).unwrap().boundary(), 1240);
        assert_eq!(plan(extent, Side::Top, 1240, 1).unwrap().boundary(), 360);
        assert_eq!(plan(extent, Side::Left, 2000, 1).unwrap().boundary(), 560);
        assert_eq!(plan(extent, Side::Right, 2000, 1).unwrap().boundary(), 2000);
    }

    #[test]
    fn error_messages_name_the_range() {
        let err = plan(Extent::new(2560, 1600), Side::Bottom, 1600, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "--active-size must be in 1..1599 for bottom (got 1600, screen is 2560x1600)"
        );
    }
}
