//! Layer-surface geometry
//!
//! The overlay is anchored to the three edges around the blank region and
//! sized 0 along the edge it stretches over, so the compositor fills that
//! dimension and treats the surface as a fixed reservation.

use halfblank::{Axis, Plan, Side};
use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_surface_v1::Anchor;

pub fn anchor(side: Side) -> Anchor {
    match side {
        Side::Bottom => Anchor::Bottom | Anchor::Left | Anchor::Right,
        Side::Top => Anchor::Top | Anchor::Left | Anchor::Right,
        Side::Left => Anchor::Left | Anchor::Top | Anchor::Bottom,
        Side::Right => Anchor::Right | Anchor::Top | Anchor::Bottom,
    }
}

/// Requested size and exclusive zone, in surface-local (logical) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerGeometry {
    pub width: u32,
    pub height: u32,
    pub exclusive_zone: i32,
}

impl LayerGeometry {
    pub fn for_plan(plan: &Plan) -> Self {
        let logical = plan.to_logical();
        let thickness = logical.exclusive_size;
        let (width, height) = match plan.side.axis() {
            Axis::Vertical => (0, thickness),
            Axis::Horizontal => (thickness, 0),
        };
        Self {
            width,
            height,
            exclusive_zone: i32::try_from(thickness).unwrap_or(i32::MAX),
        }
    }
}

/// Device-pixel buffer size for a configure of `width`x`height` logical
/// units. Zero dimensions fall back to the planned blank rectangle.
pub fn buffer_size(plan: &Plan, width: u32, height: u32) -> (u32, u32) {
    let logical = plan.to_logical();
    let width = if width == 0 { logical.blank.width } else { width };
    let height = if height == 0 { logical.blank.height } else { height };
    (
        width.saturating_mul(plan.scale),
        height.saturating_mul(plan.scale),
    )
}

/// Scale announced with `wl_surface.set_buffer_scale`. It is the scale
/// `buffer_size` multiplied by, so the buffer always divides evenly.
pub fn buffer_scale(plan: &Plan) -> i32 {
    i32::try_from(plan.scale).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use halfblank::{Extent, plan};

    #[test]
    fn anchors_bound_the_blank_region() {
        assert_eq!(anchor(Side::Bottom), Anchor::Bottom | Anchor::Left | Anchor::Right);
        assert_eq!(anchor(Side::Top), Anchor::Top | Anchor::Left | Anchor::Right);
        assert_eq!(anchor(Side::Left), Anchor::Left | Anchor::Top | Anchor::Bottom);
        assert_eq!(anchor(Side::Right), Anchor::Right | Anchor::Top | Anchor::Bottom);
        for side in Side::ALL {
            assert_eq!(anchor(side).bits().count_ones(), 3);
        }
    }

    #[test]
    fn bottom_strip_fills_width() {
        let p = plan(Extent::new(2560, 1600), Side::Bottom, 1240, 1).unwrap();
        assert_eq!(
            LayerGeometry::for_plan(&p),
            LayerGeometry {
                width: 0,
                height: 360,
                exclusive_zone: 360,
            }
        );
    }

    #[test]
    fn side_strip_fills_height() {
        let p = plan(Extent::new(1600, 2560), Side::Left, 800, 1).unwrap();
        let geometry = LayerGeometry::for_plan(&p);
        assert_eq!((geometry.width, geometry.height), (800, 0));
        assert_eq!(geometry.exclusive_zone, 800);
    }

    #[test]
    fn scaled_output_uses_logical_units() {
        let p = plan(Extent::new(5120, 3200), Side::Bottom, 1240, 2).unwrap();
        assert_eq!(p.blank.height, 720);
        let geometry = LayerGeometry::for_plan(&p);
        assert_eq!(geometry.height, 360);
        assert_eq!(geometry.exclusive_zone, 360);
        assert_eq!(buffer_size(&p, 2560, 360), (5120, 720));
    }

    #[test]
    fn zero_configure_falls_back_to_plan() {
        let p = plan(Extent::new(2560, 1600), Side::Right, 2000, 1).unwrap();
        assert_eq!(buffer_size(&p, 0, 0), (560, 1600));
        assert_eq!(buffer_size(&p, 560, 0), (560, 1600));
    }

    #[test]
    fn buffer_matches_the_announced_scale() {
        for scale in 1..=3 {
            let p = plan(Extent::new(2561 * scale, 1601 * scale), Side::Bottom, 1240, scale).unwrap();
            let announced = buffer_scale(&p);
            assert_eq!(announced, scale as i32);
            for (w, h) in [(1281, 360), (0, 0), (2561, 361)] {
                let (bw, bh) = buffer_size(&p, w, h);
                assert_eq!(bw % scale, 0);
                assert_eq!(bh % scale, 0);
            }
        }
    }
}
