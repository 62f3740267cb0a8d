//! Pointer clamp
//!
//! Corrective step run on a timer by the X11 helper: a pointer found inside
//! the blank region goes back to the nearest active row or column. The cross
//! axis is only pulled into the screen bounds.

use crate::geometry::Side;
use crate::plan::Plan;

/// Warp target for a pointer at `(x, y)`, or `None` if it is already legal.
pub fn clamp_pointer(plan: &Plan, x: i32, y: i32) -> Option<(i32, i32)> {
    let width = plan.extent.width as i64;
    let height = plan.extent.height as i64;
    let boundary = plan.boundary() as i64;
    let (px, py) = (x as i64, y as i64);

    let (nx, ny) = match plan.side {
        Side::Bottom if py >= boundary => (clamp(px, width), boundary - 1),
        Side::Top if py < boundary => (clamp(px, width), boundary),
        Side::Left if px < boundary => (boundary, clamp(py, height)),
        Side::Right if px >= boundary => (boundary - 1, clamp(py, height)),
        _ => return None,
    };

    // Boundaries always lie inside the extent, so these fit.
    Some((nx as i32, ny as i32))
}

fn clamp(value: i64, len: i64) -> i64 {
    value.clamp(0, (len - 1).max(0))
}
