//! `_NET_WM_STRUT` / `_NET_WM_STRUT_PARTIAL` values
//!
//! Only the slot of the blanked edge is non-zero. The partial variant covers
//! the whole cross axis, `0..=extent-1`.

use halfblank::{Plan, Side};

const LEFT: usize = 0;
const RIGHT: usize = 1;
const TOP: usize = 2;
const BOTTOM: usize = 3;

/// `[left, right, top, bottom]`
pub fn strut(plan: &Plan) -> [u32; 4] {
    let mut values = [0; 4];
    values[slot(plan.side)] = plan.exclusive_size;
    values
}

/// `[left, right, top, bottom, left_start_y, left_end_y, right_start_y,
/// right_end_y, top_start_x, top_end_x, bottom_start_x, bottom_end_x]`
pub fn strut_partial(plan: &Plan) -> [u32; 12] {
    let mut values = [0; 12];
    values[slot(plan.side)] = plan.exclusive_size;

    let last_x = plan.extent.width.saturating_sub(1);
    let last_y = plan.extent.height.saturating_sub(1);
    let (start, end, last) = match plan.side {
        Side::Left => (4, 5, last_y),
        Side::Right => (6, 7, last_y),
        Side::Top => (8, 9, last_x),
        Side::Bottom => (10, 11, last_x),
    };
    values[start] = 0;
    values[end] = last;
    values
}

fn slot(side: Side) -> usize {
    match side {
        Side::Left => LEFT,
        Side::Right => RIGHT,
        Side::Top => TOP,
        Side::Bottom => BOTTOM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halfblank::{Extent, plan};

    #[test]
    fn bottom_reserves_the_bottom_edge() {
        let p = plan(Extent::new(2560, 1600), Side::Bottom, 1240, 1).unwrap();
        assert_eq!(strut(&p), [0, 0, 0, 360]);
        assert_eq!(
            strut_partial(&p),
            [0, 0, 0, 360, 0, 0, 0, 0, 0, 0, 0, 2559]
        );
    }

    #[test]
    fn top_reserves_the_top_edge() {
        let p = plan(Extent::new(2560, 1600), Side::Top, 1240, 1).unwrap();
        assert_eq!(strut(&p), [0, 0, 360, 0]);
        assert_eq!(
            strut_partial(&p),
            [0, 0, 360, 0, 0, 0, 0, 0, 0, 2559, 0, 0]
        );
    }

    #[test]
    fn left_and_right_span_the_height() {
        let p = plan(Extent::new(1600, 2560), Side::Left, 800, 1).unwrap();
        assert_eq!(strut(&p), [800, 0, 0, 0]);
        assert_eq!(
            strut_partial(&p),
            [800, 0, 0, 0, 0, 2559, 0, 0, 0, 0, 0, 0]
        );

        let p = plan(Extent::new(1600, 2560), Side::Right, 1000, 1).unwrap();
        assert_eq!(strut(&p), [0, 600, 0, 0]);
        assert_eq!(
            strut_partial(&p),
            [0, 600, 0, 0, 0, 0, 0, 2559, 0, 0, 0, 0]
        );
    }

    #[test]
    fn exactly_one_edge_is_reserved() {
        for side in Side::ALL {
            let p = plan(Extent::new(40, 30), side, 7, 1).unwrap();
            let s = strut(&p);
            assert_eq!(s.iter().filter(|v| **v != 0).count(), 1);
            assert_eq!(s.iter().sum::<u32>(), p.exclusive_size);
            assert_eq!(strut_partial(&p)[..4], s);
        }
    }
}
