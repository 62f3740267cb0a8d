//! Pointer barrier geometry
//!
//! A single segment on the active/blank boundary. The segment spans the whole
//! cross axis and only lets the pointer cross in the blank → active direction.

use crate::geometry::{Axis, Side};
use crate::plan::Plan;

/// Direction in which crossing the barrier stays permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
}

impl Direction {
    /// Direction of travel from the blank region back into the active one.
    pub fn blank_to_active(side: Side) -> Self {
        match side {
            Side::Bottom => Direction::NegativeY,
            Side::Top => Direction::PositiveY,
            Side::Left => Direction::PositiveX,
            Side::Right => Direction::NegativeX,
        }
    }
}

/// Barrier segment in root-window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierLine {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub allow: Direction,
}

impl BarrierLine {
    pub fn for_plan(plan: &Plan) -> Self {
        let boundary = plan.boundary();
        let allow = Direction::blank_to_active(plan.side);
        match plan.side.axis() {
            Axis::Vertical => Self {
                x1: 0,
                y1: boundary,
                x2: plan.extent.width.saturating_sub(1),
                y2: boundary,
                allow,
            },
            Axis::Horizontal => Self {
                x1: boundary,
                y1: 0,
                x2: boundary,
                y2: plan.extent.height.saturating_sub(1),
                allow,
            },
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }
}
