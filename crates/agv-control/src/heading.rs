//! Quarter-turn planning for in-place rotation.

use std::f64::consts::FRAC_PI_2;

use agv_drive::TurnDirection;

/// Quarter turns that bring the heading closest to a target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnPlan {
    pub direction: TurnDirection,
    pub count:     u32,
}

impl TurnPlan {
    pub const NONE: TurnPlan = TurnPlan { direction: TurnDirection::Right, count: 0 };

    /// Plan for a heading change of `delta` radians, positive clockwise.
    ///
    /// `delta` is rounded to the nearest quarter turn and reduced to 0..4
    /// right turns; three right turns become one left.  A non-finite delta
    /// plans no turns.
    pub fn for_delta(delta: f64) -> Self {
        if !delta.is_finite() {
            return Self::NONE;
        }
        let quarters = (delta / FRAC_PI_2).round() as i64;
        match quarters.rem_euclid(4) {
            0 => Self::NONE,
            3 => TurnPlan { direction: TurnDirection::Left, count: 1 },
            n => TurnPlan { direction: TurnDirection::Right, count: n as u32 },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
