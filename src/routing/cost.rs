//! Cost model
//!
//! `forward` is the heuristic estimate to the goal, discounted by `inertia`
//! when a node keeps its parent's direction. `backward` is the Manhattan
//! distance from the start, recomputed directly rather than accumulated.

use super::planner::Heuristic;
use crate::common::{Direction, Point};

/// `|b.x - a.x| + |b.y - a.y|`
pub fn backward(a: Point, b: Point) -> f64 {
    (b.x - a.x).abs() + (b.y - a.y).abs()
}

/// Costs of one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Costs {
    pub forward: f64,
    pub backward: f64,
}

impl Costs {
    pub fn total(&self) -> f64 {
        self.forward + self.backward
    }
}

/// Cost model bound to one search
pub struct CostModel<'a> {
    heuristic: &'a dyn Heuristic,
    start: Point,
    goal: Point,
    inertia: f64,
}

impl<'a> CostModel<'a> {
    pub fn new(heuristic: &'a dyn Heuristic, start: Point, goal: Point, inertia: f64) -> Self {
        CostModel {
            heuristic,
            start,
            goal,
            inertia,
        }
    }

    /// Forward estimate, clamped at zero so costs stay non-negative
    pub fn forward(&self, position: Point, continues_straight: bool) -> f64 {
        let estimate = self.heuristic.estimate(position, self.goal);
        if continues_straight {
            (estimate - self.inertia).max(0.0)
        } else {
            estimate
        }
    }

    pub fn backward(&self, position: Point) -> f64 {
        backward(self.start, position)
    }

    /// Costs of a node reached in `direction` from a node moving in
    /// `parent_direction` (`None` for the start node).
    pub fn evaluate(
        &self,
        position: Point,
        direction: Direction,
        parent_direction: Option<Direction>,
    ) -> Costs {
        Costs {
            forward: self.forward(position, parent_direction == Some(direction)),
            backward: self.backward(position),
        }
    }
}
