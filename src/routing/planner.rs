//! Move generation and heuristics
//!
//! The search loop only talks to these two traits, so alternative grid
//! topologies or estimates can be plugged in without touching it.

use super::obstacles::ObstacleMap;
use crate::common::{Direction, Point};

/// One candidate step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub direction: Direction,
    pub position: Point,
}

/// Trait for generating candidate moves from a position
pub trait MoveGenerator: Send + Sync {
    /// Candidate moves one `step` away from `position`.
    ///
    /// With `preferred` set only that direction is evaluated.
    fn moves(
        &self,
        position: Point,
        step: f64,
        area: &ObstacleMap,
        preferred: Option<Direction>,
    ) -> Vec<Move>;
}

/// Trait for forward estimates towards the goal
pub trait Heuristic: Send + Sync {
    fn estimate(&self, from: Point, to: Point) -> f64;
}

/// Four-connected grid moves, checked in `Direction::ALL` order
#[derive(Debug, Default, Clone, Copy)]
pub struct GridMoves;

impl MoveGenerator for GridMoves {
    fn moves(
        &self,
        position: Point,
        step: f64,
        area: &ObstacleMap,
        preferred: Option<Direction>,
    ) -> Vec<Move> {
        let candidates: &[Direction] = match &preferred {
            Some(direction) => std::slice::from_ref(direction),
            None => &Direction::ALL,
        };

        candidates
            .iter()
            .filter_map(|&direction| {
                let (dx, dy) = direction.offset();
                let next = Point::new(position.x + dx as f64 * step, position.y + dy as f64 * step);
                area.is_free(&next).then_some(Move {
                    direction,
                    position: next,
                })
            })
            .collect()
    }
}

/// Straight-line distance
#[derive(Debug, Default, Clone, Copy)]
pub struct EuclideanHeuristic;

impl Heuristic for EuclideanHeuristic {
    fn estimate(&self, from: Point, to: Point) -> f64 {
        nalgebra::distance(&from, &to)
    }
}

/// Manhattan distance, an alternative estimate that never prefers diagonals
#[derive(Debug, Default, Clone, Copy)]
pub struct ManhattanHeuristic;

impl Heuristic for ManhattanHeuristic {
    fn estimate(&self, from: Point, to: Point) -> f64 {
        (to.x - from.x).abs() + (to.y - from.y).abs()
    }
}
