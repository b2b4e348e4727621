//! Obstacle map for routing
//!
//! Holds the optional bounding rectangle and the obstacle rectangles a
//! connector must avoid, and answers point queries against them.

use crate::common::{Point, Rect};

/// Rectangular obstacles plus an optional routing boundary
#[derive(Debug, Clone, Default)]
pub struct ObstacleMap {
    bounds: Option<Rect>,
    obstacles: Vec<Rect>,
}

impl ObstacleMap {
    /// Create a new obstacle map
    pub fn new(bounds: Option<Rect>, obstacles: Vec<Rect>) -> Self {
        ObstacleMap { bounds, obstacles }
    }

    /// Add an obstacle rectangle
    pub fn add_obstacle(&mut self, rect: Rect) {
        self.obstacles.push(rect);
    }

    /// Check if a point falls inside any obstacle
    pub fn is_obstacle(&self, point: &Point) -> bool {
        self.obstacles.iter().any(|rect| rect.contains(point))
    }

    /// Check if a point lies within the boundary (always true without one)
    pub fn in_bounds(&self, point: &Point) -> bool {
        match &self.bounds {
            Some(bounds) => bounds.contains(point),
            None => true,
        }
    }

    /// A point is free when it is in bounds and outside every obstacle
    pub fn is_free(&self, point: &Point) -> bool {
        self.in_bounds(point) && !self.is_obstacle(point)
    }

    /// Check if an axis-aligned segment touches an obstacle, sampling every
    /// `step` along it plus its end point.
    pub fn segment_blocked(&self, from: Point, to: Point, step: f64) -> bool {
        let length = (to - from).norm();
        let samples = if step > 0.0 {
            (length / step).ceil() as usize
        } else {
            1
        };
        let samples = samples.max(1);
        (0..=samples).any(|i| {
            let t = i as f64 / samples as f64;
            let point = from + (to - from) * t;
            self.is_obstacle(&point)
        })
    }
}
