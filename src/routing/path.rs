//! Path extraction
//!
//! Turns the adopted nodes of a finished search into the polyline handed to
//! the host: only the start, corner vertices and the goal survive.

use super::node_store::NodeStore;
use crate::common::{Axis, Direction, Point};

/// Vertices of the adopted path in creation order.
///
/// A node that changes direction contributes its parent's position (the
/// corner); the root and the goal contribute their own.
pub fn adopted_path(store: &NodeStore) -> Vec<Point> {
    let mut path: Vec<Point> = Vec::new();
    let mut push = |point: Point| {
        if path.last() != Some(&point) {
            path.push(point);
        }
    };

    for id in store.adopted() {
        let node = &store[id];
        match node.parent {
            None => push(node.position),
            Some(parent) => {
                let parent = &store[parent];
                if parent.direction != node.direction {
                    push(parent.position);
                }
                if node.is_goal {
                    push(node.position);
                }
            }
        }
    }
    path
}

/// Direction of an axis-aligned segment, `None` if it is diagonal or empty
pub fn segment_direction(from: Point, to: Point) -> Option<Direction> {
    if from.y == to.y {
        Direction::towards(from, to, Axis::Horizontal)
    } else if from.x == to.x {
        Direction::towards(from, to, Axis::Vertical)
    } else {
        None
    }
}

/// Every consecutive pair differs in exactly one coordinate
pub fn is_orthogonal(path: &[Point]) -> bool {
    path.windows(2)
        .all(|pair| segment_direction(pair[0], pair[1]).is_some())
}

/// Number of direction changes along the polyline
pub fn turn_count(path: &[Point]) -> usize {
    let directions: Vec<Option<Direction>> = path
        .windows(2)
        .map(|pair| segment_direction(pair[0], pair[1]))
        .collect();
    directions
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .count()
}

pub fn path_length(path: &[Point]) -> f64 {
    path.windows(2)
        .map(|pair| nalgebra::distance(&pair[0], &pair[1]))
        .sum()
}
