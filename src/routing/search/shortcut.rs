//! Dogleg straightening
//!
//! When the current node has just turned off its parent's axis, the chain is
//! checked for a turn away and back: a run in the opposite of the current
//! direction, then a run in the parent's ("lost") direction, then the current
//! step. If a straight run in the lost direction from the point where the
//! detour began reaches the current position, the current node is re-parented
//! onto that run.

use super::Search;
use crate::common::{Axis, GridKey, Point};
use crate::routing::cost::Costs;
use crate::routing::node_store::{Node, NodeId};
use log::trace;

impl Search<'_> {
    /// Try to replace a detour ending at `current` with a straight run.
    /// Returns true when the chain was rewired.
    pub(super) fn straighten(&mut self, current: NodeId) -> bool {
        let Some(origin) = self.detour_origin(current) else {
            return false;
        };
        let Some(parent) = self.store[current].parent else {
            return false;
        };
        let lost = self.store[parent].direction;

        let Some(run) = self.straight_run(origin, current) else {
            trace!(
                "[Shortcut] run from {} to {} is obstructed",
                self.store[origin],
                self.store[current]
            );
            return false;
        };

        let mut tail = origin;
        for key in run {
            let position = self.store.point_of(key);
            let costs = self.straight_costs(position);
            let id = match self.store.lookup_key(key) {
                Some(existing) => {
                    let node = &mut self.store[existing];
                    node.parent = Some(tail);
                    node.direction = lost;
                    node.set_costs(costs);
                    self.store.restamp(existing);
                    existing
                }
                None => match self.store.insert(Node::new(position, lost, costs, Some(tail))) {
                    Some(id) => id,
                    None => continue,
                },
            };
            self.store[id].inspected = true;
            tail = id;
        }

        let costs = self.straight_costs(self.store[current].position);
        let node = &mut self.store[current];
        node.parent = Some(tail);
        node.direction = lost;
        node.set_costs(costs);
        self.store.restamp(current);

        trace!("[Shortcut] straightened onto {}", self.store[current]);
        true
    }

    /// Node the detour ending at `current` started from, if the chain has
    /// the away-across-back shape and that node lines up with `current`.
    fn detour_origin(&self, current: NodeId) -> Option<NodeId> {
        let node = &self.store[current];
        let parent = node.parent?;
        let lost = self.store[parent].direction;
        if node.direction.same_axis(lost) {
            return None;
        }

        let turn = self
            .store
            .ancestors(parent)
            .find(|&id| self.store[id].direction != lost)?;
        let away = self.store[turn].direction;
        if away != node.direction.opposite() {
            return None;
        }

        let target = node.position;
        let lost_axis = lost.axis();
        for id in self.store.ancestors(turn) {
            let candidate = &self.store[id];
            if collinear(candidate.position, target, lost_axis) {
                let ahead = match lost_axis {
                    Axis::Horizontal => (target.x - candidate.position.x) * lost.offset().0 as f64,
                    Axis::Vertical => (target.y - candidate.position.y) * lost.offset().1 as f64,
                };
                return (ahead > 0.0).then_some(id);
            }
            if candidate.direction != away {
                break;
            }
        }
        None
    }

    /// Lattice keys strictly between `origin` and `current` along the lost
    /// direction, or `None` if a move is blocked or a position is already
    /// inspected.
    fn straight_run(&self, origin: NodeId, current: NodeId) -> Option<Vec<GridKey>> {
        let parent = self.store[current].parent?;
        let lost = self.store[parent].direction;
        let target = self.store[current].key?;
        let from = self.store[origin].key?;
        let steps = (target.x - from.x).abs() + (target.y - from.y).abs();

        let mut run = Vec::new();
        let mut position = self.store[origin].position;
        for _ in 0..steps {
            let next = self
                .moves
                .moves(position, self.step, self.area, Some(lost))
                .into_iter()
                .next()?;
            let key = self.store.key_of(next.position);
            if key == target {
                return Some(run);
            }
            if let Some(existing) = self.store.lookup_key(key) {
                if self.store[existing].inspected {
                    return None;
                }
            }
            run.push(key);
            position = self.store.point_of(key);
        }
        None
    }

    /// Costs of a node on a straightened run; the inertia discount applies
    fn straight_costs(&self, position: Point) -> Costs {
        Costs {
            forward: self.costs.forward(position, true),
            backward: self.costs.backward(position),
        }
    }
}

fn collinear(a: Point, b: Point, axis: Axis) -> bool {
    match axis {
        Axis::Horizontal => a.y == b.y,
        Axis::Vertical => a.x == b.x,
    }
}

#[cfg(test)]
mod tests {
    use super::super::SearchParams;
    use super::*;
    use crate::common::{Direction, Rect};
    use crate::routing::config::RouteConfig;
    use crate::routing::node_store::NodeStore;
    use crate::routing::obstacles::ObstacleMap;
    use crate::routing::planner::{EuclideanHeuristic, GridMoves};

    /// Chain (0,0)→ up (0,-10) → right (10,-10),(20,-10) → down (20,0)
    fn dogleg(store: &mut NodeStore) -> (NodeId, NodeId) {
        let steps = [
            (0.0, 0.0, Direction::LeftToRight),
            (0.0, -10.0, Direction::BottomToTop),
            (10.0, -10.0, Direction::LeftToRight),
            (20.0, -10.0, Direction::LeftToRight),
            (20.0, 0.0, Direction::TopToBottom),
        ];
        let mut parent = None;
        let mut root = None;
        for (x, y, direction) in steps {
            let costs = Costs {
                forward: 50.0,
                backward: 0.0,
            };
            let id = store
                .insert(Node::new(Point::new(x, y), direction, costs, parent))
                .unwrap();
            store[id].inspected = true;
            root.get_or_insert(id);
            parent = Some(id);
        }
        (root.unwrap(), parent.unwrap())
    }

    fn with_search<R>(area: &ObstacleMap, body: impl FnOnce(&mut Search<'_>) -> R) -> R {
        let mut store = NodeStore::new(Point::new(0.0, 0.0), 10.0);
        let config = RouteConfig::default();
        let mut search = Search::new(
            &mut store,
            SearchParams {
                start: Point::new(0.0, 0.0),
                start_direction: Direction::LeftToRight,
                goal: Point::new(100.0, 0.0),
                goal_direction: Direction::LeftToRight,
                config: &config,
                area,
                moves: &GridMoves,
                heuristic: &EuclideanHeuristic,
            },
        );
        body(&mut search)
    }

    #[test]
    fn dogleg_is_replaced_by_straight_run() {
        with_search(&ObstacleMap::default(), |search| {
            let (root, current) = dogleg(search.store);
            let before = search.store[current].creation_index;

            assert!(search.straighten(current));

            let chain: Vec<Point> = search
                .store
                .ancestors(current)
                .map(|id| search.store[id].position)
                .collect();
            assert_eq!(
                chain,
                vec![Point::new(20.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 0.0)]
            );
            let node = &search.store[current];
            assert_eq!(node.direction, Direction::LeftToRight);
            assert!(node.creation_index > before);
            assert_eq!(node.forward, 75.0);

            let middle = node.parent.unwrap();
            assert_eq!(search.store[middle].parent, Some(root));
            assert!(search.store[middle].inspected);
            assert!(search.store[middle].creation_index < node.creation_index);
            assert!(search.store[root].creation_index < search.store[middle].creation_index);
        });
    }

    #[test]
    fn frontier_node_on_the_run_is_rewired() {
        with_search(&ObstacleMap::default(), |search| {
            let (root, current) = dogleg(search.store);
            let costs = Costs {
                forward: 1.0,
                backward: 1.0,
            };
            let side = search
                .store
                .insert(Node::new(Point::new(10.0, 0.0), Direction::TopToBottom, costs, Some(root)))
                .unwrap();

            assert!(search.straighten(current));
            assert_eq!(search.store[current].parent, Some(side));
            assert_eq!(search.store[side].direction, Direction::LeftToRight);
            assert!(search.store[side].inspected);
        });
    }

    #[test]
    fn inspected_node_on_the_run_blocks_the_shortcut() {
        with_search(&ObstacleMap::default(), |search| {
            let (root, current) = dogleg(search.store);
            let costs = Costs {
                forward: 1.0,
                backward: 1.0,
            };
            let side = search
                .store
                .insert(Node::new(Point::new(10.0, 0.0), Direction::TopToBottom, costs, Some(root)))
                .unwrap();
            search.store[side].inspected = true;

            assert!(!search.straighten(current));
            assert_eq!(search.store[current].direction, Direction::TopToBottom);
        });
    }

    #[test]
    fn obstacle_on_the_run_leaves_path_unchanged() {
        let area = ObstacleMap::new(None, vec![Rect::new(8.0, -2.0, 4.0, 4.0)]);
        with_search(&area, |search| {
            let (_, current) = dogleg(search.store);
            let parent = search.store[current].parent;

            assert!(!search.straighten(current));
            assert_eq!(search.store[current].parent, parent);
        });
    }

    #[test]
    fn plain_corner_is_not_a_dogleg() {
        with_search(&ObstacleMap::default(), |search| {
            let costs = Costs {
                forward: 1.0,
                backward: 0.0,
            };
            let root = search
                .store
                .insert(Node::new(Point::new(0.0, 0.0), Direction::LeftToRight, costs, None))
                .unwrap();
            let a = search
                .store
                .insert(Node::new(Point::new(10.0, 0.0), Direction::LeftToRight, costs, Some(root)))
                .unwrap();
            let b = search
                .store
                .insert(Node::new(Point::new(10.0, 10.0), Direction::TopToBottom, costs, Some(a)))
                .unwrap();

            assert!(!search.straighten(b));
            assert_eq!(search.store[b].parent, Some(a));
        });
    }
}
