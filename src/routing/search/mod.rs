//! Best-first search loop
//!
//! Expands the cheapest frontier node until one lands inside the goal region
//! (the goal inflated by one step on every side), then squares the path onto
//! the exact goal with at most two synthetic nodes.

mod shortcut;

use super::config::RouteConfig;
use super::cost::CostModel;
use super::node_store::{FrontierKey, Node, NodeId, NodeStore};
use super::obstacles::ObstacleMap;
use super::planner::{Heuristic, MoveGenerator};
use crate::common::{Axis, Direction, Point, Rect};
use log::{debug, trace};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Samples per step when checking synthetic legs against obstacles
const LEG_SAMPLES: f64 = 10.0;

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The goal was reached and the adopted chain is complete
    Found,
    /// Start or goal lies inside an obstacle
    Unreachable,
    /// The frontier ran dry or the expansion limit was hit
    Exhausted,
    /// Cancelled before reaching the goal
    Cancelled,
}

/// Summary of one run of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub expansions: usize,
    /// Goal node when the outcome is `Found`
    pub terminal: Option<NodeId>,
}

/// Inputs of one search
pub struct SearchParams<'a> {
    pub start: Point,
    pub start_direction: Direction,
    pub goal: Point,
    pub goal_direction: Direction,
    pub config: &'a RouteConfig,
    pub area: &'a ObstacleMap,
    pub moves: &'a dyn MoveGenerator,
    pub heuristic: &'a dyn Heuristic,
}

/// One search over a borrowed node store
pub struct Search<'a> {
    store: &'a mut NodeStore,
    area: &'a ObstacleMap,
    moves: &'a dyn MoveGenerator,
    costs: CostModel<'a>,
    start: Point,
    start_direction: Direction,
    goal: Point,
    goal_direction: Direction,
    step: f64,
    max_expansions: usize,
    frontier: BinaryHeap<Reverse<FrontierKey>>,
}

impl<'a> Search<'a> {
    pub fn new(store: &'a mut NodeStore, params: SearchParams<'a>) -> Self {
        Search {
            store,
            area: params.area,
            moves: params.moves,
            costs: CostModel::new(
                params.heuristic,
                params.start,
                params.goal,
                params.config.inertia,
            ),
            start: params.start,
            start_direction: params.start_direction,
            goal: params.goal,
            goal_direction: params.goal_direction,
            step: params.config.step,
            max_expansions: params.config.max_expansions,
            frontier: BinaryHeap::new(),
        }
    }

    /// Clear the store, seed the start node and run to completion.
    ///
    /// `cancelled` is polled at the top of every iteration and again after
    /// each expansion.
    pub fn run(mut self, cancelled: &dyn Fn() -> bool) -> SearchReport {
        self.store.reset(self.start, self.step);

        if self.area.is_obstacle(&self.start) || self.area.is_obstacle(&self.goal) {
            debug!(
                "[Search] Unreachable: start ({:.2},{:.2}) or goal ({:.2},{:.2}) inside an obstacle",
                self.start.x, self.start.y, self.goal.x, self.goal.y
            );
            return self.report(SearchOutcome::Unreachable, 0, None);
        }

        let root_costs = self.costs.evaluate(self.start, self.start_direction, None);
        if let Some(root) = self
            .store
            .insert(Node::new(self.start, self.start_direction, root_costs, None))
        {
            self.push_frontier(root);
        }

        let mut expansions = 0;
        let mut current = self.pop_frontier();

        while let Some(id) = current {
            if cancelled() {
                return self.cancel_at(id, expansions);
            }
            if expansions >= self.max_expansions {
                debug!("[Search] Exhausted: expansion limit {} reached", self.max_expansions);
                return self.report(SearchOutcome::Exhausted, expansions, None);
            }

            self.store[id].inspected = true;
            expansions += 1;
            trace!("[Search] expand {}", self.store[id]);

            let position = self.store[id].position;
            if self.in_goal_region(position) {
                match self.terminal_legs(position) {
                    Some(legs) => {
                        let terminal = self.finish(id, legs);
                        debug!("[Search] Found goal after {} expansions", expansions);
                        return self.report(SearchOutcome::Found, expansions, Some(terminal));
                    }
                    None => trace!("[Search] no clear leg from {} to the goal", self.store[id]),
                }
            }

            self.straighten(id);
            self.expand(id);

            if cancelled() {
                return self.cancel_at(id, expansions);
            }
            current = self.pop_frontier();
        }

        debug!("[Search] Exhausted: frontier empty after {} expansions", expansions);
        self.report(SearchOutcome::Exhausted, expansions, None)
    }

    fn report(&self, outcome: SearchOutcome, expansions: usize, terminal: Option<NodeId>) -> SearchReport {
        SearchReport {
            outcome,
            expansions,
            terminal,
        }
    }

    /// The partial chain is adopted for diagnostics only; no path is reported
    fn cancel_at(&mut self, id: NodeId, expansions: usize) -> SearchReport {
        debug!("[Search] Cancelled after {} expansions", expansions);
        if expansions > 0 {
            self.store.adopt_chain(id);
        }
        self.report(SearchOutcome::Cancelled, expansions, None)
    }

    fn push_frontier(&mut self, id: NodeId) {
        let key = self.store[id].frontier_key(id);
        self.frontier.push(Reverse(key));
    }

    /// Pop the best live entry. Entries whose node was inspected or re-costed
    /// since being pushed are stale and skipped.
    fn pop_frontier(&mut self) -> Option<NodeId> {
        while let Some(Reverse(key)) = self.frontier.pop() {
            let node = &self.store[key.id];
            if !node.inspected && node.frontier_key(key.id) == key {
                return Some(key.id);
            }
        }
        None
    }

    fn in_goal_region(&self, position: Point) -> bool {
        Rect::centered(self.goal, 0.0, 0.0)
            .inflate(self.step)
            .contains(&position)
    }

    /// Insert every unvisited neighbour of `id` with `id` as parent
    fn expand(&mut self, id: NodeId) {
        let (position, direction) = {
            let node = &self.store[id];
            (node.position, node.direction)
        };

        for candidate in self.moves.moves(position, self.step, self.area, None) {
            let key = self.store.key_of(candidate.position);
            if self.store.lookup_key(key).is_some() {
                continue;
            }
            let position = self.store.point_of(key);
            let costs = self.costs.evaluate(position, candidate.direction, Some(direction));
            if let Some(child) = self
                .store
                .insert(Node::new(position, candidate.direction, costs, Some(id)))
            {
                self.push_frontier(child);
            }
        }
    }

    /// Attach the synthetic legs onto the exact goal and adopt the chain
    fn finish(&mut self, id: NodeId, legs: Vec<(Direction, Point)>) -> NodeId {
        let mut tail = id;
        for (direction, point) in legs {
            let parent_direction = self.store[tail].direction;
            let costs = self.costs.evaluate(point, direction, Some(parent_direction));
            let mut node = Node::new(point, direction, costs, Some(tail));
            node.inspected = true;
            tail = self.store.attach(node);
        }

        self.store[tail].is_goal = true;
        self.store.adopt_chain(tail);
        tail
    }

    /// Legs from `position` to the goal: none when already on it, one when
    /// the residual lies on a single axis, else an L-bend. `None` when every
    /// candidate leg touches an obstacle.
    fn terminal_legs(&self, position: Point) -> Option<Vec<(Direction, Point)>> {
        let goal = self.goal;
        let dx = goal.x - position.x;
        let dy = goal.y - position.y;

        if dx == 0.0 && dy == 0.0 {
            return Some(Vec::new());
        }
        if dx == 0.0 || dy == 0.0 {
            if self.leg_blocked(position, goal) {
                return None;
            }
            let axis = if dx == 0.0 { Axis::Vertical } else { Axis::Horizontal };
            return Some(
                Direction::towards(position, goal, axis)
                    .map(|direction| vec![(direction, goal)])
                    .unwrap_or_default(),
            );
        }

        let preferred = if dx.abs() > dy.abs() {
            Axis::Horizontal
        } else if dy.abs() > dx.abs() {
            Axis::Vertical
        } else {
            self.goal_direction.axis().perpendicular()
        };

        let first_axis = if !self.bend_blocked(position, preferred) {
            preferred
        } else if !self.bend_blocked(position, preferred.perpendicular()) {
            preferred.perpendicular()
        } else {
            return None;
        };

        let bend = bend_point(position, goal, first_axis);
        let mut legs = Vec::with_capacity(2);
        if let Some(direction) = Direction::towards(position, bend, first_axis) {
            legs.push((direction, bend));
        }
        if let Some(direction) = Direction::towards(bend, goal, first_axis.perpendicular()) {
            legs.push((direction, goal));
        }
        Some(legs)
    }

    fn bend_blocked(&self, position: Point, first_axis: Axis) -> bool {
        let bend = bend_point(position, self.goal, first_axis);
        self.leg_blocked(position, bend) || self.leg_blocked(bend, self.goal)
    }

    fn leg_blocked(&self, from: Point, to: Point) -> bool {
        self.area
            .segment_blocked(from, to, self.step / LEG_SAMPLES)
    }
}

/// Corner of the L from `from` to `to` that first moves along `first_axis`
fn bend_point(from: Point, to: Point, first_axis: Axis) -> Point {
    match first_axis {
        Axis::Horizontal => Point::new(to.x, from.y),
        Axis::Vertical => Point::new(from.x, to.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::planner::{EuclideanHeuristic, GridMoves};
    use std::cell::Cell;

    fn run(
        store: &mut NodeStore,
        start: Point,
        goal: Point,
        area: &ObstacleMap,
        config: &RouteConfig,
        cancelled: &dyn Fn() -> bool,
    ) -> SearchReport {
        let search = Search::new(
            store,
            SearchParams {
                start,
                start_direction: Direction::LeftToRight,
                goal,
                goal_direction: Direction::LeftToRight,
                config,
                area,
                moves: &GridMoves,
                heuristic: &EuclideanHeuristic,
            },
        );
        search.run(cancelled)
    }

    #[test]
    fn straight_run_reaches_goal_with_single_synthetic_node() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &ObstacleMap::default(),
            &config,
            &|| false,
        );

        assert_eq!(report.outcome, SearchOutcome::Found);
        let terminal = report.terminal.unwrap();
        assert!(store[terminal].is_goal);
        assert_eq!(store[terminal].position, Point::new(100.0, 0.0));
        assert_eq!(store[terminal].key, None);
        let parent = store[terminal].parent.unwrap();
        assert_eq!(store[parent].position, Point::new(90.0, 0.0));
        assert_eq!(store.adopted().len(), 11);
        assert!(store.adopted().iter().all(|&id| store[id].position.y == 0.0));
    }

    #[test]
    fn obstacle_on_goal_is_unreachable() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let area = ObstacleMap::new(None, vec![Rect::new(90.0, -10.0, 20.0, 20.0)]);
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &area,
            &config,
            &|| false,
        );
        assert_eq!(report.outcome, SearchOutcome::Unreachable);
        assert_eq!(report.expansions, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn enclosed_goal_exhausts_the_bounded_frontier() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let walls = vec![
            Rect::new(70.0, -35.0, 5.0, 70.0),
            Rect::new(125.0, -35.0, 5.0, 70.0),
            Rect::new(70.0, -35.0, 60.0, 5.0),
            Rect::new(70.0, 30.0, 60.0, 5.0),
        ];
        let area = ObstacleMap::new(Some(Rect::new(-50.0, -50.0, 200.0, 100.0)), walls);
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &area,
            &config,
            &|| false,
        );
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        assert!(store.iter().all(|(_, node)| node.inspected));
    }

    #[test]
    fn expansion_limit_stops_unbounded_search() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default().with_max_expansions(25);
        let area = ObstacleMap::new(
            None,
            vec![
                Rect::new(70.0, -35.0, 5.0, 70.0),
                Rect::new(125.0, -35.0, 5.0, 70.0),
                Rect::new(70.0, -35.0, 60.0, 5.0),
                Rect::new(70.0, 30.0, 60.0, 5.0),
            ],
        );
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &area,
            &config,
            &|| false,
        );
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        assert_eq!(report.expansions, 25);
    }

    #[test]
    fn cancellation_before_first_expansion_adopts_nothing() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &ObstacleMap::default(),
            &config,
            &|| true,
        );
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert_eq!(report.expansions, 0);
        assert!(store.adopted().is_empty());
    }

    #[test]
    fn cancellation_mid_run_adopts_partial_chain() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let polls = Cell::new(0);
        let cancelled = || {
            polls.set(polls.get() + 1);
            polls.get() > 6
        };
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &ObstacleMap::default(),
            &config,
            &cancelled,
        );
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert_eq!(report.terminal, None);
        assert_eq!(report.expansions, 3);
        assert!(!store.adopted().is_empty());
        assert!(store.iter().all(|(_, node)| !node.is_goal));
    }

    #[test]
    fn l_bend_prefers_larger_residual_axis() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(8.0, 3.0),
            &ObstacleMap::default(),
            &config,
            &|| false,
        );
        assert_eq!(report.outcome, SearchOutcome::Found);
        let goal = report.terminal.unwrap();
        let bend = store[goal].parent.unwrap();
        assert_eq!(store[bend].position, Point::new(8.0, 0.0));
        assert_eq!(store[bend].direction, Direction::LeftToRight);
        assert_eq!(store[goal].direction, Direction::TopToBottom);
    }

    #[test]
    fn l_bend_avoids_blocked_corner() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let area = ObstacleMap::new(None, vec![Rect::new(7.0, -1.0, 2.0, 2.0)]);
        let report = run(
            &mut store,
            Point::new(0.0, 0.0),
            Point::new(8.0, 3.0),
            &area,
            &config,
            &|| false,
        );
        assert_eq!(report.outcome, SearchOutcome::Found);
        let goal = report.terminal.unwrap();
        let bend = store[goal].parent.unwrap();
        assert_eq!(store[bend].position, Point::new(0.0, 3.0));
    }

    #[test]
    fn goal_hit_without_clear_leg_keeps_searching() {
        let mut store = NodeStore::default();
        let config = RouteConfig::default();
        let area = ObstacleMap::new(
            None,
            vec![Rect::new(88.0, -2.0, 4.0, 4.0), Rect::new(98.0, 8.0, 4.0, 4.0)],
        );
        let report = run(
            &mut store,
            Point::new(0.0, 10.0),
            Point::new(100.0, 0.0),
            &area,
            &config,
            &|| false,
        );
        assert_eq!(report.outcome, SearchOutcome::Found);

        // (90,10) is reached first but both of its bends are blocked
        let blocked = store.lookup(Point::new(90.0, 10.0)).unwrap();
        assert!(store[blocked].inspected);
        assert!(!store[blocked].is_goal);

        let path = crate::routing::path::adopted_path(&store);
        assert_eq!(path.last(), Some(&Point::new(100.0, 0.0)));
        assert!(path.iter().all(|p| !area.is_obstacle(p)), "{:?}", path);
    }
}
