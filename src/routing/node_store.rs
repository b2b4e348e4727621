//! Node store
//!
//! Nodes live in an arena owned by the store and refer to their parent by
//! [`NodeId`]. Lattice positions are keyed by [`GridKey`], one node per
//! position: the first arrival at a position wins and later arrivals are
//! never relaxed.

use super::cost::Costs;
use crate::common::{Direction, GridKey, Point};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Index of a node in its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A visited or frontier position
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Point,
    /// Lattice key, `None` for synthetic terminal nodes
    pub key: Option<GridKey>,
    pub direction: Direction,
    pub forward: f64,
    pub backward: f64,
    pub cost: f64,
    pub inspected: bool,
    pub adopted: bool,
    pub is_goal: bool,
    pub parent: Option<NodeId>,
    /// Assigned by the store on insertion, strictly increasing
    pub creation_index: u64,
}

impl Node {
    pub fn new(position: Point, direction: Direction, costs: Costs, parent: Option<NodeId>) -> Self {
        Node {
            position,
            key: None,
            direction,
            forward: costs.forward,
            backward: costs.backward,
            cost: costs.total(),
            inspected: false,
            adopted: false,
            is_goal: false,
            parent,
            creation_index: 0,
        }
    }

    /// Replace both estimates and recompute `cost`
    pub fn set_costs(&mut self, costs: Costs) {
        self.forward = costs.forward;
        self.backward = costs.backward;
        self.cost = costs.total();
    }

    pub fn frontier_key(&self, id: NodeId) -> FrontierKey {
        FrontierKey {
            cost: self.cost,
            backward: self.backward,
            creation_index: self.creation_index,
            id,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:04};F {:.8};B {:.8};{}({:04}:{:04})",
            if self.adopted { "*" } else { "-" },
            self.creation_index,
            self.forward,
            self.backward,
            self.direction.arrow(),
            self.position.x as i64,
            self.position.y as i64,
        )
    }
}

/// Frontier ordering: ascending cost, then descending backward, then
/// ascending creation index. `Less` means "expand first".
#[derive(Debug, Clone, Copy)]
pub struct FrontierKey {
    pub cost: f64,
    pub backward: f64,
    pub creation_index: u64,
    pub id: NodeId,
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| other.backward.total_cmp(&self.backward))
            .then_with(|| self.creation_index.cmp(&other.creation_index))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Position-keyed arena of nodes for one search
#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: Vec<Node>,
    by_key: HashMap<GridKey, NodeId>,
    next_index: u64,
    origin: Point,
    step: f64,
}

impl Default for NodeStore {
    fn default() -> Self {
        NodeStore::new(Point::origin(), 1.0)
    }
}

impl NodeStore {
    /// Create an empty store whose lattice starts at `origin`
    pub fn new(origin: Point, step: f64) -> Self {
        NodeStore {
            nodes: Vec::new(),
            by_key: HashMap::new(),
            next_index: 0,
            origin,
            step,
        }
    }

    /// Drop every node and restart creation indices
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_key.clear();
        self.next_index = 0;
    }

    /// Clear and move the lattice to a new origin and step
    pub fn reset(&mut self, origin: Point, step: f64) {
        self.clear();
        self.origin = origin;
        self.step = step;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lattice key of the position nearest to `point`
    pub fn key_of(&self, point: Point) -> GridKey {
        GridKey::new(
            ((point.x - self.origin.x) / self.step).round() as i64,
            ((point.y - self.origin.y) / self.step).round() as i64,
        )
    }

    /// Exact lattice position of `key`
    pub fn point_of(&self, key: GridKey) -> Point {
        Point::new(
            self.origin.x + key.x as f64 * self.step,
            self.origin.y + key.y as f64 * self.step,
        )
    }

    /// Insert a lattice node. No-op returning `None` if its position is taken.
    pub fn insert(&mut self, mut node: Node) -> Option<NodeId> {
        let key = self.key_of(node.position);
        if self.by_key.contains_key(&key) {
            return None;
        }
        node.position = self.point_of(key);
        node.key = Some(key);
        let id = self.push(node);
        self.by_key.insert(key, id);
        Some(id)
    }

    /// Append a synthetic node that is not addressable by position
    pub fn attach(&mut self, mut node: Node) -> NodeId {
        node.key = None;
        self.push(node)
    }

    fn push(&mut self, mut node: Node) -> NodeId {
        self.next_index += 1;
        node.creation_index = self.next_index;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Give a node a fresh creation index, as if just inserted
    pub fn restamp(&mut self, id: NodeId) {
        self.next_index += 1;
        self.nodes[id.0].creation_index = self.next_index;
    }

    pub fn lookup(&self, point: Point) -> Option<NodeId> {
        self.lookup_key(self.key_of(point))
    }

    pub fn lookup_key(&self, key: GridKey) -> Option<NodeId> {
        self.by_key.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Uninspected nodes in expansion order
    pub fn frontier(&self) -> Vec<NodeId> {
        let mut keys: Vec<FrontierKey> = self
            .iter()
            .filter(|(_, node)| !node.inspected)
            .map(|(id, node)| node.frontier_key(id))
            .collect();
        keys.sort();
        keys.into_iter().map(|key| key.id).collect()
    }

    /// Best uninspected node, if any
    pub fn next_frontier(&self) -> Option<NodeId> {
        self.iter()
            .filter(|(_, node)| !node.inspected)
            .map(|(id, node)| node.frontier_key(id))
            .min()
            .map(|key| key.id)
    }

    /// Adopted nodes in creation order
    pub fn adopted(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .iter()
            .filter(|(_, node)| node.adopted)
            .map(|(id, _)| id)
            .collect();
        ids.sort_by_key(|id| self.nodes[id.0].creation_index);
        ids
    }

    /// Walk from `id` to the root, `id` first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            store: self,
            next: Some(id),
        }
    }

    /// Mark `id` and every ancestor adopted
    pub fn adopt_chain(&mut self, id: NodeId) {
        let chain: Vec<NodeId> = self.ancestors(id).collect();
        for id in chain {
            self.nodes[id.0].adopted = true;
        }
    }
}

impl Index<NodeId> for NodeStore {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeStore {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

/// Iterator over a parent chain
pub struct Ancestors<'a> {
    store: &'a NodeStore,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.store[current].parent;
        Some(current)
    }
}
