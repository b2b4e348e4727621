//! Text dump of a node store laid out on its lattice

use super::node_store::{Node, NodeStore};
use crate::common::GridKey;
use std::collections::HashMap;

/// Which node value a grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    Adopted,
    Forward,
    Backward,
    Cost,
    Direction,
    Summary,
}

impl NodeField {
    pub fn format(self, node: &Node) -> String {
        match self {
            NodeField::Adopted => if node.adopted { "*" } else { "-" }.to_string(),
            NodeField::Forward => format!("{:.8}", node.forward),
            NodeField::Backward => format!("{:.8}", node.backward),
            NodeField::Cost => format!("{:.8}", node.cost),
            NodeField::Direction => node.direction.arrow().to_string(),
            NodeField::Summary => node.to_string(),
        }
    }
}

/// Comma-separated grid of the stored nodes, one cell per lattice position.
///
/// Rows run from the smallest to the largest stored lattice row; positions
/// without a node stay empty. Synthetic nodes land in the nearest lattice
/// cell unless a lattice node already holds it. Rows are joined with `\r\n`.
pub fn render_grid(store: &NodeStore, field: NodeField) -> String {
    let mut cells: HashMap<GridKey, &Node> = HashMap::new();
    for (_, node) in store.iter() {
        match node.key {
            Some(key) => {
                cells.insert(key, node);
            }
            None => {
                cells.entry(store.key_of(node.position)).or_insert(node);
            }
        }
    }
    if cells.is_empty() {
        return String::new();
    }

    let min_x = cells.keys().map(|key| key.x).min().unwrap_or_default();
    let max_x = cells.keys().map(|key| key.x).max().unwrap_or_default();
    let min_y = cells.keys().map(|key| key.y).min().unwrap_or_default();
    let max_y = cells.keys().map(|key| key.y).max().unwrap_or_default();

    (min_y..=max_y)
        .map(|y| {
            (min_x..=max_x)
                .map(|x| {
                    cells
                        .get(&GridKey::new(x, y))
                        .map(|node| field.format(node))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}
