//! Mutable viewport position state, kept apart from the immutable domain
//! nodes and indexed by node id.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::Node;

/// Simulation-side position of one node. `pinned` is set once the user has
/// dragged the node; pinned positions win over later persisted coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePos {
	pub x: f64,
	pub y: f64,
	pub pinned: bool,
}

/// Arena of node positions, id → [`NodePos`]. Nodes absent from the map are
/// excluded from hit-testing, rendering and view-fit bounds.
#[derive(Clone, Debug, Default)]
pub struct PositionMap {
	positions: HashMap<String, NodePos>,
}

impl PositionMap {
	pub fn get(&self, id: &str) -> Option<NodePos> {
		self.positions.get(id).copied()
	}

	pub fn set(&mut self, id: &str, x: f64, y: f64, pinned: bool) {
		self.positions.insert(id.to_owned(), NodePos { x, y, pinned });
	}

	/// Reconcile with a full node snapshot. Known pinned nodes keep their
	/// dragged position, nodes with persisted coordinates adopt them, and
	/// brand-new nodes without coordinates are seeded on a phyllotaxis
	/// spiral around the world origin. Ids no longer present are dropped.
	pub fn sync(&mut self, nodes: &[Node]) {
		let mut next = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			let pos = match self.positions.get(&node.id) {
				Some(existing) if existing.pinned => *existing,
				_ => match (node.x, node.y) {
					(Some(x), Some(y)) => NodePos {
						x,
						y,
						pinned: false,
					},
					_ => self
						.positions
						.get(&node.id)
						.copied()
						.unwrap_or_else(|| seed_position(i)),
				},
			};
			next.insert(node.id.clone(), pos);
		}
		self.positions = next;
	}

	/// Axis-aligned bounding box `(min_x, min_y, max_x, max_y)` over the
	/// positions of `nodes`, or `None` when no node is positioned.
	pub fn bounds(&self, nodes: &[Node]) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for node in nodes {
			let Some(pos) = self.get(&node.id) else {
				continue;
			};
			bounds = Some(match bounds {
				None => (pos.x, pos.y, pos.x, pos.y),
				Some((min_x, min_y, max_x, max_y)) => (
					min_x.min(pos.x),
					min_y.min(pos.y),
					max_x.max(pos.x),
					max_y.max(pos.y),
				),
			});
		}
		bounds
	}
}

// Deterministic initial layout for nodes the data layer has never placed,
// matching d3's default phyllotaxis seeding.
fn seed_position(index: usize) -> NodePos {
	let i = index as f64;
	let radius = 10.0 * (0.5 + i).sqrt();
	let angle = i * PI * (3.0 - 5.0_f64.sqrt());
	NodePos {
		x: radius * angle.cos(),
		y: radius * angle.sin(),
		pinned: false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::types::NodeKind;

	fn node(id: &str, x: Option<f64>, y: Option<f64>) -> Node {
		Node {
			id: id.into(),
			title: id.into(),
			summary: String::new(),
			kind: NodeKind::Skill,
			url: None,
			color: None,
			completed: false,
			x,
			y,
		}
	}

	#[test]
	fn sync_adopts_persisted_coordinates() {
		let mut map = PositionMap::default();
		map.sync(&[node("a", Some(10.0), Some(-4.0))]);
		assert_eq!(
			map.get("a"),
			Some(NodePos {
				x: 10.0,
				y: -4.0,
				pinned: false
			})
		);
	}

	#[test]
	fn sync_seeds_unplaced_nodes_deterministically() {
		let nodes = vec![node("a", None, None), node("b", None, None)];
		let mut first = PositionMap::default();
		first.sync(&nodes);
		let mut second = PositionMap::default();
		second.sync(&nodes);
		assert_eq!(first.get("a"), second.get("a"));
		assert_eq!(first.get("b"), second.get("b"));
		assert_ne!(first.get("a"), first.get("b"));
	}

	#[test]
	fn pinned_position_survives_snapshot_replacement() {
		let mut map = PositionMap::default();
		map.sync(&[node("a", Some(0.0), Some(0.0))]);
		map.set("a", 50.0, 50.0, true);
		// Data layer echoes back stale coordinates before the write lands.
		map.sync(&[node("a", Some(0.0), Some(0.0))]);
		assert_eq!(
			map.get("a"),
			Some(NodePos {
				x: 50.0,
				y: 50.0,
				pinned: true
			})
		);
	}

	#[test]
	fn sync_drops_removed_nodes() {
		let mut map = PositionMap::default();
		map.sync(&[node("a", Some(1.0), Some(1.0)), node("b", Some(2.0), Some(2.0))]);
		map.sync(&[node("b", Some(2.0), Some(2.0))]);
		assert!(map.get("a").is_none());
		assert!(map.get("b").is_some());
	}

	#[test]
	fn bounds_cover_positioned_nodes_only() {
		let mut map = PositionMap::default();
		map.set("a", 0.0, 0.0, false);
		map.set("b", 200.0, 200.0, false);
		let nodes = vec![
			node("a", None, None),
			node("b", None, None),
			node("ghost", None, None),
		];
		assert_eq!(map.bounds(&nodes), Some((0.0, 0.0, 200.0, 200.0)));
		assert_eq!(PositionMap::default().bounds(&nodes), None);
	}
}
