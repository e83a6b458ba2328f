//! Nearest-node queries in world space.

use super::positions::PositionMap;
use super::types::Node;

/// Pick radius in world units at scale 1. Callers divide by the current zoom
/// so the effective radius stays constant in screen pixels.
pub const HIT_RADIUS: f64 = 30.0;

/// Nearest node within `radius` of the world-space query point, or `None`.
/// Nodes without a position are skipped; distance ties keep the node that
/// appears first in `nodes`.
pub fn find_node_near<'a>(
	nodes: &'a [Node],
	positions: &PositionMap,
	wx: f64,
	wy: f64,
	radius: f64,
) -> Option<&'a Node> {
	let mut best: Option<(&Node, f64)> = None;
	for node in nodes {
		let Some(pos) = positions.get(&node.id) else {
			continue;
		};
		let (dx, dy) = (pos.x - wx, pos.y - wy);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist <= radius && best.is_none_or(|(_, d)| dist < d) {
			best = Some((node, dist));
		}
	}
	best.map(|(node, _)| node)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::types::NodeKind;

	fn node(id: &str) -> Node {
		Node {
			id: id.into(),
			title: id.into(),
			summary: String::new(),
			kind: NodeKind::Task,
			url: None,
			color: None,
			completed: false,
			x: None,
			y: None,
		}
	}

	fn positions(entries: &[(&str, f64, f64)]) -> PositionMap {
		let mut map = PositionMap::default();
		for &(id, x, y) in entries {
			map.set(id, x, y, false);
		}
		map
	}

	#[test]
	fn finds_node_within_radius() {
		let nodes = vec![node("a")];
		let map = positions(&[("a", 100.0, 100.0)]);
		for radius in [0.0, 1.0, 30.0, 500.0] {
			let hit = find_node_near(&nodes, &map, 100.0, 100.0, radius);
			assert_eq!(hit.map(|n| n.id.as_str()), Some("a"), "radius {radius}");
		}
	}

	#[test]
	fn misses_node_just_outside_radius() {
		let nodes = vec![node("a")];
		let map = positions(&[("a", 100.0, 100.0)]);
		let radius = 30.0;
		assert!(find_node_near(&nodes, &map, 100.0 + radius + 1.0, 100.0, radius).is_none());
	}

	#[test]
	fn nearest_wins_and_ties_keep_first() {
		let nodes = vec![node("far"), node("near"), node("tie_a"), node("tie_b")];
		let map = positions(&[
			("far", 20.0, 0.0),
			("near", 5.0, 0.0),
			("tie_a", 0.0, 10.0),
			("tie_b", 0.0, -10.0),
		]);
		let hit = find_node_near(&nodes, &map, 0.0, 0.0, 50.0);
		assert_eq!(hit.map(|n| n.id.as_str()), Some("near"));

		let only_ties = &nodes[2..];
		let hit = find_node_near(only_ties, &map, 0.0, 0.0, 50.0);
		assert_eq!(hit.map(|n| n.id.as_str()), Some("tie_a"));
	}

	#[test]
	fn unpositioned_and_empty_inputs() {
		let nodes = vec![node("ghost")];
		let map = PositionMap::default();
		assert!(find_node_near(&nodes, &map, 0.0, 0.0, 1000.0).is_none());
		assert!(find_node_near(&[], &map, 0.0, 0.0, 1000.0).is_none());
	}
}
