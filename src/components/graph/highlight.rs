//! Search-driven highlighting: which nodes match the term, which are
//! one hop away from a match, and which get dimmed.

use std::collections::HashSet;

use super::types::Node;

/// Result of evaluating a search term against the current graph.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
	active: bool,
	matched: HashSet<String>,
	neighbors: HashSet<String>,
}

impl Highlight {
	/// Case-insensitive substring match over title and summary; neighbors of
	/// a match stay lit so local context survives the dimming. A blank term
	/// produces an inactive highlight that dims nothing.
	pub fn compute(term: &str, nodes: &[Node], links: &[(String, String)]) -> Self {
		let term = term.trim().to_lowercase();
		if term.is_empty() {
			return Self::default();
		}

		let mut matched = HashSet::new();
		for node in nodes {
			if node.title.to_lowercase().contains(&term)
				|| node.summary.to_lowercase().contains(&term)
			{
				matched.insert(node.id.clone());
			}
		}

		let mut neighbors = HashSet::new();
		for (source, target) in links {
			if matched.contains(source) {
				neighbors.insert(target.clone());
			}
			if matched.contains(target) {
				neighbors.insert(source.clone());
			}
		}

		Self {
			active: true,
			matched,
			neighbors,
		}
	}

	/// True when this node should render at near-zero opacity.
	pub fn is_dimmed(&self, id: &str) -> bool {
		self.active && !self.matched.contains(id) && !self.neighbors.contains(id)
	}
}
