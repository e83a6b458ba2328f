//! Domain types flowing between the data layer and the graph viewport.

/// Kind of a knowledge-graph node; decides its glyph shape and accent color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// Actionable item, drawn as a triangle.
	Task,
	/// Skill entry, drawn as a circle.
	Skill,
	/// Long-term goal, drawn as a square.
	Goal,
	/// Saved external link, drawn as a paired-ellipse chain icon.
	Link,
}

impl NodeKind {
	/// Default accent color for nodes of this kind without an explicit color.
	pub fn accent(self) -> &'static str {
		match self {
			NodeKind::Task => "#34aadc",
			NodeKind::Skill => "#34d17d",
			NodeKind::Goal => "#ff9f0a",
			NodeKind::Link => "#bf5af2",
		}
	}

	/// Human-readable label, used by the legend overlay.
	pub fn label(self) -> &'static str {
		match self {
			NodeKind::Task => "Task",
			NodeKind::Skill => "Skill",
			NodeKind::Goal => "Goal",
			NodeKind::Link => "Link",
		}
	}
}

/// Immutable domain node record. Viewport position state lives in a separate
/// [`PositionMap`](super::positions::PositionMap); the optional `x`/`y` here
/// are only the persisted coordinates handed over by the data layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub title: String,
	pub summary: String,
	pub kind: NodeKind,
	pub url: Option<String>,
	pub color: Option<String>,
	pub completed: bool,
	pub x: Option<f64>,
	pub y: Option<f64>,
}

impl Node {
	/// Accent color: explicit override, otherwise the kind default.
	pub fn color(&self) -> &str {
		self.color.as_deref().unwrap_or_else(|| self.kind.accent())
	}
}

/// A link endpoint as delivered by the data layer: either a raw id or a full
/// node object. Normalized to plain ids at the sync boundary so the rest of
/// the viewport never sees the union.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkEnd {
	Id(String),
	Node(Node),
}

impl LinkEnd {
	/// Resolve the endpoint to its node id.
	pub fn id(&self) -> &str {
		match self {
			LinkEnd::Id(id) => id,
			LinkEnd::Node(node) => &node.id,
		}
	}
}

impl From<&str> for LinkEnd {
	fn from(id: &str) -> Self {
		LinkEnd::Id(id.to_owned())
	}
}

/// An edge between two nodes. Endpoints may dangle transiently during
/// optimistic updates; dangling links are skipped at draw time.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub id: Option<String>,
	pub source: LinkEnd,
	pub target: LinkEnd,
}

/// Full snapshot of the graph, replaced wholesale on every data change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<Node>,
	pub links: Vec<GraphLink>,
}

/// Transient "connect two nodes" UI state. Not persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectMode {
	pub active: bool,
	pub source: Option<String>,
}

impl ConnectMode {
	/// Connect mode armed with a pending source node.
	pub fn from_source(source: &str) -> Self {
		Self {
			active: true,
			source: Some(source.to_owned()),
		}
	}

	/// The inactive state, also used to cancel a pending connection.
	pub fn inactive() -> Self {
		Self::default()
	}
}
