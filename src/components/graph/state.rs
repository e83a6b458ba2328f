//! Viewport state: the gesture state machine, camera helpers and the
//! reconciliation of data snapshots pushed in by collaborators.

use super::camera::{CameraTween, ViewTransform};
use super::highlight::Highlight;
use super::hit::{HIT_RADIUS, find_node_near};
use super::positions::PositionMap;
use super::types::{ConnectMode, GraphData, Node};

/// Screen-pixel movement before a press becomes a drag or pan.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;
/// Zoom level used when centering the camera on a single node.
pub const CENTER_ZOOM: f64 = 1.5;
/// Duration of camera tweens, seconds.
pub const TWEEN_SECS: f64 = 0.75;
/// Padding kept around the node bounding box by recenter-to-fit.
pub const FIT_PADDING: f64 = 100.0;

/// Per-pointer gesture. Exactly one is active at a time; connect mode is
/// externally-owned UI state mirrored into [`GraphState::connect`].
#[derive(Clone, Debug, PartialEq)]
enum Gesture {
	Idle,
	/// Button is down but the pointer has not crossed the drag threshold.
	Pressed {
		sx: f64,
		sy: f64,
		node: Option<String>,
	},
	Panning {
		sx: f64,
		sy: f64,
		origin_x: f64,
		origin_y: f64,
	},
	Dragging {
		id: String,
	},
}

/// Outbound notifications for the surrounding UI / data layer. The state
/// already reflects each event by the time it is returned (optimistic
/// updates; collaborators own retries and error surfacing).
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	NodeSelected(Option<String>),
	NodePositionChanged { id: String, x: f64, y: f64 },
	ConnectRequested { source: String, target: String },
	ConnectModeChanged(ConnectMode),
}

pub struct GraphState {
	pub nodes: Vec<Node>,
	/// Links normalized to resolved id pairs at the sync boundary.
	pub links: Vec<(String, String)>,
	pub positions: PositionMap,
	pub transform: ViewTransform,
	pub selected: Option<String>,
	pub connect: ConnectMode,
	pub highlight: Highlight,
	pub hovered: Option<String>,
	pub width: f64,
	pub height: f64,
	search_term: String,
	gesture: Gesture,
	tween: Option<CameraTween>,
}

impl GraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			nodes: Vec::new(),
			links: Vec::new(),
			positions: PositionMap::default(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			selected: None,
			connect: ConnectMode::default(),
			highlight: Highlight::default(),
			hovered: None,
			width,
			height,
			search_term: String::new(),
			gesture: Gesture::Idle,
			tween: None,
		}
	}

	/// Replace the graph with a fresh snapshot. Link endpoints are resolved
	/// to ids here, once; positions and highlight sets are recomputed.
	pub fn sync_data(&mut self, data: &GraphData) {
		self.nodes = data.nodes.clone();
		self.links = data
			.links
			.iter()
			.map(|link| (link.source.id().to_owned(), link.target.id().to_owned()))
			.collect();
		self.positions.sync(&self.nodes);
		self.refresh_highlight();
	}

	pub fn set_search_term(&mut self, term: &str) {
		if self.search_term != term {
			self.search_term = term.to_owned();
			self.refresh_highlight();
		}
	}

	pub fn set_selected(&mut self, selected: Option<String>) {
		self.selected = selected;
	}

	pub fn set_connect_mode(&mut self, connect: ConnectMode) {
		self.connect = connect;
	}

	fn refresh_highlight(&mut self) {
		self.highlight = Highlight::compute(&self.search_term, &self.nodes, &self.links);
	}

	/// Hit-test a screen-space point. The radius is divided by the current
	/// zoom so picking feels identical at every zoom level, and the same
	/// query decides both what is clickable and what is draggable.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<&Node> {
		let (wx, wy) = self.transform.screen_to_world(sx, sy);
		find_node_near(
			&self.nodes,
			&self.positions,
			wx,
			wy,
			HIT_RADIUS / self.transform.k,
		)
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.tween = None;
		let node = self.node_at(sx, sy).map(|n| n.id.clone());
		self.gesture = Gesture::Pressed { sx, sy, node };
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match self.gesture.clone() {
			Gesture::Idle => {
				self.hovered = self.node_at(sx, sy).map(|n| n.id.clone());
			}
			Gesture::Pressed {
				sx: px,
				sy: py,
				node,
			} => {
				if (sx - px).hypot(sy - py) <= DRAG_THRESHOLD_PX {
					return;
				}
				// Node drags are disabled while a connection is pending;
				// dragging anywhere then pans the camera.
				match node {
					Some(id) if !self.connect.active => {
						if let Some(pos) = self.positions.get(&id) {
							self.positions.set(&id, pos.x, pos.y, true);
						}
						self.gesture = Gesture::Dragging { id };
						self.drag_to(sx, sy);
					}
					_ => {
						self.gesture = Gesture::Panning {
							sx: px,
							sy: py,
							origin_x: self.transform.x,
							origin_y: self.transform.y,
						};
						self.pan_to(sx, sy);
					}
				}
			}
			Gesture::Panning { .. } => self.pan_to(sx, sy),
			Gesture::Dragging { .. } => self.drag_to(sx, sy),
		}
	}

	fn pan_to(&mut self, sx: f64, sy: f64) {
		if let Gesture::Panning {
			sx: px,
			sy: py,
			origin_x,
			origin_y,
		} = self.gesture
		{
			self.transform.x = origin_x + (sx - px);
			self.transform.y = origin_y + (sy - py);
		}
	}

	fn drag_to(&mut self, sx: f64, sy: f64) {
		if let Gesture::Dragging { id } = &self.gesture {
			let (wx, wy) = self.transform.screen_to_world(sx, sy);
			self.positions.set(&id.clone(), wx, wy, true);
		}
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Vec<GraphEvent> {
		let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
		let events = match gesture {
			Gesture::Pressed { node, .. } => self.click(node),
			Gesture::Dragging { id } => self.commit_drag(id),
			Gesture::Panning { .. } | Gesture::Idle => Vec::new(),
		};
		self.hovered = self.node_at(sx, sy).map(|n| n.id.clone());
		events
	}

	/// A press+release without crossing the drag threshold.
	fn click(&mut self, node: Option<String>) -> Vec<GraphEvent> {
		if self.connect.active {
			let source = self.connect.source.take();
			self.connect = ConnectMode::inactive();
			let mut events = vec![GraphEvent::ConnectModeChanged(self.connect.clone())];
			// Clicking empty space cancels the pending connection silently.
			if let (Some(source), Some(target)) = (source, node) {
				events.push(GraphEvent::ConnectRequested { source, target });
			}
			events
		} else {
			self.selected = node.clone();
			vec![GraphEvent::NodeSelected(node)]
		}
	}

	fn commit_drag(&mut self, id: String) -> Vec<GraphEvent> {
		match self.positions.get(&id) {
			Some(pos) => vec![GraphEvent::NodePositionChanged {
				id,
				x: pos.x,
				y: pos.y,
			}],
			None => Vec::new(),
		}
	}

	/// Pointer left the canvas: an in-flight drag is committed so the last
	/// position is not lost, everything else just resets.
	pub fn pointer_leave(&mut self) -> Vec<GraphEvent> {
		self.hovered = None;
		let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
		match gesture {
			Gesture::Dragging { id } => self.commit_drag(id),
			_ => Vec::new(),
		}
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.tween = None;
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform.zoom_at(sx, sy, factor);
	}

	/// CSS cursor matching the current gesture and hover state.
	pub fn cursor(&self) -> &'static str {
		match self.gesture {
			Gesture::Panning { .. } | Gesture::Dragging { .. } => "grabbing",
			_ if self.hovered.is_some() => "pointer",
			_ if self.connect.active => "crosshair",
			_ => "grab",
		}
	}

	/// Advance the in-flight camera tween, if any.
	pub fn tick(&mut self, dt: f64) {
		if let Some(tween) = &mut self.tween {
			self.transform = tween.tick(dt);
			if tween.finished() {
				self.tween = None;
			}
		}
	}

	/// Animate the camera so `id` lands at canvas center at [`CENTER_ZOOM`].
	pub fn center_on_node(&mut self, id: &str) {
		let Some(pos) = self.positions.get(id) else {
			return;
		};
		let target =
			ViewTransform::centered_on(pos.x, pos.y, CENTER_ZOOM, self.width, self.height);
		self.tween = Some(CameraTween::new(self.transform, target, TWEEN_SECS));
	}

	/// Animate the camera to fit every positioned node with [`FIT_PADDING`]
	/// around the bounding box, never zooming in past 1x. No-op when no node
	/// has a position.
	pub fn recenter_to_fit(&mut self) {
		let Some((min_x, min_y, max_x, max_y)) = self.positions.bounds(&self.nodes) else {
			return;
		};
		let (box_w, box_h) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let scale_x = (self.width - FIT_PADDING * 2.0) / box_w;
		let scale_y = (self.height - FIT_PADDING * 2.0) / box_h;
		let k = scale_x.min(scale_y).min(1.0);
		let target = ViewTransform::centered_on(
			(min_x + max_x) / 2.0,
			(min_y + max_y) / 2.0,
			k,
			self.width,
			self.height,
		);
		self.tween = Some(CameraTween::new(self.transform, target, TWEEN_SECS));
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::types::{GraphLink, LinkEnd, NodeKind};

	fn node(id: &str, x: f64, y: f64) -> Node {
		Node {
			id: id.into(),
			title: id.into(),
			summary: String::new(),
			kind: NodeKind::Goal,
			url: None,
			color: None,
			completed: false,
			x: Some(x),
			y: Some(y),
		}
	}

	/// 400x400 viewport with an identity camera, so screen == world.
	fn state_with(nodes: Vec<Node>) -> GraphState {
		let mut state = GraphState::new(400.0, 400.0);
		state.transform = ViewTransform::default();
		state.sync_data(&GraphData {
			nodes,
			links: Vec::new(),
		});
		state
	}

	fn click(state: &mut GraphState, sx: f64, sy: f64) -> Vec<GraphEvent> {
		state.pointer_down(sx, sy);
		state.pointer_up(sx, sy)
	}

	#[test]
	fn selecting_b_replaces_a_and_empty_click_deselects() {
		let mut state = state_with(vec![node("A", 0.0, 0.0), node("B", 100.0, 0.0)]);
		let events = click(&mut state, 0.0, 0.0);
		assert_eq!(events, vec![GraphEvent::NodeSelected(Some("A".into()))]);
		assert_eq!(state.selected.as_deref(), Some("A"));

		let events = click(&mut state, 100.0, 0.0);
		assert_eq!(events, vec![GraphEvent::NodeSelected(Some("B".into()))]);
		assert_eq!(state.selected.as_deref(), Some("B"));

		let events = click(&mut state, 250.0, 250.0);
		assert_eq!(events, vec![GraphEvent::NodeSelected(None)]);
		assert_eq!(state.selected, None);
	}

	#[test]
	fn connect_click_on_node_emits_one_request_and_deactivates() {
		let mut state = state_with(vec![node("A", 0.0, 0.0), node("B", 100.0, 0.0)]);
		state.set_connect_mode(ConnectMode::from_source("A"));

		let events = click(&mut state, 100.0, 0.0);
		assert_eq!(
			events,
			vec![
				GraphEvent::ConnectModeChanged(ConnectMode::inactive()),
				GraphEvent::ConnectRequested {
					source: "A".into(),
					target: "B".into(),
				},
			]
		);
		assert!(!state.connect.active);
		// A connect click never changes the selection.
		assert_eq!(state.selected, None);
	}

	#[test]
	fn connect_click_on_empty_space_cancels_without_request() {
		let mut state = state_with(vec![node("A", 0.0, 0.0)]);
		state.set_connect_mode(ConnectMode::from_source("A"));

		let events = click(&mut state, 300.0, 300.0);
		assert_eq!(
			events,
			vec![GraphEvent::ConnectModeChanged(ConnectMode::inactive())]
		);
		assert!(!state.connect.active);
	}

	#[test]
	fn drag_commits_final_position_exactly_once() {
		let mut state = state_with(vec![node("A", 0.0, 0.0)]);
		state.pointer_down(0.0, 0.0);
		state.pointer_move(10.0, 10.0);
		state.pointer_move(30.0, 25.0);
		state.pointer_move(50.0, 50.0);
		let events = state.pointer_up(50.0, 50.0);

		let commits: Vec<_> = events
			.iter()
			.filter(|e| matches!(e, GraphEvent::NodePositionChanged { .. }))
			.collect();
		assert_eq!(commits.len(), 1);
		assert_eq!(
			events,
			vec![GraphEvent::NodePositionChanged {
				id: "A".into(),
				x: 50.0,
				y: 50.0,
			}]
		);
		// Node stays pinned where it was dropped.
		let pos = state.positions.get("A").unwrap();
		assert!(pos.pinned);
		assert_eq!((pos.x, pos.y), (50.0, 50.0));
	}

	#[test]
	fn drag_is_disabled_while_connecting() {
		let mut state = state_with(vec![node("A", 0.0, 0.0)]);
		state.set_connect_mode(ConnectMode::from_source("A"));
		state.pointer_down(0.0, 0.0);
		state.pointer_move(60.0, 0.0);
		let events = state.pointer_up(60.0, 0.0);
		// The gesture became a pan, so no position commit and no click.
		assert!(events.is_empty());
		let pos = state.positions.get("A").unwrap();
		assert_eq!((pos.x, pos.y), (0.0, 0.0));
	}

	#[test]
	fn small_jitter_still_counts_as_click() {
		let mut state = state_with(vec![node("A", 0.0, 0.0)]);
		state.pointer_down(0.0, 0.0);
		state.pointer_move(1.0, 1.0);
		let events = state.pointer_up(1.0, 1.0);
		assert_eq!(events, vec![GraphEvent::NodeSelected(Some("A".into()))]);
	}

	#[test]
	fn hit_radius_is_zoom_invariant() {
		for k in [0.5, 1.0, 2.0, 4.0] {
			let mut state = state_with(vec![node("A", 100.0, 100.0)]);
			state.transform = ViewTransform {
				x: 37.0,
				y: -12.0,
				k,
			};
			let (sx, sy) = state.transform.world_to_screen(100.0, 100.0);
			let hit = state.node_at(sx, sy);
			assert_eq!(hit.map(|n| n.id.as_str()), Some("A"), "scale {k}");
			// Just past the screen-space pick radius, the hit misses.
			let miss = state.node_at(sx + HIT_RADIUS + 1.0, sy);
			assert!(miss.is_none(), "scale {k}");
		}
	}

	#[test]
	fn recenter_fits_bounds_at_canvas_center() {
		let mut state = state_with(vec![node("A", 0.0, 0.0), node("B", 200.0, 200.0)]);
		state.recenter_to_fit();
		for _ in 0..120 {
			state.tick(0.016);
		}
		assert!(state.transform.k <= 1.0 + 1e-9);
		let (sx, sy) = state.transform.world_to_screen(100.0, 100.0);
		assert!((sx - 200.0).abs() < 1e-6);
		assert!((sy - 200.0).abs() < 1e-6);
	}

	#[test]
	fn recenter_without_positions_is_a_noop() {
		let mut state = GraphState::new(400.0, 400.0);
		let before = state.transform;
		state.recenter_to_fit();
		state.tick(0.016);
		assert_eq!(state.transform, before);
	}

	#[test]
	fn center_on_node_lands_at_center_zoom() {
		let mut state = state_with(vec![node("A", 80.0, -40.0)]);
		state.center_on_node("A");
		for _ in 0..120 {
			state.tick(0.016);
		}
		assert!((state.transform.k - CENTER_ZOOM).abs() < 1e-9);
		let (sx, sy) = state.transform.world_to_screen(80.0, -40.0);
		assert!((sx - 200.0).abs() < 1e-6);
		assert!((sy - 200.0).abs() < 1e-6);
	}

	#[test]
	fn new_gesture_overrides_inflight_tween() {
		let mut state = state_with(vec![node("A", 80.0, -40.0)]);
		state.center_on_node("A");
		state.pointer_down(0.0, 0.0);
		let before = state.transform;
		state.tick(0.016);
		assert_eq!(state.transform, before);
	}

	#[test]
	fn link_endpoints_normalize_to_ids_at_sync() {
		let mut state = GraphState::new(400.0, 400.0);
		state.sync_data(&GraphData {
			nodes: vec![node("A", 0.0, 0.0)],
			links: vec![GraphLink {
				id: None,
				source: LinkEnd::from("A"),
				target: LinkEnd::Node(node("gone", 1.0, 1.0)),
			}],
		});
		assert_eq!(state.links, vec![("A".to_owned(), "gone".to_owned())]);
	}

	#[test]
	fn cursor_tracks_hover_connect_and_gesture() {
		let mut state = state_with(vec![node("A", 0.0, 0.0)]);
		assert_eq!(state.cursor(), "grab");
		state.pointer_move(0.0, 0.0);
		assert_eq!(state.cursor(), "pointer");
		state.pointer_move(300.0, 300.0);
		state.set_connect_mode(ConnectMode::from_source("A"));
		assert_eq!(state.cursor(), "crosshair");
		state.set_connect_mode(ConnectMode::inactive());
		state.pointer_down(300.0, 300.0);
		state.pointer_move(350.0, 350.0);
		assert_eq!(state.cursor(), "grabbing");
	}
}
