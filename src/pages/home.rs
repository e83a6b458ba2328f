use leptos::prelude::*;
use log::debug;

use crate::components::graph::{
	ConnectMode, GraphCanvas, GraphData, GraphLink, LinkEnd, Node, NodeKind,
};

/// Seed graph standing in for the data layer. A couple of nodes carry no
/// stored position and get placed by the viewport itself.
fn sample_data() -> (Vec<Node>, Vec<GraphLink>) {
	let node = |id: &str, title: &str, summary: &str, kind, x, y| Node {
		id: id.to_owned(),
		title: title.to_owned(),
		summary: summary.to_owned(),
		kind,
		url: None,
		color: None,
		completed: false,
		x,
		y,
	};
	let nodes = vec![
		node(
			"goal-rust",
			"Ship a Rust side project",
			"One real crate, published",
			NodeKind::Goal,
			Some(0.0),
			Some(-120.0),
		),
		node(
			"skill-rust",
			"Rust",
			"Ownership, async, WASM",
			NodeKind::Skill,
			Some(-160.0),
			Some(40.0),
		),
		node(
			"skill-wasm",
			"WebAssembly",
			"Canvas rendering in the browser",
			NodeKind::Skill,
			Some(160.0),
			Some(40.0),
		),
		node(
			"task-canvas",
			"Prototype the canvas renderer",
			"Grid, glyphs, labels",
			NodeKind::Task,
			Some(0.0),
			Some(160.0),
		),
		node(
			"task-book",
			"Finish the async chapter",
			"Reading notes in the journal",
			NodeKind::Task,
			None,
			None,
		),
		node(
			"link-docs",
			"web-sys canvas docs",
			"API reference",
			NodeKind::Link,
			None,
			None,
		),
	];
	let edge = |source: &str, target: &str| GraphLink {
		id: None,
		source: LinkEnd::from(source),
		target: LinkEnd::from(target),
	};
	let links = vec![
		edge("goal-rust", "skill-rust"),
		edge("goal-rust", "skill-wasm"),
		edge("skill-wasm", "task-canvas"),
		edge("skill-rust", "task-book"),
		edge("task-canvas", "link-docs"),
	];
	(nodes, links)
}

/// Default Home Page: the graph viewport plus the surrounding UI state it
/// treats as external collaborators (search box, connect toggle, selection).
#[component]
pub fn Home() -> impl IntoView {
	let (seed_nodes, seed_links) = sample_data();
	let nodes = RwSignal::new(seed_nodes);
	let links = RwSignal::new(seed_links);
	let selected = RwSignal::new(None::<String>);
	let connect = RwSignal::new(ConnectMode::default());
	let search = RwSignal::new(String::new());

	let data = Signal::derive(move || GraphData {
		nodes: nodes.get(),
		links: links.get(),
	});

	let on_node_selected = Callback::new(move |id: Option<String>| {
		selected.set(id);
	});

	// Drag-end: write the new position back into the "persisted" node set.
	let on_node_position_changed = Callback::new(move |(id, x, y): (String, f64, f64)| {
		debug!("persisting position of {id}: ({x:.1}, {y:.1})");
		nodes.update(|nodes| {
			if let Some(node) = nodes.iter_mut().find(|n| n.id == id) {
				node.x = Some(x);
				node.y = Some(y);
			}
		});
	});

	let on_connect_requested = Callback::new(move |(source, target): (String, String)| {
		if source == target {
			return;
		}
		links.update(|links| {
			links.push(GraphLink {
				id: None,
				source: LinkEnd::Id(source),
				target: LinkEnd::Id(target),
			});
		});
	});

	let on_connect_mode_changed = Callback::new(move |mode: ConnectMode| {
		connect.set(mode);
	});

	let start_connect = move |_| {
		if let Some(id) = selected.get() {
			connect.set(ConnectMode::from_source(&id));
		}
	};

	view! {
		<div class="fullscreen-graph">
			<GraphCanvas
				data=data
				selected_node_id=selected
				connect_mode=connect
				search_term=search
				on_node_selected=on_node_selected
				on_node_position_changed=on_node_position_changed
				on_connect_requested=on_connect_requested
				on_connect_mode_changed=on_connect_mode_changed
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Mindgraph"</h1>
				<p class="subtitle">
					"Drag nodes to pin them. Scroll to zoom, drag the background to pan."
				</p>
				<input
					type="search"
					placeholder="Search nodes..."
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
				<button on:click=start_connect disabled=move || selected.get().is_none()>
					{move || {
						if connect.get().active { "Click a target node..." } else { "Link from selected" }
					}}
				</button>
			</div>
		</div>
	}
}
