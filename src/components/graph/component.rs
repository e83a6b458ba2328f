use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{GraphEvent, GraphState};
use super::types::{ConnectMode, GraphData, NodeKind};

/// Fans the events coming out of [`GraphState`] out to the collaborator
/// callbacks. The viewport has already applied each event locally; the
/// callbacks persist or surface it (fire-and-forget).
#[derive(Clone, Copy)]
struct EventSinks {
	on_node_selected: Option<Callback<Option<String>>>,
	on_node_position_changed: Option<Callback<(String, f64, f64)>>,
	on_connect_requested: Option<Callback<(String, String)>>,
	on_connect_mode_changed: Option<Callback<ConnectMode>>,
}

impl EventSinks {
	fn dispatch(&self, events: Vec<GraphEvent>) {
		for event in events {
			match event {
				GraphEvent::NodeSelected(id) => {
					if let Some(cb) = self.on_node_selected {
						cb.run(id);
					}
				}
				GraphEvent::NodePositionChanged { id, x, y } => {
					if let Some(cb) = self.on_node_position_changed {
						cb.run((id, x, y));
					}
				}
				GraphEvent::ConnectRequested { source, target } => {
					debug!("connect requested: {source} -> {target}");
					if let Some(cb) = self.on_connect_requested {
						cb.run((source, target));
					}
				}
				GraphEvent::ConnectModeChanged(mode) => {
					if let Some(cb) = self.on_connect_mode_changed {
						cb.run(mode);
					}
				}
			}
		}
	}
}

/// Interactive knowledge-graph viewport on a 2D canvas: drag nodes, pan and
/// zoom the camera, click to select, click-connect while connect mode is
/// active, and dim everything unrelated to the current search term.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] selected_node_id: Signal<Option<String>>,
	#[prop(into)] connect_mode: Signal<ConnectMode>,
	#[prop(into)] search_term: Signal<String>,
	#[prop(into, optional)] on_node_selected: Option<Callback<Option<String>>>,
	#[prop(into, optional)] on_node_position_changed: Option<Callback<(String, f64, f64)>>,
	#[prop(into, optional)] on_connect_requested: Option<Callback<(String, String)>>,
	#[prop(into, optional)] on_connect_mode_changed: Option<Callback<ConnectMode>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let sinks = EventSinks {
		on_node_selected,
		on_node_position_changed,
		on_connect_requested,
		on_connect_mode_changed,
	};

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		if state_init.borrow().is_some() {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// Unmount race: without a 2d context the viewport stays inert.
		let Some(ctx) = context_2d(&canvas) else {
			return;
		};
		let mut initial = GraphState::new(w, h);
		initial.sync_data(&data.get_untracked());
		initial.set_selected(selected_node_id.get_untracked());
		initial.set_connect_mode(connect_mode.get_untracked());
		initial.set_search_term(&search_term.get_untracked());
		*state_init.borrow_mut() = Some(initial);

		// Resizing the backing store never touches the camera transform.
		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let (nw, nh) = if fullscreen {
				(
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				)
			} else {
				let parent = canvas_resize.parent_element();
				(
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0),
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0),
				)
			};
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, canvas_anim) =
			(state_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
				let _ = web_sys::HtmlElement::style(&canvas_anim).set_property("cursor", s.cursor());
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Mirror the externally-owned props into the viewport state. Each runs
	// again whenever its signal changes; the data one re-syncs wholesale.
	let state_data = state.clone();
	Effect::new(move |_| {
		let snapshot = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.sync_data(&snapshot);
		}
	});
	let state_sel = state.clone();
	Effect::new(move |_| {
		let selected = selected_node_id.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.set_selected(selected);
		}
	});
	let state_conn = state.clone();
	Effect::new(move |_| {
		let mode = connect_mode.get();
		if let Some(ref mut s) = *state_conn.borrow_mut() {
			s.set_connect_mode(mode);
		}
	});
	let state_search = state.clone();
	Effect::new(move |_| {
		let term = search_term.get();
		if let Some(ref mut s) = *state_search.borrow_mut() {
			s.set_search_term(&term);
		}
	});

	let pointer_pos = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get_untracked().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = pointer_pos(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = pointer_pos(&ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = pointer_pos(&ev);
		let events = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(x, y),
			None => Vec::new(),
		};
		sinks.dispatch(events);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let events = match *state_ml.borrow_mut() {
			Some(ref mut s) => s.pointer_leave(),
			None => Vec::new(),
		};
		sinks.dispatch(events);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = pointer_pos(&ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let state_fit = state.clone();
	let on_recenter = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			s.recenter_to_fit();
		}
	};

	// `StoredValue::new_local` gives a `Send + Sync` handle to the `Rc`
	// state, which `<Show>` requires of closures in its children.
	let state_center = StoredValue::new_local(state.clone());
	let on_center_selected = move |_: MouseEvent| {
		let Some(id) = selected_node_id.get_untracked() else {
			return;
		};
		state_center.with_value(|state| {
			if let Some(ref mut s) = *state.borrow_mut() {
				s.center_on_node(&id);
			}
		});
	};

	view! {
		<div class="graph-viewport">
			<canvas
				node_ref=canvas_ref
				class="graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
			/>

			<div class="graph-legend">
				<span class="graph-legend-title">"LEGEND"</span>
				{[NodeKind::Task, NodeKind::Skill, NodeKind::Goal, NodeKind::Link]
					.into_iter()
					.map(|kind| {
						let glyph = match kind {
							NodeKind::Task => "\u{25b2}",
							NodeKind::Skill => "\u{25cf}",
							NodeKind::Goal => "\u{25a0}",
							NodeKind::Link => "\u{1f517}",
						};
						view! {
							<span class="graph-legend-entry">
								<span style=format!("color: {}", kind.accent())>{glyph}</span>
								" "
								{kind.label()}
							</span>
						}
					})
					.collect_view()}
			</div>

			<button class="graph-button graph-recenter" on:click=on_recenter>
				"Recenter"
			</button>
			<Show when=move || selected_node_id.get().is_some()>
				<button class="graph-button graph-center-node" on:click=on_center_selected.clone()>
					"Center on Node"
				</button>
			</Show>
		</div>
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|obj| obj.dyn_into().ok())
}
