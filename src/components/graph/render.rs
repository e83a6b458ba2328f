//! Canvas draw pass. Reads [`GraphState`], never mutates it; later steps
//! draw on top of earlier ones.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphState;
use super::types::NodeKind;

const BACKGROUND: &str = "#101018";
const ACCENT: &str = "#00c7ff";
const COMPLETED_GREY: &str = "#808080";
/// Opacity of nodes filtered out by an active search.
const DIM_ALPHA: f64 = 0.05;
/// Opacity of completed nodes.
const COMPLETED_ALPHA: f64 = 0.15;
/// Pitches of the two overlaid background grids, world units.
const GRID_COARSE: f64 = 135.0;
const GRID_FINE: f64 = 35.0;
/// Vertical screen-pixel offset of labels below the node center.
const LABEL_OFFSET_PX: f64 = 17.0;
const LABEL_MAX_CHARS: usize = 25;

pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_grid(state, ctx, GRID_COARSE, "rgba(0, 122, 255, 0.08)");
	draw_grid(state, ctx, GRID_FINE, "rgba(0, 122, 255, 0.12)");
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_labels(state, ctx);
}

/// Grid lines covering only the currently visible world rect, derived from
/// the inverse camera transform.
fn draw_grid(state: &GraphState, ctx: &CanvasRenderingContext2d, pitch: f64, stroke: &str) {
	let k = state.transform.k;
	let (view_x, view_y) = state.transform.screen_to_world(0.0, 0.0);
	let (view_w, view_h) = (state.width / k, state.height / k);

	ctx.begin_path();
	ctx.set_stroke_style_str(stroke);
	ctx.set_line_width(1.0 / k);

	let mut x = (view_x / pitch).floor() * pitch;
	while x < view_x + view_w {
		ctx.move_to(x, view_y);
		ctx.line_to(x, view_y + view_h);
		x += pitch;
	}
	let mut y = (view_y / pitch).floor() * pitch;
	while y < view_y + view_h {
		ctx.move_to(view_x, y);
		ctx.line_to(view_x + view_w, y);
		y += pitch;
	}
	ctx.stroke();
}

fn draw_links(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str("rgba(0, 199, 255, 0.4)");
	ctx.set_line_width(1.0);
	ctx.set_shadow_color("rgba(0, 199, 255, 1)");
	ctx.set_shadow_blur(15.0);
	for (source, target) in &state.links {
		// Dangling endpoints have no position entry and drop out here.
		let (Some(from), Some(to)) = (state.positions.get(source), state.positions.get(target))
		else {
			continue;
		};
		let dimmed = state.highlight.is_dimmed(source) || state.highlight.is_dimmed(target);
		ctx.set_global_alpha(if dimmed { DIM_ALPHA } else { 1.0 });
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();
	}
	ctx.set_shadow_blur(0.0);
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	for node in &state.nodes {
		let Some(pos) = state.positions.get(&node.id) else {
			continue;
		};
		let (x, y) = (pos.x, pos.y);
		let selected = state.selected.as_deref() == Some(node.id.as_str());
		let hovered = state.hovered.as_deref() == Some(node.id.as_str());
		let dimmed = state.highlight.is_dimmed(&node.id);
		let color = if node.completed {
			COMPLETED_GREY.to_owned()
		} else {
			node.color().to_owned()
		};
		let scale = if hovered { 1.1 } else { 1.0 };

		ctx.set_global_alpha(if dimmed {
			DIM_ALPHA
		} else if node.completed {
			COMPLETED_ALPHA
		} else {
			1.0
		});

		// Selection halo, matching the node's own shape.
		if selected {
			trace_glyph(ctx, node.kind, x, y, 20.0, GlyphLayer::Halo);
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, 16.0, x, y, 20.0) {
				let _ = gradient.add_color_stop(0.0, "rgba(0, 199, 255, 0)");
				let _ = gradient.add_color_stop(0.8, "rgba(0, 199, 255, 0.5)");
				let _ = gradient.add_color_stop(1.0, "rgba(0, 199, 255, 0.7)");
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		// Soft outer corona.
		let corona = 16.0 * scale;
		trace_glyph(ctx, node.kind, x, y, corona, GlyphLayer::Corona);
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, 7.0 * scale, x, y, corona) {
			let _ = gradient.add_color_stop(0.0, &rgba(&color, 0.5));
			let _ = gradient.add_color_stop(1.0, &rgba(&color, 0.0));
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}

		// Solid body with glow.
		ctx.set_fill_style_str(&color);
		ctx.set_shadow_color(&color);
		ctx.set_shadow_blur(15.0);
		draw_body(ctx, node.kind, x, y, scale, &color);
		ctx.set_shadow_blur(0.0);

		// Bright outline ring.
		trace_glyph(ctx, node.kind, x, y, 8.0 * scale, GlyphLayer::Ring);
		let ring = if hovered {
			"#fff".to_owned()
		} else {
			brighter(&color)
		};
		ctx.set_stroke_style_str(&ring);
		ctx.set_line_width(if hovered { 2.5 } else { 2.0 });
		ctx.stroke();

		// White inner core.
		trace_glyph(ctx, node.kind, x, y, 3.0 * scale, GlyphLayer::Core);
		ctx.set_fill_style_str("#fff");
		ctx.fill();

		// Pending-connection source marker: two plain concentric rings.
		if state.connect.active && state.connect.source.as_deref() == Some(node.id.as_str()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, 15.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(160, 102, 255, 0.8)");
			ctx.set_line_width(1.5);
			ctx.stroke();

			ctx.begin_path();
			let _ = ctx.arc(x, y, 19.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(160, 102, 255, 0.4)");
			ctx.set_line_width(3.0);
			ctx.stroke();
		}
	}
	ctx.set_global_alpha(1.0);
}

/// Which concentric layer a glyph path is being traced for; the chain icon
/// uses different geometry per layer.
#[derive(Clone, Copy)]
enum GlyphLayer {
	Halo,
	Corona,
	Ring,
	Core,
}

/// Begin a path tracing the node glyph at `size`. Task is a triangle, Goal a
/// square, Skill a circle; Link is a pair of arcs whose spacing depends on
/// the layer.
fn trace_glyph(
	ctx: &CanvasRenderingContext2d,
	kind: NodeKind,
	x: f64,
	y: f64,
	size: f64,
	layer: GlyphLayer,
) {
	ctx.begin_path();
	match kind {
		NodeKind::Task => {
			ctx.move_to(x, y - size);
			ctx.line_to(x - size * 0.866, y + size * 0.5);
			ctx.line_to(x + size * 0.866, y + size * 0.5);
			ctx.close_path();
		}
		NodeKind::Goal => {
			ctx.rect(x - size, y - size, size * 2.0, size * 2.0);
		}
		NodeKind::Skill => {
			let _ = ctx.arc(x, y, size, 0.0, 2.0 * PI);
		}
		NodeKind::Link => match layer {
			// The halo reads better as a plain circle around the chain.
			GlyphLayer::Halo => {
				let _ = ctx.arc(x, y, size, 0.0, 2.0 * PI);
			}
			GlyphLayer::Corona => {
				// Chain glyph sits a little tighter than the other shapes.
				let s = size * 0.8125;
				let _ = ctx.arc(x - s * 0.4, y, s * 0.5, 0.0, 2.0 * PI);
				ctx.move_to(x + s * 0.9, y);
				let _ = ctx.arc(x + s * 0.4, y, s * 0.5, 0.0, 2.0 * PI);
			}
			GlyphLayer::Ring => {
				let s = size * 0.625;
				let _ = ctx.arc(x - s * 0.5, y, s * 0.75, 0.0, 2.0 * PI);
				ctx.move_to(x + s * 1.25, y);
				let _ = ctx.arc(x + s * 0.5, y, s * 0.75, 0.0, 2.0 * PI);
			}
			GlyphLayer::Core => {
				let s = size * (5.0 / 3.0);
				let _ = ctx.arc(x - s * 0.5, y, s * 0.3, 0.0, 2.0 * PI);
				ctx.move_to(x + s * 0.8, y);
				let _ = ctx.arc(x + s * 0.5, y, s * 0.3, 0.0, 2.0 * PI);
			}
		},
	}
}

/// Fill the solid body. The chain icon is two rotated ellipses joined by a
/// short bar, so it fills piecewise rather than tracing one path.
fn draw_body(ctx: &CanvasRenderingContext2d, kind: NodeKind, x: f64, y: f64, scale: f64, color: &str) {
	match kind {
		NodeKind::Link => {
			let size = 6.0 * scale;
			ctx.begin_path();
			let _ = ctx.ellipse(x - size * 0.45, y, size * 0.35, size * 0.55, -PI / 4.0, 0.0, 2.0 * PI);
			ctx.fill();

			ctx.begin_path();
			let _ = ctx.ellipse(x + size * 0.45, y, size * 0.35, size * 0.55, PI / 4.0, 0.0, 2.0 * PI);
			ctx.fill();

			ctx.begin_path();
			ctx.move_to(x - size * 0.15, y - size * 0.4);
			ctx.line_to(x + size * 0.15, y + size * 0.4);
			ctx.set_line_width(size * 0.25);
			ctx.set_stroke_style_str(color);
			ctx.stroke();
			ctx.set_line_width(1.0);
		}
		_ => {
			trace_glyph(ctx, kind, x, y, 7.0 * scale, GlyphLayer::Ring);
			ctx.fill();
		}
	}
}

/// Labels are drawn after the camera transform is restored, so font size and
/// offset are fixed in screen pixels and stay legible at every zoom level.
fn draw_labels(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	for node in &state.nodes {
		let Some(pos) = state.positions.get(&node.id) else {
			continue;
		};
		if state.highlight.is_dimmed(&node.id) {
			continue;
		}
		let selected = state.selected.as_deref() == Some(node.id.as_str());
		let (sx, sy) = state.transform.world_to_screen(pos.x, pos.y);
		ctx.set_font(if selected {
			"700 10px 'Inter', sans-serif"
		} else {
			"500 10px 'Inter', sans-serif"
		});
		ctx.set_fill_style_str(if selected { ACCENT } else { "#e8e8ed" });
		let _ = ctx.fill_text(&truncate_label(&node.title), sx, sy + LABEL_OFFSET_PX);
	}
}

/// Cut the title to [`LABEL_MAX_CHARS`], ellipsis included.
fn truncate_label(title: &str) -> String {
	if title.chars().count() > LABEL_MAX_CHARS {
		let head: String = title.chars().take(LABEL_MAX_CHARS - 3).collect();
		format!("{head}...")
	} else {
		title.to_owned()
	}
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
	let hex = color.strip_prefix('#')?;
	if hex.len() != 6 {
		return None;
	}
	let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
	let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
	let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
	Some((r, g, b))
}

/// Hex color with an alpha channel, as a CSS rgba() string.
fn rgba(color: &str, alpha: f64) -> String {
	match parse_hex(color) {
		Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
		None => color.to_owned(),
	}
}

/// Brightened variant of a hex color, used for the outline ring.
fn brighter(color: &str) -> String {
	match parse_hex(color) {
		Some((r, g, b)) => {
			let lift = |c: u8| ((c as f64 * 1.7).round() as u32).min(255);
			format!("rgb({}, {}, {})", lift(r), lift(g), lift(b))
		}
		None => "#fff".to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_long_titles_with_ellipsis() {
		assert_eq!(truncate_label("short"), "short");
		let exactly_25 = "a".repeat(25);
		assert_eq!(truncate_label(&exactly_25), exactly_25);
		let long = "a".repeat(30);
		let cut = truncate_label(&long);
		assert_eq!(cut.chars().count(), 25);
		assert!(cut.ends_with("..."));
	}

	#[test]
	fn hex_colors_parse_and_format() {
		assert_eq!(parse_hex("#34aadc"), Some((0x34, 0xaa, 0xdc)));
		assert_eq!(parse_hex("teal"), None);
		assert_eq!(rgba("#ff0000", 0.5), "rgba(255, 0, 0, 0.5)");
		assert_eq!(rgba("teal", 0.5), "teal");
	}

	#[test]
	fn brighter_lifts_and_clamps_channels() {
		assert_eq!(brighter("#646464"), "rgb(170, 170, 170)");
		assert_eq!(brighter("#ffffff"), "rgb(255, 255, 255)");
		assert_eq!(brighter("not-a-color"), "#fff");
	}
}
