//! Canvas rendering for the border graph.
//!
//! Draws a synchronized [`Scene`] in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges (world space)
//! 3. Resting nodes, then emphasized nodes on top
//! 4. Labels with a halo, emphasized labels last

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::StyleConfig;
use super::style::ScaledValues;
use super::sync::{NodeVisual, Scene};
use super::theme::Theme;

/// Renders the complete scene to the canvas.
pub fn render(scene: &Scene, ctx: &CanvasRenderingContext2d, config: &StyleConfig, theme: &Theme) {
	let transform = scene.transform;
	let scale = ScaledValues::new(config, transform.k);

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(scale.k, scale.k);

	draw_edges(scene, ctx, &scale);
	draw_nodes(scene, ctx, &scale, theme);
	draw_labels(scene, ctx, &scale, theme);

	ctx.restore();
}

fn draw_edges(scene: &Scene, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	ctx.set_line_cap("round");
	for edge in &scene.edges {
		if edge.stroke.a <= 0.0 {
			continue;
		}
		ctx.set_stroke_style_str(&edge.stroke.to_css());
		ctx.set_line_width(scale.world(edge.width));
		ctx.begin_path();
		ctx.move_to(edge.x1, edge.y1);
		ctx.line_to(edge.x2, edge.y2);
		ctx.stroke();
	}
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	// Pass 1: resting nodes
	for node in scene.nodes.iter().filter(|node| node.emphasis <= 0.0) {
		draw_node(ctx, node, scale, theme);
	}

	// Pass 2: fading or hovered nodes on top, the hovered one last
	for (idx, node) in scene.nodes.iter().enumerate() {
		if node.emphasis > 0.0 && Some(idx) != scene.hovered {
			draw_node(ctx, node, scale, theme);
		}
	}
	if let Some(node) = scene.hovered.and_then(|idx| scene.nodes.get(idx)) {
		draw_node(ctx, node, scale, theme);
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeVisual, scale: &ScaledValues, theme: &Theme) {
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&node.fill.to_css());
	ctx.fill();

	ctx.set_stroke_style_str(&theme.node.outline.to_css());
	ctx.set_line_width(scale.outline_width);
	ctx.stroke();
}

fn draw_labels(scene: &Scene, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	ctx.set_text_baseline("middle");
	ctx.set_line_join("round");
	ctx.set_stroke_style_str(&theme.label.halo.to_css());
	ctx.set_line_width(scale.halo_width);

	let hovered = scene.hovered;
	let visible = scene
		.nodes
		.iter()
		.zip(&scene.labels)
		.enumerate()
		.filter(|(idx, (node, _))| {
			// the hovered country stays labelled even when zoomed far out
			scale.show_labels || node.emphasis > 0.0 || Some(*idx) == hovered
		});

	let mut top = None;
	for (idx, (node, label)) in visible {
		if Some(idx) == hovered {
			top = Some((node, label));
			continue;
		}
		draw_label(ctx, node, label, scale, theme);
	}
	if let Some((node, label)) = top {
		draw_label(ctx, node, label, scale, theme);
	}
}

fn draw_label(
	ctx: &CanvasRenderingContext2d,
	node: &NodeVisual,
	label: &str,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let (x, y) = (node.x + node.radius + scale.label_gap, node.y);
	ctx.set_font(&scale.label_font(node.label_size));
	let _ = ctx.stroke_text(label, x, y);
	ctx.set_fill_style_str(&theme.label.color.lerp(theme.accent, node.emphasis).to_css());
	let _ = ctx.fill_text(label, x, y);
}
