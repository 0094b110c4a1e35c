//! Derived presentation: neighbor-count scaling and zoom compensation.
//!
//! Node radius, fill and label size depend only on the neighbor count and the
//! theme, so they are computed once per build (and again on theme change),
//! never per tick. Every neighbor-driven value saturates at
//! [`StyleConfig::saturation`].
//!
//! # Coordinate spaces
//!
//! Glyph radii live in simulation (world) space and grow when zooming in.
//! Stroke widths, hit slop and label sizes are specified in screen pixels and
//! divided by the zoom factor `k` before drawing inside the transformed canvas.

use super::config::StyleConfig;
use super::model::BorderGraph;
use super::theme::{Color, Theme};

/// Cached per-node presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	/// Glyph radius in world units.
	pub radius: f64,
	/// Fill color from the neighbor-count ramp.
	pub fill: Color,
	/// Label font size in screen pixels.
	pub label_size: f64,
}

fn saturated(neighbors: usize, config: &StyleConfig) -> f64 {
	neighbors.min(config.saturation) as f64
}

/// Radius: base plus a capped per-neighbor contribution.
pub fn node_radius(neighbors: usize, config: &StyleConfig) -> f64 {
	config.base_radius + saturated(neighbors, config) * config.radius_per_neighbor
}

/// Label size: base plus a small capped per-neighbor bonus.
pub fn label_size(neighbors: usize, config: &StyleConfig) -> f64 {
	config.label_base_size + saturated(neighbors, config) * config.label_per_neighbor
}

/// Three-stop ramp over `[0, saturation / 2, saturation]`.
pub fn node_fill(neighbors: usize, config: &StyleConfig, theme: &Theme) -> Color {
	if config.saturation == 0 {
		return theme.node.ramp_high;
	}
	let t = saturated(neighbors, config) / config.saturation as f64;
	if t <= 0.5 {
		theme.node.ramp_low.lerp(theme.node.ramp_mid, t * 2.0)
	} else {
		theme.node.ramp_mid.lerp(theme.node.ramp_high, (t - 0.5) * 2.0)
	}
}

/// Radius, fill and label size for a node with `neighbors` neighbors.
pub fn node_style(neighbors: usize, config: &StyleConfig, theme: &Theme) -> NodeStyle {
	NodeStyle {
		radius: node_radius(neighbors, config),
		fill: node_fill(neighbors, config, theme),
		label_size: label_size(neighbors, config),
	}
}

/// Styles for every node of `graph`, indexed like its nodes.
pub fn derive_styles(graph: &BorderGraph, config: &StyleConfig, theme: &Theme) -> Vec<NodeStyle> {
	(0..graph.node_count())
		.map(|idx| node_style(graph.neighbor_count(idx), config, theme))
		.collect()
}

/// Glyph outline width in screen pixels.
const OUTLINE_WIDTH: f64 = 1.0;
/// Gap between a glyph and its label in screen pixels.
const LABEL_GAP: f64 = 4.0;
/// Label halo stroke width in screen pixels.
const HALO_WIDTH: f64 = 3.0;

/// Screen-constant sizes converted to world space for one zoom level.
///
/// Create once per frame and pass to the drawing functions.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Glyph outline width.
	pub outline_width: f64,
	/// Space between glyph and label.
	pub label_gap: f64,
	/// Label halo stroke width.
	pub halo_width: f64,
	/// Hit slop around glyphs in world units.
	pub hit_slop: f64,
	/// Labels are skipped when zoomed out past `label_min_scale`.
	pub show_labels: bool,
}

impl ScaledValues {
	/// Sizes for zoom level `k`; non-positive or NaN `k` counts as 1.
	pub fn new(config: &StyleConfig, k: f64) -> Self {
		let k = if k > 0.0 && k.is_finite() { k } else { 1.0 };
		Self {
			k,
			outline_width: OUTLINE_WIDTH / k,
			label_gap: LABEL_GAP / k,
			halo_width: HALO_WIDTH / k,
			hit_slop: config.hit_slop / k,
			show_labels: k >= config.label_min_scale,
		}
	}

	/// Converts a screen pixel length to world units.
	pub fn world(&self, px: f64) -> f64 {
		px / self.k
	}

	/// CSS font for a label of `size` screen px.
	pub fn label_font(&self, size: f64) -> String {
		format!("{}px sans-serif", self.world(size))
	}
}
