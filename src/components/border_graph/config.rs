//! Tuning parameters for the simulation, viewport, styling and interaction.
//!
//! Every struct implements [`Default`] with the values the visualization ships
//! with, and deserializes with `#[serde(default)]` so a partial JSON object
//! only overrides the fields it names:
//!
//! ```json
//! { "simulation": { "link_distance": 80 }, "loaded_delay_ms": 2000 }
//! ```

use serde::Deserialize;

/// Physics parameters for the force simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Repulsion strength used until the host supplies one.
	pub default_strength: f64,
	/// Lower bound for the repulsion strength.
	pub min_strength: f64,
	/// Upper bound for the repulsion strength.
	pub max_strength: f64,
	/// Distance floor for the repulsion falloff, avoids the 1/d² singularity.
	pub distance_min: f64,
	/// Pull of the node centroid towards the viewport center, per tick.
	pub center_strength: f64,
	/// Rest length of every edge spring.
	pub link_distance: f64,
	/// Extra clearance added to each glyph radius for anti-overlap.
	pub collision_padding: f64,
	/// Fraction of an overlap resolved per tick (0..=1).
	pub collision_strength: f64,
	/// Per-tick fraction by which alpha approaches its target.
	pub alpha_decay: f64,
	/// Alpha below which the simulation stops stepping.
	pub alpha_min: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha floor applied by reheats (drag, strength change, resize).
	pub reheat_alpha: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		// 0.001^(1/300): cools from 1.0 to alpha_min in ~300 ticks.
		let alpha_min: f64 = 0.001;
		Self {
			default_strength: 120.0,
			min_strength: 10.0,
			max_strength: 300.0,
			distance_min: 1.0,
			center_strength: 0.1,
			link_distance: 60.0,
			collision_padding: 4.0,
			collision_strength: 0.7,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			alpha_min,
			velocity_decay: 0.4,
			reheat_alpha: 0.3,
		}
	}
}

/// Pan/zoom limits and reset animation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
	/// Smallest allowed zoom factor.
	pub min_scale: f64,
	/// Largest allowed zoom factor.
	pub max_scale: f64,
	/// Zoom factor per wheel notch towards the user.
	pub wheel_zoom_in: f64,
	/// Zoom factor per wheel notch away from the user.
	pub wheel_zoom_out: f64,
	/// Duration of the animated reset, in milliseconds.
	pub reset_duration_ms: f64,
	/// Containers smaller than this (in either axis) are treated as this size.
	pub min_dimension: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 10.0,
			wheel_zoom_in: 1.1,
			wheel_zoom_out: 0.9,
			reset_duration_ms: 750.0,
			min_dimension: 100.0,
		}
	}
}

/// Neighbor-count-derived presentation and hover emphasis.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
	/// Glyph radius of a node without neighbors.
	pub base_radius: f64,
	/// Radius added per neighbor, up to `saturation` neighbors.
	pub radius_per_neighbor: f64,
	/// Neighbor count at which radius, fill and label size stop growing.
	pub saturation: usize,
	/// Label font size (px) of a node without neighbors.
	pub label_base_size: f64,
	/// Label size added per neighbor, up to `saturation` neighbors.
	pub label_per_neighbor: f64,
	/// Labels are hidden below this zoom factor.
	pub label_min_scale: f64,
	/// Glyph enlargement of the hovered node.
	pub hover_radius_scale: f64,
	/// Edge stroke width in screen pixels.
	pub edge_width: f64,
	/// Stroke width of edges touching the hovered node, in screen pixels.
	pub highlight_edge_width: f64,
	/// Extra pointer tolerance around each glyph for hit testing.
	pub hit_slop: f64,
	/// Duration of cosmetic hover fades, in milliseconds.
	pub transition_ms: f64,
}

impl Default for StyleConfig {
	fn default() -> Self {
		Self {
			base_radius: 5.0,
			radius_per_neighbor: 0.8,
			saturation: 10,
			label_base_size: 10.0,
			label_per_neighbor: 0.2,
			label_min_scale: 0.5,
			hover_radius_scale: 1.4,
			edge_width: 1.2,
			highlight_edge_width: 2.5,
			hit_slop: 4.0,
			transition_ms: 200.0,
		}
	}
}

/// Pointer and keyboard thresholds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Pointer travel (screen px) beyond which a press is no longer a click.
	pub click_tolerance: f64,
	/// Pan distance (screen px) of one arrow key press.
	pub key_pan_step: f64,
	/// Maximum neighbor names listed in an inspection preview.
	pub preview_limit: usize,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			click_tolerance: 3.0,
			key_pan_step: 40.0,
			preview_limit: 5,
		}
	}
}

/// Complete configuration for the border graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Physics tuning.
	pub simulation: SimulationConfig,
	/// Zoom limits and reset animation.
	pub viewport: ViewportConfig,
	/// Neighbor-count styling and hover emphasis.
	pub style: StyleConfig,
	/// Click and keyboard thresholds.
	pub interaction: InteractionConfig,
	/// Delay between a build and the "loaded" notification, in milliseconds.
	pub loaded_delay_ms: u32,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationConfig::default(),
			viewport: ViewportConfig::default(),
			style: StyleConfig::default(),
			interaction: InteractionConfig::default(),
			loaded_delay_ms: 1500,
		}
	}
}

/// `value` if finite, otherwise `fallback`.
fn finite_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() { value } else { fallback }
}

/// `value` clamped to `0..=1`, `fallback` when not finite.
fn unit_or(value: f64, fallback: f64) -> f64 {
	finite_or(value, fallback).clamp(0.0, 1.0)
}

/// `value` if finite and strictly positive, otherwise `fallback`.
fn positive_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() && value > 0.0 {
		value
	} else {
		fallback
	}
}

/// Finite bounds in ascending order.
fn ordered(min: f64, max: f64, fallback: (f64, f64)) -> (f64, f64) {
	let (min, max) = (finite_or(min, fallback.0), finite_or(max, fallback.1));
	if min <= max { (min, max) } else { (max, min) }
}

impl SimulationConfig {
	/// Repairs values that would make the simulation misbehave. Strength
	/// bounds end up ascending and decay/strength fractions within `0..=1`;
	/// anything non-finite takes its default.
	pub fn sanitized(self) -> Self {
		let defaults = Self::default();
		let (min_strength, max_strength) = ordered(
			self.min_strength,
			self.max_strength,
			(defaults.min_strength, defaults.max_strength),
		);
		Self {
			default_strength: finite_or(self.default_strength, defaults.default_strength)
				.clamp(min_strength, max_strength),
			min_strength,
			max_strength,
			distance_min: positive_or(self.distance_min, defaults.distance_min),
			center_strength: finite_or(self.center_strength, defaults.center_strength),
			link_distance: finite_or(self.link_distance, defaults.link_distance).max(0.0),
			collision_padding: finite_or(self.collision_padding, defaults.collision_padding),
			collision_strength: unit_or(self.collision_strength, defaults.collision_strength),
			alpha_decay: unit_or(self.alpha_decay, defaults.alpha_decay),
			alpha_min: unit_or(self.alpha_min, defaults.alpha_min),
			velocity_decay: unit_or(self.velocity_decay, defaults.velocity_decay),
			reheat_alpha: unit_or(self.reheat_alpha, defaults.reheat_alpha),
		}
	}
}

impl ViewportConfig {
	/// Orders the scale bounds and keeps the smallest zoom above zero.
	pub fn sanitized(self) -> Self {
		let defaults = Self::default();
		let (min_scale, max_scale) = ordered(
			positive_or(self.min_scale, defaults.min_scale),
			positive_or(self.max_scale, defaults.max_scale),
			(defaults.min_scale, defaults.max_scale),
		);
		Self {
			min_scale,
			max_scale,
			wheel_zoom_in: positive_or(self.wheel_zoom_in, defaults.wheel_zoom_in),
			wheel_zoom_out: positive_or(self.wheel_zoom_out, defaults.wheel_zoom_out),
			reset_duration_ms: finite_or(self.reset_duration_ms, defaults.reset_duration_ms)
				.max(0.0),
			min_dimension: positive_or(self.min_dimension, defaults.min_dimension),
		}
	}
}

impl GraphConfig {
	/// Host-supplied configuration with every section repaired, see
	/// [`SimulationConfig::sanitized`] and [`ViewportConfig::sanitized`].
	pub fn sanitized(self) -> Self {
		Self {
			simulation: self.simulation.sanitized(),
			viewport: self.viewport.sanitized(),
			..self
		}
	}
}
