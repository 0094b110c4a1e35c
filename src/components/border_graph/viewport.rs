//! Pan/zoom transform and its animated reset.
//!
//! Screen coordinates relate to simulation coordinates by
//! `screen = sim * k + (x, y)`. The identity transform shows simulation space
//! one to one, with the layout centered on the container midpoint.

use log::debug;

use super::config::ViewportConfig;

/// Uniform-scale affine map from simulation space to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl ViewTransform {
	/// No pan, 100% zoom.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Simulation point to screen point.
	pub fn apply(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
		(sx * self.k + self.x, sy * self.k + self.y)
	}

	/// Screen point to simulation point.
	pub fn invert(&self, (px, py): (f64, f64)) -> (f64, f64) {
		((px - self.x) / self.k, (py - self.y) / self.k)
	}

	/// Whether this is [`Self::IDENTITY`].
	pub fn is_identity(&self) -> bool {
		*self == Self::IDENTITY
	}
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// A pointer, wheel or keyboard driven change to the transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
	/// Translate by a screen-space delta.
	Pan {
		/// Horizontal shift in screen pixels.
		dx: f64,
		/// Vertical shift in screen pixels.
		dy: f64,
	},
	/// Multiply the scale by `factor`, keeping the screen point `anchor` fixed.
	Zoom {
		/// Scale multiplier, above 1 zooms in.
		factor: f64,
		/// Screen point that stays put.
		anchor: (f64, f64),
	},
}

/// In-flight reset: the simulation point shown at the midpoint travels to the
/// midpoint itself while the scale returns to 1.
#[derive(Clone, Copy, Debug)]
struct ResetAnimation {
	midpoint: (f64, f64),
	from_focus: (f64, f64),
	from_k: f64,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl ResetAnimation {
	fn transform_at(&self, t: f64) -> ViewTransform {
		let e = ease_cubic_in_out(t);
		let (mx, my) = self.midpoint;
		let focus = (
			self.from_focus.0 + (mx - self.from_focus.0) * e,
			self.from_focus.1 + (my - self.from_focus.1) * e,
		);
		// Geometric interpolation: equal zoom ratios per unit time.
		let k = (self.from_k.ln() * (1.0 - e)).exp();
		ViewTransform {
			x: mx - focus.0 * k,
			y: my - focus.1 * k,
			k,
		}
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0) * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// Owns the current transform; the only place it is mutated.
#[derive(Clone, Debug)]
pub struct Viewport {
	transform: ViewTransform,
	reset: Option<ResetAnimation>,
	config: ViewportConfig,
}

impl Viewport {
	/// Identity transform with repaired `config`.
	pub fn new(config: ViewportConfig) -> Self {
		Self {
			transform: ViewTransform::IDENTITY,
			reset: None,
			config: config.sanitized(),
		}
	}

	/// Current transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Whether a reset is in flight.
	pub fn is_animating(&self) -> bool {
		self.reset.is_some()
	}

	/// `(min_scale, max_scale)`.
	pub fn scale_bounds(&self) -> (f64, f64) {
		(self.config.min_scale, self.config.max_scale)
	}

	/// Tuning in effect.
	pub fn config(&self) -> &ViewportConfig {
		&self.config
	}

	/// Applies a gesture. Gestures compose; the scale is clamped to the
	/// configured range and non-finite input is ignored. Interrupts a reset.
	pub fn apply(&mut self, gesture: Gesture) {
		self.reset = None;
		match gesture {
			Gesture::Pan { dx, dy } => {
				if dx.is_finite() && dy.is_finite() {
					self.transform.x += dx;
					self.transform.y += dy;
				}
			}
			Gesture::Zoom {
				factor,
				anchor: (ax, ay),
			} => {
				if !(factor.is_finite() && ax.is_finite() && ay.is_finite()) {
					return;
				}
				let t = &mut self.transform;
				let k = (t.k * factor).clamp(self.config.min_scale, self.config.max_scale);
				let ratio = k / t.k;
				t.x = ax - (ax - t.x) * ratio;
				t.y = ay - (ay - t.y) * ratio;
				t.k = k;
			}
		}
	}

	/// Starts the animated return to identity for a `width` x `height`
	/// container. No-op when already at identity or already resetting.
	pub fn reset(&mut self, width: f64, height: f64) {
		if self.reset.is_some() || self.transform.is_identity() {
			return;
		}
		let midpoint = (width / 2.0, height / 2.0);
		debug!("border-graph: resetting view from {:?}", self.transform);
		self.reset = Some(ResetAnimation {
			midpoint,
			from_focus: self.transform.invert(midpoint),
			from_k: self.transform.k,
			elapsed_ms: 0.0,
			duration_ms: self.config.reset_duration_ms,
		});
		if self.config.reset_duration_ms <= 0.0 {
			self.reset_immediately();
		}
	}

	/// Jumps straight to identity.
	pub fn reset_immediately(&mut self) {
		self.reset = None;
		self.transform = ViewTransform::IDENTITY;
	}

	/// Advances a running reset by `dt` seconds. Returns whether one is still
	/// running afterwards.
	pub fn advance(&mut self, dt: f64) -> bool {
		let Some(animation) = self.reset.as_mut() else {
			return false;
		};
		animation.elapsed_ms += dt.max(0.0) * 1000.0;
		let t = animation.elapsed_ms / animation.duration_ms;
		if t >= 1.0 {
			self.reset_immediately();
			return false;
		}
		self.transform = animation.transform_at(t);
		true
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(ViewportConfig::default())
	}
}
