//! Light and dark color tokens.
//!
//! The theme is always passed in explicitly; nothing reads it from global
//! state, so a theme switch is just "derive styles again with another
//! [`Theme`]".

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Opacity, 0..=1.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// CSS color: hex when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Binary light/dark indicator supplied by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
	/// Light background.
	Light,
	/// Dark background.
	#[default]
	Dark,
}

impl ThemeMode {
	/// Maps a `prefers-color-scheme: dark` match.
	pub fn from_dark(dark: bool) -> Self {
		if dark { Self::Dark } else { Self::Light }
	}
}

/// Edge strokes.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	/// Resting stroke color.
	pub color: Color,
	/// Resting stroke opacity.
	pub opacity: f64,
	/// Opacity of edges not touching the hovered node.
	pub dim_opacity: f64,
	/// Opacity of edges touching the hovered node.
	pub highlight_opacity: f64,
}

/// Node fills: a three-stop ramp keyed by neighbor count.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePalette {
	/// Fill for isolated / barely connected countries.
	pub ramp_low: Color,
	/// Fill at half the saturation count.
	pub ramp_mid: Color,
	/// Fill at and beyond the saturation count.
	pub ramp_high: Color,
	/// Glyph outline.
	pub outline: Color,
}

/// Country name labels.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
	/// Stroke color.
	pub color: Color,
	/// Stroke drawn behind the text for contrast against edges.
	pub halo: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Mode these tokens belong to.
	pub mode: ThemeMode,
	/// Canvas fill.
	pub background: Color,
	/// Hover color for the node glyph and its incident edges.
	pub accent: Color,
	/// Edge tokens.
	pub edge: EdgeStyle,
	/// Node tokens.
	pub node: NodePalette,
	/// Label tokens.
	pub label: LabelStyle,
}

impl Theme {
	/// Token set for `mode`.
	pub fn for_mode(mode: ThemeMode) -> Self {
		match mode {
			ThemeMode::Light => Self::light(),
			ThemeMode::Dark => Self::dark(),
		}
	}

	/// Paper background, slate edges, blue-to-amber ramp.
	pub fn light() -> Self {
		Self {
			mode: ThemeMode::Light,
			background: Color::rgb(248, 249, 251),
			accent: Color::rgb(230, 81, 0),
			edge: EdgeStyle {
				color: Color::rgb(120, 132, 150),
				opacity: 0.45,
				dim_opacity: 0.12,
				highlight_opacity: 0.95,
			},
			node: NodePalette {
				ramp_low: Color::rgb(144, 202, 249),
				ramp_mid: Color::rgb(30, 136, 229),
				ramp_high: Color::rgb(13, 71, 161),
				outline: Color::rgba(255, 255, 255, 0.9),
			},
			label: LabelStyle {
				color: Color::rgb(33, 37, 41),
				halo: Color::rgba(248, 249, 251, 0.85),
			},
		}
	}

	/// Deep slate background, muted edges, teal-to-gold ramp.
	pub fn dark() -> Self {
		Self {
			mode: ThemeMode::Dark,
			background: Color::rgb(22, 27, 34),
			accent: Color::rgb(255, 167, 38),
			edge: EdgeStyle {
				color: Color::rgb(140, 160, 180),
				opacity: 0.4,
				dim_opacity: 0.08,
				highlight_opacity: 0.95,
			},
			node: NodePalette {
				ramp_low: Color::rgb(100, 148, 160),
				ramp_mid: Color::rgb(94, 129, 172),
				ramp_high: Color::rgb(180, 142, 173),
				outline: Color::rgba(22, 27, 34, 0.9),
			},
			label: LabelStyle {
				color: Color::rgba(230, 237, 243, 0.9),
				halo: Color::rgba(22, 27, 34, 0.8),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::for_mode(ThemeMode::default())
	}
}
