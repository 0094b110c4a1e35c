//! Render synchronizer: copies simulation state into drawable geometry.
//!
//! [`Scene::sync`] runs once per frame after the simulation tick. Positions
//! come straight from the simulation arena; sizes and colors come from the
//! cached [`NodeStyle`]s blended with the hover fades. Nothing here derives
//! anything from neighbor counts; that happened once in
//! [`super::style::derive_styles`].

use super::config::StyleConfig;
use super::highlight::HighlightState;
use super::model::{BorderGraph, NodeIndex};
use super::simulation::Simulation;
use super::style::NodeStyle;
use super::theme::{Color, Theme};
use super::viewport::ViewTransform;

/// A node as drawn, in simulation space.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Glyph radius, hover enlargement included.
	pub radius: f64,
	/// Fill color.
	pub fill: Color,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Hover emphasis (0..1) for z-ordering and label treatment.
	pub emphasis: f64,
}

/// An edge as drawn, in simulation space.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	/// Source end, horizontal.
	pub x1: f64,
	/// Source end, vertical.
	pub y1: f64,
	/// Target end, horizontal.
	pub x2: f64,
	/// Target end, vertical.
	pub y2: f64,
	/// Stroke color, opacity folded into alpha.
	pub stroke: Color,
	/// Stroke width in screen pixels.
	pub width: f64,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	/// Indexed like the graph nodes.
	pub nodes: Vec<NodeVisual>,
	/// Indexed like the graph edges.
	pub edges: Vec<EdgeVisual>,
	/// Country names, indexed like `nodes`. Set once per build.
	pub labels: Vec<String>,
	/// Transform active when the frame was synchronized.
	pub transform: ViewTransform,
	/// Container width in screen pixels.
	pub width: f64,
	/// Container height in screen pixels.
	pub height: f64,
	/// Drawn last so it sits on top.
	pub hovered: Option<NodeIndex>,
}

impl Scene {
	/// Empty geometry sized for `graph`; filled by the first [`Scene::sync`].
	pub fn new(graph: &BorderGraph) -> Self {
		Self {
			labels: graph.nodes().iter().map(|node| node.name.clone()).collect(),
			..Self::default()
		}
	}

	/// Brings the geometry up to date with the simulation, the hover state
	/// and the viewport.
	#[allow(clippy::too_many_arguments)]
	pub fn sync(
		&mut self,
		graph: &BorderGraph,
		sim: &Simulation,
		styles: &[NodeStyle],
		highlight: &HighlightState,
		theme: &Theme,
		config: &StyleConfig,
		transform: ViewTransform,
		(width, height): (f64, f64),
	) {
		self.transform = transform;
		self.width = width;
		self.height = height;
		self.hovered = highlight.hovered();

		let bodies = sim.bodies();
		self.nodes.clear();
		self.nodes.extend(bodies.iter().zip(styles).enumerate().map(|(idx, (body, style))| {
			let emphasis = highlight.node_intensity(idx);
			NodeVisual {
				x: body.x,
				y: body.y,
				radius: style.radius * mix(1.0, config.hover_radius_scale, emphasis),
				fill: style.fill.lerp(theme.accent, emphasis),
				label_size: style.label_size,
				emphasis,
			}
		}));

		let dim = highlight.dim();
		let resting = mix(theme.edge.opacity, theme.edge.dim_opacity, dim);
		self.edges.clear();
		self.edges.extend(graph.edges().iter().filter_map(|edge| {
			let (source, target) = (bodies.get(edge.source)?, bodies.get(edge.target)?);
			let emphasis = highlight.edge_intensity(edge);
			let opacity = mix(resting, theme.edge.highlight_opacity, emphasis);
			Some(EdgeVisual {
				x1: source.x,
				y1: source.y,
				x2: target.x,
				y2: target.y,
				stroke: theme.edge.color.lerp(theme.accent, emphasis).with_alpha(opacity),
				width: mix(config.edge_width, config.highlight_edge_width, emphasis),
			})
		}));
	}

	/// Screen position of node `idx` under the synchronized transform.
	pub fn screen_position(&self, idx: NodeIndex) -> Option<(f64, f64)> {
		self.nodes
			.get(idx)
			.map(|node| self.transform.apply((node.x, node.y)))
	}
}

/// Exact at both ends, unlike `a + (b - a) * t`.
fn mix(a: f64, b: f64, t: f64) -> f64 {
	a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
	use super::super::config::SimulationConfig;
	use super::super::style::derive_styles;
	use super::super::theme::ThemeMode;
	use super::super::types::BorderPair;
	use super::*;

	struct Fixture {
		graph: BorderGraph,
		sim: Simulation,
		styles: Vec<NodeStyle>,
		theme: Theme,
		config: StyleConfig,
		highlight: HighlightState,
		scene: Scene,
	}

	impl Fixture {
		fn new(raw: &[(&str, &str)]) -> Self {
			let pairs: Vec<BorderPair> = raw.iter().map(|(a, b)| BorderPair::new(*a, *b)).collect();
			let graph = BorderGraph::from_pairs(&pairs);
			let config = StyleConfig::default();
			let theme = Theme::for_mode(ThemeMode::Dark);
			let styles = derive_styles(&graph, &config, &theme);
			let radii: Vec<f64> = styles.iter().map(|s| s.radius).collect();
			let sim = Simulation::new(
				&graph,
				&radii,
				(300.0, 200.0),
				120.0,
				SimulationConfig::default(),
			);
			let scene = Scene::new(&graph);
			Self {
				graph,
				sim,
				styles,
				theme,
				config,
				highlight: HighlightState::default(),
				scene,
			}
		}

		fn sync(&mut self, transform: ViewTransform) {
			self.scene.sync(
				&self.graph,
				&self.sim,
				&self.styles,
				&self.highlight,
				&self.theme,
				&self.config,
				transform,
				(600.0, 400.0),
			);
		}
	}

	#[test]
	fn geometry_tracks_simulation_every_tick() {
		let mut f = Fixture::new(&[("A", "B"), ("B", "C")]);
		for _ in 0..5 {
			f.sim.tick();
			f.sync(ViewTransform::IDENTITY);
			for (idx, node) in f.scene.nodes.iter().enumerate() {
				assert_eq!(Some((node.x, node.y)), f.sim.position(idx));
			}
			for (visual, edge) in f.scene.edges.iter().zip(f.graph.edges()) {
				assert_eq!(Some((visual.x1, visual.y1)), f.sim.position(edge.source));
				assert_eq!(Some((visual.x2, visual.y2)), f.sim.position(edge.target));
			}
		}
		assert_eq!(f.scene.labels, ["A", "B", "C"]);
	}

	#[test]
	fn screen_positions_respect_transform() {
		let mut f = Fixture::new(&[("A", "B")]);
		let transform = ViewTransform {
			x: 5.0,
			y: -5.0,
			k: 2.0,
		};
		f.sync(transform);
		let (x, y) = f.sim.position(1).unwrap();
		assert_eq!(f.scene.screen_position(1), Some((x * 2.0 + 5.0, y * 2.0 - 5.0)));
		assert_eq!(f.scene.screen_position(7), None);
	}

	#[test]
	fn hovered_node_and_incident_edges_take_accent() {
		let mut f = Fixture::new(&[("A", "B"), ("B", "C"), ("C", "D")]);
		let b = f.graph.index_of("B").unwrap();
		f.highlight.set_hover(Some(b));
		f.highlight.settle();
		f.sync(ViewTransform::IDENTITY);

		let accent = f.theme.accent;
		for edge in &f.scene.edges[..2] {
			assert_eq!(edge.stroke, accent.with_alpha(f.theme.edge.highlight_opacity));
			assert_eq!(edge.width, f.config.highlight_edge_width);
		}
		let far = &f.scene.edges[2];
		assert_eq!(far.stroke.a, f.theme.edge.dim_opacity);
		assert_eq!(far.width, f.config.edge_width);

		let node = &f.scene.nodes[b];
		assert_eq!(node.fill, accent);
		assert!(node.radius > f.styles[b].radius);
		assert_eq!(f.scene.nodes[0].fill, f.styles[0].fill);
	}

	#[test]
	fn leaving_restores_exact_resting_style() {
		let mut f = Fixture::new(&[("A", "B"), ("B", "C")]);
		f.sync(ViewTransform::IDENTITY);
		let resting_edges = f.scene.edges.clone();
		let resting_nodes = f.scene.nodes.clone();

		f.highlight.set_hover(Some(1));
		f.highlight.settle();
		f.sync(ViewTransform::IDENTITY);
		f.highlight.set_hover(None);
		f.highlight.settle();
		f.sync(ViewTransform::IDENTITY);

		assert_eq!(f.scene.edges, resting_edges);
		assert_eq!(f.scene.nodes, resting_nodes);
	}
}
