//! Graph state shared between the frame loop and the event handlers.
//!
//! Combines the model, the simulation, the viewport, interaction and hover
//! tracking into one value. Created when the component builds, then mutated
//! by pointer events and once per animation frame by [`BorderGraphState::frame`].

use log::{debug, info};

use super::config::GraphConfig;
use super::highlight::HighlightState;
use super::interaction::{Interaction, KeyAction, key_action};
use super::model::{BorderGraph, NodeIndex};
use super::notify::{Inspection, Notification};
use super::simulation::Simulation;
use super::style::{NodeStyle, ScaledValues, derive_styles};
use super::sync::Scene;
use super::theme::{Theme, ThemeMode};
use super::types::BorderData;
use super::viewport::{Gesture, Viewport};

/// Longest frame step fed to the fades and the reset animation, in seconds.
/// Keeps a backgrounded tab from jumping straight to the end.
const MAX_FRAME_DT: f64 = 0.1;

/// Everything one mounted graph needs between frames.
pub struct BorderGraphState {
	graph: BorderGraph,
	sim: Simulation,
	viewport: Viewport,
	interaction: Interaction,
	highlight: HighlightState,
	/// Neighbor-count styling, derived on build and theme change only.
	styles: Vec<NodeStyle>,
	scene: Scene,
	theme: Theme,
	config: GraphConfig,
	width: f64,
	height: f64,
}

impl BorderGraphState {
	/// Builds the graph from `data` for a `width` x `height` container. Sizes are
	/// clamped, the configuration is repaired and a non-finite `strength` falls
	/// back to the configured default.
	pub fn new(
		data: &BorderData,
		width: f64,
		height: f64,
		strength: f64,
		mode: ThemeMode,
		config: GraphConfig,
	) -> Self {
		let config = config.sanitized();
		let graph = BorderGraph::from_pairs(&data.pairs);
		let theme = Theme::for_mode(mode);
		let styles = derive_styles(&graph, &config.style, &theme);
		let radii: Vec<f64> = styles.iter().map(|style| style.radius).collect();
		let (width, height) = clamp_size(width, height, config.viewport.min_dimension);
		let sim = Simulation::new(
			&graph,
			&radii,
			(width / 2.0, height / 2.0),
			strength,
			config.simulation.clone(),
		);
		info!(
			"border-graph: built {} countries / {} borders, up to {} neighbors",
			graph.node_count(),
			graph.edge_count(),
			graph.max_neighbor_count()
		);

		let mut state = Self {
			scene: Scene::new(&graph),
			viewport: Viewport::new(config.viewport.clone()),
			interaction: Interaction::new(config.interaction.clone()),
			highlight: HighlightState::default(),
			graph,
			sim,
			styles,
			theme,
			config,
			width,
			height,
		};
		state.sync_scene();
		state
	}

	/// Nearest node whose glyph (plus hit slop) contains the screen point.
	pub fn node_at(&self, screen: (f64, f64)) -> Option<NodeIndex> {
		let transform = self.viewport.transform();
		let (gx, gy) = transform.invert(screen);
		if !(gx.is_finite() && gy.is_finite()) {
			return None;
		}
		let scale = ScaledValues::new(&self.config.style, transform.k);
		self.sim
			.bodies()
			.iter()
			.zip(&self.styles)
			.enumerate()
			.filter_map(|(idx, (body, style))| {
				let distance = (body.x - gx).hypot(body.y - gy);
				(distance <= style.radius + scale.hit_slop).then_some((idx, distance))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(idx, _)| idx)
	}

	/// Starts a drag on a node or a pan on the background.
	pub fn pointer_down(&mut self, screen: (f64, f64)) {
		let target = self.node_at(screen);
		self.interaction.pointer_down(screen, target, &mut self.sim);
	}

	/// Drags, pans and updates the hover.
	pub fn pointer_move(&mut self, screen: (f64, f64)) {
		self.interaction
			.pointer_move(screen, &mut self.sim, &mut self.viewport);
		let hovered = self.node_at(screen);
		self.highlight.set_hover(hovered);
	}

	/// Ends the press. Returns an inspection when the press was a click.
	pub fn pointer_up(&mut self, screen: (f64, f64)) -> Option<Notification> {
		let target = self.node_at(screen);
		let clicked = self.interaction.pointer_up(screen, target, &mut self.sim)?;
		let inspection = Inspection::of(
			&self.graph,
			clicked,
			self.config.interaction.preview_limit,
		)?;
		debug!("border-graph: inspected {}", inspection.country);
		Some(Notification::Inspect(inspection))
	}

	/// Pointer left the canvas: ends any drag or pan and clears the hover.
	pub fn pointer_leave(&mut self) {
		self.interaction.cancel(&mut self.sim);
		self.highlight.set_hover(None);
	}

	/// Wheel zoom about the pointer. Negative `delta_y` zooms in.
	pub fn wheel(&mut self, screen: (f64, f64), delta_y: f64) {
		let viewport = self.viewport.config();
		let factor = if delta_y < 0.0 {
			viewport.wheel_zoom_in
		} else if delta_y > 0.0 {
			viewport.wheel_zoom_out
		} else {
			return;
		};
		self.viewport.apply(Gesture::Zoom {
			factor,
			anchor: screen,
		});
	}

	/// Handles a keyboard shortcut. Returns whether the key was used.
	pub fn key(&mut self, key: &str) -> bool {
		let viewport = self.viewport.config();
		let Some(action) = key_action(
			key,
			self.width,
			self.height,
			self.interaction.config(),
			viewport.wheel_zoom_in,
			viewport.wheel_zoom_out,
		) else {
			return false;
		};
		match action {
			KeyAction::Gesture(gesture) => self.viewport.apply(gesture),
			KeyAction::Reset => self.reset_view(),
		}
		true
	}

	/// New container size. Moves the centering target and reheats.
	pub fn resize(&mut self, width: f64, height: f64) {
		let (width, height) = clamp_size(width, height, self.config.viewport.min_dimension);
		if (width, height) == (self.width, self.height) {
			return;
		}
		self.width = width;
		self.height = height;
		self.sim.set_center(width / 2.0, height / 2.0);
		self.sim.reheat();
		debug!("border-graph: resized to {width}x{height}");
	}

	/// Changes the repulsion strength. Returns whether it changed.
	pub fn set_strength(&mut self, strength: f64) -> bool {
		self.sim.set_strength(strength)
	}

	/// Restyles for `mode` without touching positions or the transform.
	pub fn set_theme(&mut self, mode: ThemeMode) -> bool {
		if self.theme.mode == mode {
			return false;
		}
		self.theme = Theme::for_mode(mode);
		self.styles = derive_styles(&self.graph, &self.config.style, &self.theme);
		self.sync_scene();
		info!("border-graph: theme changed to {mode:?}");
		true
	}

	/// Starts the animated return to the identity transform.
	pub fn reset_view(&mut self) {
		self.viewport.reset(self.width, self.height);
	}

	/// Advances everything by one animation frame of `dt` seconds.
	pub fn frame(&mut self, dt: f64) {
		let dt = if dt.is_finite() {
			dt.clamp(0.0, MAX_FRAME_DT)
		} else {
			0.0
		};
		self.sim.tick();
		self.viewport.advance(dt);
		self.highlight
			.tick(dt, self.config.style.transition_ms / 1000.0);
		self.sync_scene();
	}

	/// Drops any in-flight drag or hover before the state is discarded.
	pub fn teardown(&mut self) {
		self.interaction.cancel(&mut self.sim);
		self.highlight.clear();
		info!("border-graph: torn down");
	}

	/// The "loaded" message for the current graph.
	pub fn loaded_notification(&self) -> Notification {
		Notification::Loaded {
			countries: self.graph.node_count(),
			borders: self.graph.edge_count(),
		}
	}

	fn sync_scene(&mut self) {
		self.scene.sync(
			&self.graph,
			&self.sim,
			&self.styles,
			&self.highlight,
			&self.theme,
			&self.config.style,
			self.viewport.transform(),
			(self.width, self.height),
		);
	}

	/// The border graph.
	pub fn graph(&self) -> &BorderGraph {
		&self.graph
	}

	/// The force simulation.
	pub fn simulation(&self) -> &Simulation {
		&self.sim
	}

	/// The pan/zoom state.
	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// The pointer state machine.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Hover state.
	pub fn highlight(&self) -> &HighlightState {
		&self.highlight
	}

	/// Cached per-node styling, indexed like the graph nodes.
	pub fn styles(&self) -> &[NodeStyle] {
		&self.styles
	}

	/// Geometry synchronized by the last frame.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// Active theme.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Configuration after repair.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Container size after clamping.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}
}

fn clamp_size(width: f64, height: f64, min: f64) -> (f64, f64) {
	let clamp = |v: f64| if v.is_finite() { v.max(min) } else { min };
	(clamp(width), clamp(height))
}
