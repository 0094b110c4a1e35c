//! Force simulation: node arena, alpha cooling and integration.
//!
//! The simulation is the single owner of node positions and velocities.
//! Everything else reads positions through [`Simulation::position`] /
//! [`Simulation::bodies`] and changes them only through pins.
//!
//! Cooling: alpha moves a fixed fraction (`alpha_decay`) towards the alpha
//! target each tick. The target is zero except while a drag keeps the layout
//! warm. Once both fall below `alpha_min` the simulation stops stepping until
//! something reheats it.

use std::f64::consts::PI;

use log::debug;

use super::config::SimulationConfig;
use super::forces::{self, Spring};
use super::model::{BorderGraph, NodeIndex};

/// Physical state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Velocity carried into the next tick.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Pinned x; while set the body sits exactly here.
	pub fx: Option<f64>,
	/// Pinned y; while set the body sits exactly here.
	pub fy: Option<f64>,
}

impl Body {
	/// Whether a pin holds the body.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Iterative force-directed layout.
pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	/// Anti-overlap radius per body (glyph radius + padding).
	radii: Vec<f64>,
	strength: f64,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	running: bool,
	config: SimulationConfig,
}

impl Simulation {
	/// Creates a simulation for `graph`, with bodies on a phyllotaxis spiral
	/// around `center`. `glyph_radii` are the rendered node radii, indexed like
	/// the graph's nodes.
	pub fn new(
		graph: &BorderGraph,
		glyph_radii: &[f64],
		center: (f64, f64),
		strength: f64,
		config: SimulationConfig,
	) -> Self {
		let config = config.sanitized();
		let strength = if strength.is_finite() {
			strength.clamp(config.min_strength, config.max_strength)
		} else {
			config.default_strength
		};
		let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
		let bodies = (0..graph.node_count())
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				Body {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		let degrees = graph.degrees();
		let springs = graph
			.edges()
			.iter()
			.filter(|edge| !edge.is_loop())
			.map(|edge| Spring::new(edge.source, edge.target, &degrees))
			.collect();

		let radii = (0..graph.node_count())
			.map(|i| glyph_radii.get(i).copied().unwrap_or(0.0) + config.collision_padding)
			.collect();

		Self {
			bodies,
			springs,
			radii,
			strength,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			config,
		}
	}

	/// Advances one tick if the simulation is still running.
	///
	/// Returns whether a step was taken. Stops itself once cooled.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.step();
		if self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min {
			self.running = false;
			debug!("border-graph: simulation settled");
		}
		true
	}

	/// One unconditional step: accumulate forces, integrate, cool.
	pub fn step(&mut self) {
		let config = &self.config;
		forces::repulsion(
			&mut self.bodies,
			self.strength,
			config.distance_min,
			self.alpha,
		);
		forces::centering(
			&mut self.bodies,
			self.center.0,
			self.center.1,
			config.center_strength,
		);
		forces::springs(
			&mut self.bodies,
			&self.springs,
			config.link_distance,
			self.alpha,
		);
		forces::collision(&mut self.bodies, &self.radii, config.collision_strength);

		let retain = 1.0 - config.velocity_decay;
		for body in &mut self.bodies {
			integrate(&mut body.x, &mut body.vx, body.fx, retain);
			integrate(&mut body.y, &mut body.vy, body.fy, retain);
		}

		self.alpha += (self.alpha_target - self.alpha) * config.alpha_decay;
		self.alpha = self.alpha.clamp(0.0, 1.0);
	}

	/// Raises alpha to at least the reheat level and resumes ticking.
	pub fn reheat(&mut self) {
		self.alpha = self.alpha.max(self.config.reheat_alpha).min(1.0);
		self.running = true;
	}

	/// Keeps the layout at the reheat level until [`Self::cool`] (drag).
	pub fn hold_warm(&mut self) {
		self.alpha_target = self.config.reheat_alpha;
		self.reheat();
	}

	/// Lets alpha decay towards zero again.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Replaces the repulsion magnitude, clamped to the configured range.
	///
	/// Node and edge state are untouched. Reheats when the value changes;
	/// returns whether it did.
	pub fn set_strength(&mut self, strength: f64) -> bool {
		if !strength.is_finite() {
			return false;
		}
		let strength = strength.clamp(self.config.min_strength, self.config.max_strength);
		if strength == self.strength {
			return false;
		}
		debug!(
			"border-graph: repulsion {} -> {}, reheating",
			self.strength, strength
		);
		self.strength = strength;
		self.reheat();
		true
	}

	/// Moves the centering target (viewport center changed).
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Pins a body; it follows the pin exactly until [`Self::unpin`].
	pub fn pin(&mut self, idx: NodeIndex, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = Some(x);
			body.fy = Some(y);
		}
	}

	/// Releases a pin; the body resumes free motion on the next tick.
	pub fn unpin(&mut self, idx: NodeIndex) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = None;
			body.fy = None;
		}
	}

	/// Indices of all pinned bodies.
	pub fn pinned(&self) -> impl Iterator<Item = NodeIndex> + '_ {
		self.bodies
			.iter()
			.enumerate()
			.filter(|(_, body)| body.is_pinned())
			.map(|(i, _)| i)
	}

	/// Current position of body `idx`.
	pub fn position(&self, idx: NodeIndex) -> Option<(f64, f64)> {
		self.bodies.get(idx).map(|body| (body.x, body.y))
	}

	/// All bodies, indexed like the graph nodes.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Current cooling level, 0..=1.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Level alpha decays towards.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// False once cooled below `alpha_min`.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Repulsion magnitude in effect.
	pub fn strength(&self) -> f64 {
		self.strength
	}

	/// Centering target.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Tuning in effect.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}
}

/// Integrates one axis. Pinned axes snap to the pin with zero velocity;
/// non-finite velocities are dropped rather than propagated into positions.
fn integrate(position: &mut f64, velocity: &mut f64, pin: Option<f64>, retain: f64) {
	if let Some(fixed) = pin {
		*position = fixed;
		*velocity = 0.0;
		return;
	}
	*velocity *= retain;
	if !velocity.is_finite() {
		*velocity = 0.0;
	}
	*position += *velocity;
}

#[cfg(test)]
mod tests {
	use super::super::types::BorderPair;
	use super::*;

	fn graph(raw: &[(&str, &str)]) -> BorderGraph {
		let pairs: Vec<BorderPair> = raw.iter().map(|(a, b)| BorderPair::new(*a, *b)).collect();
		BorderGraph::from_pairs(&pairs)
	}

	fn simulation(raw: &[(&str, &str)]) -> Simulation {
		let graph = graph(raw);
		let radii = vec![6.0; graph.node_count()];
		Simulation::new(
			&graph,
			&radii,
			(400.0, 300.0),
			120.0,
			SimulationConfig::default(),
		)
	}

	fn settle(sim: &mut Simulation) {
		while sim.tick() {}
	}

	#[test]
	fn alpha_never_increases_without_a_kick() {
		let mut sim = simulation(&[("A", "B"), ("B", "C"), ("C", "A")]);
		let mut previous = sim.alpha();
		for _ in 0..500 {
			sim.tick();
			assert!(sim.alpha() <= previous);
			assert!((0.0..=1.0).contains(&sim.alpha()));
			previous = sim.alpha();
		}
		assert!(!sim.is_running());
	}

	#[test]
	fn stopped_simulation_does_not_move() {
		let mut sim = simulation(&[("A", "B")]);
		settle(&mut sim);
		let before = sim.bodies().to_vec();
		assert!(!sim.tick());
		assert_eq!(sim.bodies(), &before[..]);
	}

	#[test]
	fn strength_change_reheats_settled_layout() {
		let mut sim = simulation(&[("A", "B"), ("B", "C")]);
		settle(&mut sim);
		assert!(sim.alpha() < sim.config().alpha_min);

		assert!(sim.set_strength(250.0));
		assert!(sim.alpha() >= sim.config().reheat_alpha);
		assert!(sim.is_running());
		assert_eq!(sim.strength(), 250.0);
	}

	#[test]
	fn unchanged_or_invalid_strength_is_ignored() {
		let mut sim = simulation(&[("A", "B")]);
		settle(&mut sim);
		assert!(!sim.set_strength(120.0));
		assert!(!sim.set_strength(f64::NAN));
		assert!(!sim.is_running());
	}

	#[test]
	fn strength_is_clamped() {
		let mut sim = simulation(&[("A", "B")]);
		sim.set_strength(5_000.0);
		assert_eq!(sim.strength(), 300.0);
		sim.set_strength(-4.0);
		assert_eq!(sim.strength(), 10.0);
	}

	#[test]
	fn pinned_body_follows_pin_only() {
		let mut sim = simulation(&[("A", "B"), ("B", "C")]);
		sim.pin(0, 50.0, 50.0);
		for _ in 0..20 {
			sim.step();
			assert_eq!(sim.position(0), Some((50.0, 50.0)));
		}
		assert_eq!(sim.pinned().collect::<Vec<_>>(), [0]);
		sim.unpin(0);
		assert_eq!(sim.pinned().count(), 0);
	}

	#[test]
	fn held_warm_alpha_stays_at_reheat_level() {
		let mut sim = simulation(&[("A", "B")]);
		settle(&mut sim);
		sim.hold_warm();
		for _ in 0..1_000 {
			sim.tick();
		}
		assert!(sim.is_running());
		approx::assert_relative_eq!(sim.alpha(), sim.config().reheat_alpha, epsilon = 1e-9);
		sim.cool();
		settle(&mut sim);
		assert!(!sim.is_running());
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let mut sim = simulation(&[("A", "B")]);
		sim.set_strength(10.0);
		settle(&mut sim);
		let (ax, ay) = sim.position(0).unwrap();
		let (bx, by) = sim.position(1).unwrap();
		let distance = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
		assert!(distance > 40.0 && distance < 100.0, "distance {distance}");
	}

	#[test]
	fn layout_centers_on_viewport_center() {
		let mut sim = simulation(&[("A", "B"), ("B", "C"), ("C", "D")]);
		sim.set_center(100.0, 80.0);
		settle(&mut sim);
		let n = sim.bodies().len() as f64;
		let cx = sim.bodies().iter().map(|b| b.x).sum::<f64>() / n;
		let cy = sim.bodies().iter().map(|b| b.y).sum::<f64>() / n;
		approx::assert_abs_diff_eq!(cx, 100.0, epsilon = 1.0);
		approx::assert_abs_diff_eq!(cy, 80.0, epsilon = 1.0);
	}

	#[test]
	fn coincident_bodies_never_produce_nan() {
		let graph = graph(&[("A", "B"), ("B", "C"), ("A", "C")]);
		let mut sim = Simulation::new(
			&graph,
			&[6.0, 6.0, 6.0],
			(0.0, 0.0),
			300.0,
			SimulationConfig::default(),
		);
		for i in 0..3 {
			sim.pin(i, 10.0, 10.0);
		}
		sim.step();
		for i in 0..3 {
			sim.unpin(i);
		}
		for _ in 0..300 {
			sim.step();
			for body in sim.bodies() {
				assert!(body.x.is_finite() && body.y.is_finite());
			}
		}
		let (ax, ay) = sim.position(0).unwrap();
		let (bx, by) = sim.position(1).unwrap();
		assert!((ax - bx).hypot(ay - by) > 1.0);
	}

	#[test]
	fn anti_overlap_holds_at_minimum_strength() {
		let graph = graph(&[("A", "B")]);
		let mut sim = Simulation::new(
			&graph,
			&[20.0, 20.0],
			(0.0, 0.0),
			10.0,
			SimulationConfig {
				link_distance: 0.0,
				..SimulationConfig::default()
			},
		);
		settle(&mut sim);
		let (ax, ay) = sim.position(0).unwrap();
		let (bx, by) = sim.position(1).unwrap();
		assert!((ax - bx).hypot(ay - by) > 30.0);
	}

	#[test]
	fn empty_graph_ticks_quietly() {
		let graph = BorderGraph::default();
		let mut sim = Simulation::new(&graph, &[], (0.0, 0.0), 100.0, SimulationConfig::default());
		assert!(sim.tick());
		assert!(sim.bodies().is_empty());
	}

	#[test]
	fn identical_inputs_give_identical_layouts() {
		let raw = [("A", "B"), ("B", "C"), ("C", "A"), ("C", "D"), ("D", "D")];
		let (mut first, mut second) = (simulation(&raw), simulation(&raw));
		for _ in 0..120 {
			first.tick();
			second.tick();
		}
		assert_eq!(first.bodies(), second.bodies());
		assert_eq!(first.alpha(), second.alpha());
	}

	#[test]
	fn non_finite_initial_strength_falls_back_to_default() {
		let graph = graph(&[("A", "B"), ("B", "C")]);
		let radii = vec![6.0; graph.node_count()];
		let config = SimulationConfig::default();
		let mut sim = Simulation::new(&graph, &radii, (400.0, 300.0), f64::NAN, config.clone());
		assert_eq!(sim.strength(), config.default_strength);

		let before = sim.bodies().to_vec();
		for _ in 0..50 {
			sim.tick();
		}
		assert_ne!(sim.bodies(), before.as_slice());
	}

	#[test]
	fn inverted_strength_bounds_do_not_panic() {
		let graph = graph(&[("A", "B")]);
		let config = SimulationConfig {
			min_strength: 400.0,
			..SimulationConfig::default()
		};
		let mut sim = Simulation::new(&graph, &[6.0, 6.0], (0.0, 0.0), 120.0, config);
		assert_eq!(sim.strength(), 300.0);
		assert!(sim.set_strength(1_000.0));
		assert_eq!(sim.strength(), 400.0);
	}
}
