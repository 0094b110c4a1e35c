//! Pointer and keyboard interaction state machine.
//!
//! Single-pointer model: one press at a time, so at most one node is ever
//! pinned by a drag. A press on a node drags it, a press on the background
//! pans. A press released on the node it started on, without travelling
//! further than the click tolerance, is a click.

use super::config::InteractionConfig;
use super::model::NodeIndex;
use super::simulation::Simulation;
use super::viewport::{Gesture, Viewport};

/// What the current press is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
	/// No button held.
	#[default]
	Idle,
	/// Node pinned under the pointer.
	Dragging(NodeIndex),
	/// Background press translating the view.
	Panning,
}

/// Tracks an in-progress press for click detection and pan deltas.
#[derive(Clone, Copy, Debug)]
struct Press {
	node: Option<NodeIndex>,
	origin: (f64, f64),
	last: (f64, f64),
	/// Farthest distance from `origin` seen so far, in screen pixels.
	travel: f64,
}

impl Press {
	fn track(&mut self, screen: (f64, f64)) -> (f64, f64) {
		let delta = (screen.0 - self.last.0, screen.1 - self.last.1);
		self.last = screen;
		let (dx, dy) = (screen.0 - self.origin.0, screen.1 - self.origin.1);
		self.travel = self.travel.max(dx.hypot(dy));
		delta
	}
}

/// Pointer state machine; owns at most one drag pin.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	mode: Mode,
	press: Option<Press>,
	config: InteractionConfig,
}

impl Interaction {
	/// Idle machine.
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	/// Current mode.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Node currently pinned by a drag.
	pub fn dragged(&self) -> Option<NodeIndex> {
		match self.mode {
			Mode::Dragging(idx) => Some(idx),
			_ => None,
		}
	}

	/// Pointer pressed at `screen` over `target` (hit-tested by the caller).
	///
	/// On a node: pins it where it is and keeps the simulation warm. Any
	/// stale press (a release the canvas never saw) is ended first.
	pub fn pointer_down(
		&mut self,
		screen: (f64, f64),
		target: Option<NodeIndex>,
		sim: &mut Simulation,
	) {
		self.release(sim);
		self.mode = match target.and_then(|idx| sim.position(idx).map(|p| (idx, p))) {
			Some((idx, (x, y))) => {
				sim.pin(idx, x, y);
				sim.hold_warm();
				Mode::Dragging(idx)
			}
			None => Mode::Panning,
		};
		self.press = Some(Press {
			node: target,
			origin: screen,
			last: screen,
			travel: 0.0,
		});
	}

	/// Pointer moved to `screen`: moves the pin (through the inverse
	/// transform) or pans the view.
	pub fn pointer_move(&mut self, screen: (f64, f64), sim: &mut Simulation, viewport: &mut Viewport) {
		let Some(press) = self.press.as_mut() else {
			return;
		};
		let (dx, dy) = press.track(screen);
		match self.mode {
			Mode::Dragging(idx) => {
				let (x, y) = viewport.transform().invert(screen);
				if x.is_finite() && y.is_finite() {
					sim.pin(idx, x, y);
				}
			}
			Mode::Panning => viewport.apply(Gesture::Pan { dx, dy }),
			Mode::Idle => {}
		}
	}

	/// Pointer released at `screen` over `target`. Unpins, lets the layout
	/// cool normally, and returns the clicked node if this press was a click.
	pub fn pointer_up(
		&mut self,
		screen: (f64, f64),
		target: Option<NodeIndex>,
		sim: &mut Simulation,
	) -> Option<NodeIndex> {
		let mut press = self.press.take()?;
		press.track(screen);
		self.release(sim);
		press
			.node
			.filter(|&idx| Some(idx) == target && press.travel <= self.config.click_tolerance)
	}

	/// Pointer left the canvas, or the graph is being torn down.
	pub fn cancel(&mut self, sim: &mut Simulation) {
		self.press = None;
		self.release(sim);
	}

	fn release(&mut self, sim: &mut Simulation) {
		if let Mode::Dragging(idx) = self.mode {
			sim.unpin(idx);
			sim.cool();
		}
		self.mode = Mode::Idle;
	}

	/// Tuning in effect.
	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}
}

/// Keyboard equivalent of a pointer gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
	/// Apply a pan or zoom.
	Gesture(Gesture),
	/// Start the animated reset.
	Reset,
}

/// Maps a `KeyboardEvent.key` value to an action for a `width` x `height`
/// canvas. Zoom keys zoom about the canvas center.
pub fn key_action(
	key: &str,
	width: f64,
	height: f64,
	config: &InteractionConfig,
	zoom_in: f64,
	zoom_out: f64,
) -> Option<KeyAction> {
	let center = (width / 2.0, height / 2.0);
	let step = config.key_pan_step;
	let pan = |dx, dy| Some(KeyAction::Gesture(Gesture::Pan { dx, dy }));
	match key {
		"+" | "=" => Some(KeyAction::Gesture(Gesture::Zoom {
			factor: zoom_in,
			anchor: center,
		})),
		"-" | "_" => Some(KeyAction::Gesture(Gesture::Zoom {
			factor: zoom_out,
			anchor: center,
		})),
		"ArrowLeft" => pan(step, 0.0),
		"ArrowRight" => pan(-step, 0.0),
		"ArrowUp" => pan(0.0, step),
		"ArrowDown" => pan(0.0, -step),
		"0" | "Escape" => Some(KeyAction::Reset),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::super::config::SimulationConfig;
	use super::super::model::BorderGraph;
	use super::super::types::BorderPair;
	use super::super::viewport::ViewTransform;
	use super::*;

	fn simulation() -> Simulation {
		let graph = BorderGraph::from_pairs(&[
			BorderPair::new("A", "B"),
			BorderPair::new("B", "C"),
		]);
		Simulation::new(
			&graph,
			&[6.0, 7.0, 6.0],
			(200.0, 200.0),
			120.0,
			SimulationConfig::default(),
		)
	}

	#[test]
	fn press_on_node_pins_it_in_place_and_reheats() {
		let mut sim = simulation();
		while sim.tick() {}
		let mut interaction = Interaction::default();
		let before = sim.position(1).unwrap();

		interaction.pointer_down((0.0, 0.0), Some(1), &mut sim);

		assert_eq!(interaction.dragged(), Some(1));
		let body = sim.bodies()[1];
		assert_eq!((body.fx, body.fy), (Some(before.0), Some(before.1)));
		assert!(sim.alpha() >= sim.config().reheat_alpha);
		assert!(sim.is_running());
	}

	#[test]
	fn drag_pins_at_inverse_transformed_pointer() {
		let mut sim = simulation();
		let mut viewport = Viewport::default();
		viewport.apply(Gesture::Zoom {
			factor: 2.0,
			anchor: (0.0, 0.0),
		});
		viewport.apply(Gesture::Pan { dx: 10.0, dy: 20.0 });
		let mut interaction = Interaction::default();

		interaction.pointer_down((0.0, 0.0), Some(0), &mut sim);
		interaction.pointer_move((110.0, 120.0), &mut sim, &mut viewport);

		let body = sim.bodies()[0];
		assert_eq!((body.fx, body.fy), (Some(50.0), Some(50.0)));
		assert_eq!(
			viewport.transform(),
			ViewTransform {
				x: 10.0,
				y: 20.0,
				k: 2.0
			}
		);
	}

	#[test]
	fn release_unpins_and_cools() {
		let mut sim = simulation();
		let mut interaction = Interaction::default();
		interaction.pointer_down((0.0, 0.0), Some(0), &mut sim);
		let clicked = interaction.pointer_up((40.0, 0.0), Some(0), &mut sim);

		assert_eq!(clicked, None);
		assert_eq!(sim.pinned().count(), 0);
		assert_eq!(sim.alpha_target(), 0.0);
		assert_eq!(interaction.mode(), Mode::Idle);
	}

	#[test]
	fn at_most_one_pin_whatever_the_sequence() {
		let mut sim = simulation();
		let mut viewport = Viewport::default();
		let mut interaction = Interaction::default();
		let script: [(&str, Option<NodeIndex>); 9] = [
			("down", Some(0)),
			("down", Some(1)),
			("move", None),
			("down", Some(2)),
			("up", Some(0)),
			("up", None),
			("down", None),
			("down", Some(1)),
			("leave", None),
		];
		for (event, target) in script {
			match event {
				"down" => interaction.pointer_down((5.0, 5.0), target, &mut sim),
				"move" => interaction.pointer_move((9.0, 9.0), &mut sim, &mut viewport),
				"up" => {
					interaction.pointer_up((5.0, 5.0), target, &mut sim);
				}
				_ => interaction.cancel(&mut sim),
			}
			assert!(sim.pinned().count() <= 1);
		}
		assert_eq!(sim.pinned().count(), 0);
	}

	#[test]
	fn click_requires_same_node_and_small_travel() {
		let mut sim = simulation();
		let mut viewport = Viewport::default();
		let mut interaction = Interaction::default();

		interaction.pointer_down((10.0, 10.0), Some(2), &mut sim);
		interaction.pointer_move((11.0, 12.0), &mut sim, &mut viewport);
		assert_eq!(interaction.pointer_up((11.0, 12.0), Some(2), &mut sim), Some(2));

		interaction.pointer_down((10.0, 10.0), Some(2), &mut sim);
		assert_eq!(interaction.pointer_up((10.0, 10.0), Some(1), &mut sim), None);

		interaction.pointer_down((10.0, 10.0), Some(2), &mut sim);
		interaction.pointer_move((60.0, 10.0), &mut sim, &mut viewport);
		interaction.pointer_move((10.0, 10.0), &mut sim, &mut viewport);
		assert_eq!(interaction.pointer_up((10.0, 10.0), Some(2), &mut sim), None);

		assert_eq!(interaction.pointer_up((10.0, 10.0), Some(2), &mut sim), None);
	}

	#[test]
	fn background_press_pans_and_never_clicks() {
		let mut sim = simulation();
		let mut viewport = Viewport::default();
		let mut interaction = Interaction::default();

		interaction.pointer_down((100.0, 100.0), None, &mut sim);
		interaction.pointer_move((130.0, 90.0), &mut sim, &mut viewport);
		interaction.pointer_move((140.0, 95.0), &mut sim, &mut viewport);
		assert_eq!(interaction.pointer_up((140.0, 95.0), None, &mut sim), None);

		let t = viewport.transform();
		assert_eq!((t.x, t.y, t.k), (40.0, -5.0, 1.0));
		assert_eq!(sim.pinned().count(), 0);
	}

	#[test]
	fn moves_without_press_do_nothing() {
		let mut sim = simulation();
		let mut viewport = Viewport::default();
		let mut interaction = Interaction::default();
		interaction.pointer_move((50.0, 50.0), &mut sim, &mut viewport);
		assert!(viewport.transform().is_identity());
		assert_eq!(sim.pinned().count(), 0);
	}

	#[test]
	fn keys_map_to_gestures() {
		let config = InteractionConfig::default();
		assert_eq!(
			key_action("ArrowLeft", 800.0, 600.0, &config, 1.1, 0.9),
			Some(KeyAction::Gesture(Gesture::Pan {
				dx: config.key_pan_step,
				dy: 0.0
			}))
		);
		assert_eq!(
			key_action("+", 800.0, 600.0, &config, 1.1, 0.9),
			Some(KeyAction::Gesture(Gesture::Zoom {
				factor: 1.1,
				anchor: (400.0, 300.0)
			}))
		);
		assert_eq!(
			key_action("Escape", 800.0, 600.0, &config, 1.1, 0.9),
			Some(KeyAction::Reset)
		);
		assert_eq!(key_action("q", 800.0, 600.0, &config, 1.1, 0.9), None);
	}
}
