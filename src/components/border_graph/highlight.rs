//! Hover highlight state with cosmetic fade transitions.
//!
//! Which node is hovered is discrete and changes only on pointer events. On
//! top of that each node carries an intensity (0.0 to 1.0) that moves
//! linearly towards its target over the configured transition time, and a
//! global dim level does the same for "something is hovered". The
//! intensities only blend colors and sizes; they never feed back into the
//! simulation or the viewport.

use std::collections::HashMap;

use super::model::{BorderEdge, NodeIndex};

/// How an edge relates to the current hover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeRole {
	/// Nothing hovered.
	Normal,
	/// Touches the hovered node.
	Incident,
	/// Something else is hovered.
	Dimmed,
}

/// Hovered node plus the fade levels the synchronizer blends with.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<NodeIndex>,
	/// Per-node emphasis. Nodes not in this map have intensity 0.
	intensity: HashMap<NodeIndex, f64>,
	dim: f64,
}

impl HighlightState {
	/// Sets the hovered node. Returns whether it changed.
	pub fn set_hover(&mut self, node: Option<NodeIndex>) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		true
	}

	/// Node currently under the pointer.
	pub fn hovered(&self) -> Option<NodeIndex> {
		self.hovered
	}

	/// Role of `edge` under the current hover (ignores fades).
	pub fn edge_role(&self, edge: &BorderEdge) -> EdgeRole {
		match self.hovered {
			None => EdgeRole::Normal,
			Some(idx) if edge.touches(idx) => EdgeRole::Incident,
			Some(_) => EdgeRole::Dimmed,
		}
	}

	/// Moves every intensity towards its target by `dt / duration`.
	/// A non-positive duration jumps straight to the targets.
	pub fn tick(&mut self, dt: f64, duration: f64) {
		let step = if duration > 0.0 {
			(dt / duration).max(0.0)
		} else {
			1.0
		};

		if let Some(idx) = self.hovered {
			self.intensity.entry(idx).or_insert(0.0);
		}
		let hovered = self.hovered;
		self.intensity.retain(|&idx, value| {
			let target = if Some(idx) == hovered { 1.0 } else { 0.0 };
			*value = approach(*value, target, step);
			*value > 0.0 || Some(idx) == hovered
		});

		let dim_target = if hovered.is_some() { 1.0 } else { 0.0 };
		self.dim = approach(self.dim, dim_target, step);
	}

	/// Completes all running fades.
	pub fn settle(&mut self) {
		self.tick(0.0, 0.0);
	}

	/// Emphasis of node `idx`, 0 at rest and 1 when fully highlighted.
	pub fn node_intensity(&self, idx: NodeIndex) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Emphasis of an edge: that of its more emphasized endpoint.
	pub fn edge_intensity(&self, edge: &BorderEdge) -> f64 {
		self.node_intensity(edge.source)
			.max(self.node_intensity(edge.target))
	}

	/// How far non-highlighted edges are faded towards their dim opacity.
	pub fn dim(&self) -> f64 {
		self.dim
	}

	/// Drops hover and all fades.
	pub fn clear(&mut self) {
		*self = Self::default();
	}
}

fn approach(value: f64, target: f64, step: f64) -> f64 {
	if value < target {
		(value + step).min(target)
	} else {
		(value - step).max(target)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const AB: BorderEdge = BorderEdge {
		source: 0,
		target: 1,
	};
	const CD: BorderEdge = BorderEdge {
		source: 2,
		target: 3,
	};

	#[test]
	fn roles_follow_hover() {
		let mut state = HighlightState::default();
		assert_eq!(state.edge_role(&AB), EdgeRole::Normal);
		state.set_hover(Some(1));
		assert_eq!(state.edge_role(&AB), EdgeRole::Incident);
		assert_eq!(state.edge_role(&CD), EdgeRole::Dimmed);
	}

	#[test]
	fn fades_complete_after_duration() {
		let mut state = HighlightState::default();
		state.set_hover(Some(0));
		state.tick(0.1, 0.2);
		assert_eq!(state.node_intensity(0), 0.5);
		state.tick(0.1, 0.2);
		assert_eq!(state.node_intensity(0), 1.0);
		assert_eq!(state.edge_intensity(&AB), 1.0);
		assert_eq!(state.dim(), 1.0);
	}

	#[test]
	fn leaving_returns_exactly_to_zero() {
		let mut state = HighlightState::default();
		state.set_hover(Some(0));
		state.settle();
		state.set_hover(None);
		for _ in 0..20 {
			state.tick(1.0 / 60.0, 0.2);
		}
		assert_eq!(state.node_intensity(0), 0.0);
		assert_eq!(state.dim(), 0.0);
		assert!(state.intensity.is_empty());
	}

	#[test]
	fn set_hover_reports_changes_only() {
		let mut state = HighlightState::default();
		assert!(state.set_hover(Some(3)));
		assert!(!state.set_hover(Some(3)));
		assert!(state.set_hover(None));
	}

	#[test]
	fn switching_nodes_crossfades() {
		let mut state = HighlightState::default();
		state.set_hover(Some(0));
		state.settle();
		state.set_hover(Some(2));
		state.tick(0.0625, 0.25);
		assert_eq!(state.node_intensity(0), 0.75);
		assert_eq!(state.node_intensity(2), 0.25);
		assert_eq!(state.dim(), 1.0);
	}
}
