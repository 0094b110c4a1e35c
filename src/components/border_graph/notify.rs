//! Messages emitted to the host's notification sink.

use std::fmt;

use super::model::{BorderGraph, NodeIndex};

/// Click-to-inspect summary of one country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
	/// Country name.
	pub country: String,
	/// Distinct neighbors.
	pub neighbor_count: usize,
	/// First few neighbor names, in neighbor order.
	pub preview: Vec<String>,
	/// Neighbors not listed in `preview`.
	pub overflow: usize,
}

impl Inspection {
	/// Summarizes node `idx`, listing at most `limit` neighbors.
	pub fn of(graph: &BorderGraph, idx: NodeIndex, limit: usize) -> Option<Self> {
		let node = graph.node(idx)?;
		let neighbor_count = node.neighbors.len();
		let preview: Vec<String> = graph
			.neighbor_names(idx)
			.take(limit)
			.map(str::to_string)
			.collect();
		Some(Self {
			country: node.name.clone(),
			neighbor_count,
			overflow: neighbor_count - preview.len(),
			preview,
		})
	}
}

impl fmt::Display for Inspection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let noun = if self.neighbor_count == 1 {
			"neighbor"
		} else {
			"neighbors"
		};
		write!(f, "{}: {} {}", self.country, self.neighbor_count, noun)?;
		if self.preview.is_empty() {
			return Ok(());
		}
		write!(f, " ({}", self.preview.join(", "))?;
		if self.overflow > 0 {
			write!(f, " +{} more", self.overflow)?;
		}
		write!(f, ")")
	}
}

/// Lifecycle and inspection messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
	/// A (re)build has started.
	Building,
	/// The layout has had time to settle after a build.
	Loaded {
		/// Node count.
		countries: usize,
		/// Edge count, mirrored pairs included.
		borders: usize,
	},
	/// A node was clicked.
	Inspect(Inspection),
}

impl fmt::Display for Notification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Notification::Building => write!(f, "Building border graph..."),
			Notification::Loaded { countries, borders } => {
				write!(f, "Loaded {countries} countries / {borders} borders")
			}
			Notification::Inspect(inspection) => write!(f, "{inspection}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::BorderPair;
	use super::*;

	fn star(center: &str, leaves: &[&str]) -> BorderGraph {
		let pairs: Vec<BorderPair> = leaves
			.iter()
			.map(|leaf| BorderPair::new(center, *leaf))
			.collect();
		BorderGraph::from_pairs(&pairs)
	}

	#[test]
	fn preview_lists_all_when_under_limit() {
		let graph = star("B", &["A", "C"]);
		let inspection = Inspection::of(&graph, 0, 5).unwrap();
		assert_eq!(inspection.preview, ["A", "C"]);
		assert_eq!(inspection.overflow, 0);
		assert_eq!(inspection.to_string(), "B: 2 neighbors (A, C)");
	}

	#[test]
	fn preview_truncates_with_overflow_count() {
		let graph = star("X", &["A", "B", "C", "D", "E", "F", "G"]);
		let inspection = Inspection::of(&graph, 0, 5).unwrap();
		assert_eq!(inspection.neighbor_count, 7);
		assert_eq!(inspection.preview.len(), 5);
		assert_eq!(inspection.overflow, 2);
		assert_eq!(
			Notification::Inspect(inspection).to_string(),
			"X: 7 neighbors (A, B, C, D, E +2 more)"
		);
	}

	#[test]
	fn singular_neighbor_and_unknown_node() {
		let graph = star("A", &["B"]);
		let inspection = Inspection::of(&graph, 1, 5).unwrap();
		assert_eq!(inspection.to_string(), "B: 1 neighbor (A)");
		assert!(Inspection::of(&graph, 9, 5).is_none());
	}

	#[test]
	fn lifecycle_messages() {
		assert_eq!(Notification::Building.to_string(), "Building border graph...");
		assert_eq!(
			Notification::Loaded {
				countries: 3,
				borders: 2
			}
			.to_string(),
			"Loaded 3 countries / 2 borders"
		);
	}
}
