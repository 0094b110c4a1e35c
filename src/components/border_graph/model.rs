//! Country nodes, border edges and neighbor lists derived from the raw pairs.
//!
//! Nodes live in an index-stable arena; everything downstream (forces,
//! highlight, scene geometry) refers to them by [`NodeIndex`].

use std::collections::HashMap;

use super::types::BorderPair;

/// Position of a node in the arena. Stable for the life of one build.
pub type NodeIndex = usize;

/// A country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryNode {
	/// Country name; unique within the graph.
	pub name: String,
	/// Bordering countries in first-seen order, without duplicates.
	pub neighbors: Vec<NodeIndex>,
}

/// A shared border, kept exactly as listed in the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderEdge {
	/// First country of the pair as given.
	pub source: NodeIndex,
	/// Second country of the pair as given.
	pub target: NodeIndex,
}

impl BorderEdge {
	/// Whether this edge touches `idx` (direction ignored).
	pub fn touches(&self, idx: NodeIndex) -> bool {
		self.source == idx || self.target == idx
	}

	/// Both ends are the same country.
	pub fn is_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Immutable graph built from a pair list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BorderGraph {
	nodes: Vec<CountryNode>,
	edges: Vec<BorderEdge>,
	index: HashMap<String, NodeIndex>,
}

impl BorderGraph {
	/// Builds the graph from ordered pairs.
	///
	/// Nodes appear in first-seen order across the whole scan, edges keep the
	/// input order and content. Neighbor lists come from one symmetric pass
	/// over all edges, so `A-B` makes each a neighbor of the other whichever
	/// way round it is listed, and a mirrored duplicate (`B-A` after `A-B`)
	/// does not count twice.
	pub fn from_pairs(pairs: &[BorderPair]) -> Self {
		let mut nodes: Vec<CountryNode> = Vec::new();
		let mut index: HashMap<String, NodeIndex> = HashMap::new();
		let mut intern = |name: &str| -> NodeIndex {
			if let Some(&idx) = index.get(name) {
				return idx;
			}
			let idx = nodes.len();
			nodes.push(CountryNode {
				name: name.to_string(),
				neighbors: Vec::new(),
			});
			index.insert(name.to_string(), idx);
			idx
		};

		let edges: Vec<BorderEdge> = pairs
			.iter()
			.map(|pair| {
				let source = intern(pair.source());
				let target = intern(pair.target());
				BorderEdge { source, target }
			})
			.collect();

		for edge in edges.iter().filter(|edge| !edge.is_loop()) {
			link(&mut nodes[edge.source].neighbors, edge.target);
			link(&mut nodes[edge.target].neighbors, edge.source);
		}

		Self {
			nodes,
			edges,
			index,
		}
	}

	/// Countries in first-seen order.
	pub fn nodes(&self) -> &[CountryNode] {
		&self.nodes
	}

	/// Borders in input order, duplicates included.
	pub fn edges(&self) -> &[BorderEdge] {
		&self.edges
	}

	/// Country at `idx`.
	pub fn node(&self, idx: NodeIndex) -> Option<&CountryNode> {
		self.nodes.get(idx)
	}

	/// Looks up a country by name.
	pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
		self.index.get(name).copied()
	}

	/// Number of countries.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of borders.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// True when there are no countries.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Number of distinct bordering countries; 0 for unknown indices.
	pub fn neighbor_count(&self, idx: NodeIndex) -> usize {
		self.nodes.get(idx).map_or(0, |node| node.neighbors.len())
	}

	/// Names of the bordering countries, in neighbor order.
	pub fn neighbor_names(&self, idx: NodeIndex) -> impl Iterator<Item = &str> {
		self.nodes
			.get(idx)
			.into_iter()
			.flat_map(|node| node.neighbors.iter())
			.map(|&n| self.nodes[n].name.as_str())
	}

	/// Largest neighbor count in the graph; 0 when empty.
	pub fn max_neighbor_count(&self) -> usize {
		self.nodes
			.iter()
			.map(|node| node.neighbors.len())
			.max()
			.unwrap_or(0)
	}

	/// Number of edges touching each node, loops counted once. Used to
	/// weight edge springs.
	pub fn degrees(&self) -> Vec<usize> {
		let mut degrees = vec![0; self.nodes.len()];
		for edge in &self.edges {
			degrees[edge.source] += 1;
			if !edge.is_loop() {
				degrees[edge.target] += 1;
			}
		}
		degrees
	}
}

fn link(neighbors: &mut Vec<NodeIndex>, other: NodeIndex) {
	if !neighbors.contains(&other) {
		neighbors.push(other);
	}
}
