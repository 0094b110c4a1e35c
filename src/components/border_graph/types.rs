//! Dataset structures supplied to the border graph component.

use serde::Deserialize;

/// One shared border, as listed in the dataset.
///
/// Deserializes from a two-element JSON array, e.g. `["France", "Spain"]`.
/// Direction carries no meaning: `["Spain", "France"]` describes the same
/// border.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BorderPair(pub String, pub String);

impl BorderPair {
	/// Convenience constructor.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self(source.into(), target.into())
	}

	/// First country as listed.
	pub fn source(&self) -> &str {
		&self.0
	}

	/// Second country as listed.
	pub fn target(&self) -> &str {
		&self.1
	}
}

/// Complete dataset: ordered border pairs.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct BorderData {
	/// Pairs in dataset order. Order determines node and neighbor order.
	pub pairs: Vec<BorderPair>,
}

impl BorderData {
	/// Builds a dataset from `(source, target)` string pairs.
	pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, S)>) -> Self {
		Self {
			pairs: pairs
				.into_iter()
				.map(|(source, target)| BorderPair::new(source, target))
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_array_of_pairs() {
		let data: BorderData =
			serde_json::from_str(r#"[["France","Spain"],["Spain","Portugal"]]"#).unwrap();
		assert_eq!(data.pairs.len(), 2);
		assert_eq!(data.pairs[0], BorderPair::new("France", "Spain"));
		assert_eq!(data.pairs[1].target(), "Portugal");
	}

	#[test]
	fn rejects_pairs_with_wrong_arity() {
		assert!(serde_json::from_str::<BorderData>(r#"[["France"]]"#).is_err());
	}
}
