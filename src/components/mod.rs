//! UI components.

pub mod border_graph;
