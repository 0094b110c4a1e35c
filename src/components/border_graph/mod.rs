//! Country border graph component.
//!
//! Renders countries as nodes and shared borders as edges on an HTML canvas:
//! - Force-directed layout (many-body repulsion, springs, centering, anti-overlap)
//!   that cools down and reheats on interaction
//! - Pan, zoom, node dragging and an animated view reset
//! - Hover highlighting of a country's borders, click-to-inspect notifications
//! - Node size, color and label size scaled by neighbor count, light and dark themes
//!
//! Everything except [`BorderGraphCanvas`] and the canvas painter is plain
//! Rust with no browser dependency, so the engine is tested on the host.
//!
//! # Example
//!
//! ```ignore
//! use border_graph::{BorderData, BorderGraphCanvas};
//!
//! let data = BorderData::from_pairs([("France", "Spain"), ("France", "Germany")]);
//!
//! view! { <BorderGraphCanvas data=data strength=120.0 fullscreen=true /> }
//! ```

mod component;
pub mod config;
mod forces;
pub mod highlight;
pub mod interaction;
pub mod model;
pub mod notify;
mod render;
pub mod simulation;
pub mod state;
pub mod style;
pub mod sync;
pub mod theme;
mod types;
pub mod viewport;

pub use component::BorderGraphCanvas;
pub use config::GraphConfig;
pub use model::BorderGraph;
pub use notify::{Inspection, Notification};
pub use state::BorderGraphState;
pub use theme::{Theme, ThemeMode};
pub use types::{BorderData, BorderPair};
