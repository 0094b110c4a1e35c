//! border-graph: Interactive force-directed graph of countries and their shared borders.
//!
//! This crate provides a WASM-based canvas component that lays out countries
//! with a physics simulation, sized and colored by how many neighbors they
//! have, with pan/zoom, dragging, hover highlighting and click-to-inspect.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::border_graph::{
	BorderData, BorderGraphCanvas, BorderPair, GraphConfig, Notification, ThemeMode,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("border-graph: logging initialized");
}

/// Text content of the inline script element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load border pairs from a script element with id="border-data".
/// Expected format: JSON array of `[source, target]` pairs.
fn load_border_data() -> Option<BorderData> {
	let json_text = script_text("border-data")?;
	match serde_json::from_str::<BorderData>(&json_text) {
		Ok(data) => {
			info!("border-graph: loaded {} border pairs", data.pairs.len());
			Some(data)
		}
		Err(e) => {
			warn!("border-graph: failed to parse border data: {}", e);
			None
		}
	}
}

/// Load tuning overrides from a script element with id="border-graph-config".
/// Any subset of [`GraphConfig`] fields may be given; out-of-range values are
/// repaired before use.
fn load_config() -> Option<GraphConfig> {
	let json_text = script_text("border-graph-config")?;
	serde_json::from_str::<GraphConfig>(&json_text)
		.inspect_err(|e| warn!("border-graph: failed to parse config, using defaults: {}", e))
		.ok()
		.map(GraphConfig::sanitized)
}

/// Main application component.
/// Loads border data from the DOM and renders the graph with its controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let border_data = load_border_data().unwrap_or_default();
	let data = Signal::derive(move || border_data.clone());
	let config = load_config().unwrap_or_default();
	let tuning = &config.simulation;
	let (min, max) = (tuning.min_strength.to_string(), tuning.max_strength.to_string());

	let (strength, set_strength) = signal(tuning.default_strength);
	let (reset, set_reset) = signal(0_u64);
	let (status, set_status) = signal(String::new());
	let on_notify = Callback::new(move |notification: Notification| {
		set_status.set(notification.to_string());
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Country Borders" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<BorderGraphCanvas
				data=data
				strength=strength
				reset=reset
				on_notify=on_notify
				fullscreen=true
				config=config
			/>
			<div class="graph-overlay">
				<h1>"Country Borders"</h1>
				<p class="subtitle">
					"Drag countries to reposition. Scroll to zoom. Drag background to pan. Click a country to list its neighbors."
				</p>
				<label class="strength">
					"Repulsion "
					<input
						type="range"
						min=min
						max=max
						step="1"
						prop:value=move || strength.get().to_string()
						on:input=move |ev| {
							if let Ok(value) = event_target_value(&ev).parse::<f64>() {
								set_strength.set(value);
							}
						}
					/>
				</label>
				<button on:click=move |_| set_reset.update(|generation| *generation += 1)>
					"Reset view"
				</button>
				<p class="status" role="status">{move || status.get()}</p>
			</div>
		</div>
	}
}
