//! Leptos component wrapping the border graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse, touch,
//! wheel and keyboard handlers for dragging, panning and zooming. Building the
//! graph acquires an animation loop via `requestAnimationFrame`, a window
//! `resize` listener, an optional `prefers-color-scheme` listener and the
//! delayed "loaded" timeout; all of them live in a [`GraphMount`] and are
//! released when it drops (rebuild or component disposal).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MediaQueryList, MouseEvent,
	TouchEvent, TouchList, WheelEvent, Window,
};

use super::config::GraphConfig;
use super::notify::Notification;
use super::render;
use super::state::BorderGraphState;
use super::theme::ThemeMode;
use super::types::BorderData;

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Graph state plus the canvas context it paints into.
struct GraphContext {
	state: BorderGraphState,
	ctx: CanvasRenderingContext2d,
	/// `requestAnimationFrame` timestamp of the previous frame.
	last_frame: Option<f64>,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Browser resources owned by one build of the graph.
struct GraphMount {
	window: Window,
	context: SharedContext,
	/// Handle of the pending animation frame.
	frame: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	resize: Option<Closure<dyn FnMut()>>,
	scheme: Option<(MediaQueryList, Closure<dyn FnMut()>)>,
	loaded: Option<(Option<i32>, Closure<dyn FnMut()>)>,
}

impl Drop for GraphMount {
	fn drop(&mut self) {
		if let Some(handle) = self.frame.take() {
			let _ = self.window.cancel_animation_frame(handle);
		}
		// The frame closure holds a reference to its own slot.
		self.animate.borrow_mut().take();

		if let Some(listener) = self.resize.take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
		}
		if let Some((query, listener)) = self.scheme.take() {
			let _ = query.remove_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
		}
		if let Some((Some(handle), _)) = self.loaded.take() {
			self.window.clear_timeout_with_handle(handle);
		}

		if let Some(mut graph) = self.context.try_borrow_mut().ok().and_then(|mut slot| slot.take()) {
			graph.state.teardown();
		}
	}
}

/// How the canvas picks its size.
#[derive(Clone, Copy, Debug)]
struct Sizing {
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
}

impl Sizing {
	fn measure(&self, canvas: &HtmlCanvasElement) -> (f64, f64) {
		let window = web_sys::window().filter(|_| self.fullscreen);
		if let Some(window) = window {
			let px = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
			return (px(window.inner_width()), px(window.inner_height()));
		}
		let parent = canvas.parent_element();
		(
			self.width.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			self.height.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}
}

fn emit(on_notify: Option<Callback<Notification>>, notification: Notification) {
	if let Some(callback) = on_notify {
		callback.run(notification);
	}
}

/// Runs `f` against the live graph state, if there is one.
fn with_state<R>(context: &SharedContext, f: impl FnOnce(&mut BorderGraphState) -> R) -> Option<R> {
	context
		.try_borrow_mut()
		.ok()?
		.as_mut()
		.map(|graph| f(&mut graph.state))
}

fn local_point(canvas_ref: NodeRef<Canvas>, client_x: i32, client_y: i32) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((client_x as f64 - rect.left(), client_y as f64 - rect.top()))
}

fn touch_point(canvas_ref: NodeRef<Canvas>, touches: TouchList) -> Option<(f64, f64)> {
	let touch = touches.get(0)?;
	local_point(canvas_ref, touch.client_x(), touch.client_y())
}

/// Builds the graph into `canvas` and acquires its browser resources.
#[allow(clippy::too_many_arguments)]
fn mount_graph(
	canvas: HtmlCanvasElement,
	data: &BorderData,
	sizing: Sizing,
	strength: f64,
	theme: Option<ThemeMode>,
	config: GraphConfig,
	context: &SharedContext,
	on_notify: Option<Callback<Notification>>,
) -> Option<GraphMount> {
	let Some(window) = web_sys::window() else {
		warn!("border-graph: no window, skipping build");
		return None;
	};
	let Some(ctx) = canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
	else {
		warn!("border-graph: canvas has no 2d context, skipping build");
		return None;
	};

	let scheme = match theme {
		Some(_) => None,
		None => window.match_media(DARK_SCHEME_QUERY).ok().flatten(),
	};
	let mode = theme
		.or_else(|| scheme.as_ref().map(|query| ThemeMode::from_dark(query.matches())))
		.unwrap_or_default();

	let (w, h) = sizing.measure(&canvas);
	let loaded_delay = i32::try_from(config.loaded_delay_ms).unwrap_or(i32::MAX);
	let state = BorderGraphState::new(data, w, h, strength, mode, config);
	let (w, h) = state.size();
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	*context.borrow_mut() = Some(GraphContext {
		state,
		ctx,
		last_frame: None,
	});

	let mut mount = GraphMount {
		window: window.clone(),
		context: context.clone(),
		frame: Rc::default(),
		animate: Rc::default(),
		resize: None,
		scheme: None,
		loaded: None,
	};

	let (context_resize, canvas_resize) = (context.clone(), canvas.clone());
	let resize = Closure::<dyn FnMut()>::new(move || {
		let (w, h) = sizing.measure(&canvas_resize);
		if let Some((w, h)) = with_state(&context_resize, |state| {
			state.resize(w, h);
			state.size()
		}) {
			canvas_resize.set_width(w as u32);
			canvas_resize.set_height(h as u32);
		}
	});
	let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
	mount.resize = Some(resize);

	if let Some(query) = scheme {
		let (context_scheme, query_change) = (context.clone(), query.clone());
		let listener = Closure::<dyn FnMut()>::new(move || {
			let mode = ThemeMode::from_dark(query_change.matches());
			with_state(&context_scheme, |state| state.set_theme(mode));
		});
		let _ = query.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
		mount.scheme = Some((query, listener));
	}

	let context_loaded = context.clone();
	let loaded = Closure::<dyn FnMut()>::new(move || {
		if let Some(notification) = with_state(&context_loaded, |state| state.loaded_notification()) {
			info!("border-graph: {notification}");
			emit(on_notify, notification);
		}
	});
	let handle = window
		.set_timeout_with_callback_and_timeout_and_arguments_0(
			loaded.as_ref().unchecked_ref::<js_sys::Function>(),
			loaded_delay,
		)
		.ok();
	mount.loaded = Some((handle, loaded));

	let (context_anim, animate_inner, frame_inner, window_anim) = (
		context.clone(),
		mount.animate.clone(),
		mount.frame.clone(),
		window.clone(),
	);
	*mount.animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
		if let Some(graph) = context_anim.borrow_mut().as_mut() {
			let dt = graph
				.last_frame
				.map_or(0.0, |last| (timestamp - last) / 1000.0);
			graph.last_frame = Some(timestamp);
			graph.state.frame(dt);
			render::render(
				graph.state.scene(),
				&graph.ctx,
				&graph.state.config().style,
				graph.state.theme(),
			);
		}
		if let Some(cb) = animate_inner.borrow().as_ref() {
			frame_inner.set(
				window_anim
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok(),
			);
		}
	}));
	if let Some(cb) = mount.animate.borrow().as_ref() {
		mount
			.frame
			.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
	}

	Some(mount)
}

/// Renders the interactive country border graph on a canvas element.
///
/// Pass border pairs via the reactive `data` signal; every change rebuilds
/// the graph from scratch. `strength`, `reset` and `theme` update the running
/// graph in place. The component sizes itself to its parent container by
/// default; set `fullscreen = true` to fill the viewport. Explicit
/// `width`/`height` override automatic sizing. Without a `theme` signal the
/// graph follows the system color scheme.
#[component]
pub fn BorderGraphCanvas(
	#[prop(into)] data: Signal<BorderData>,
	#[prop(into)] strength: Signal<f64>,
	#[prop(into, optional)] reset: Option<Signal<u64>>,
	#[prop(into, optional)] theme: Option<Signal<ThemeMode>>,
	#[prop(into, optional)] on_notify: Option<Callback<Notification>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: Option<GraphConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let mount = StoredValue::new_local(None::<GraphMount>);
	let config = config.unwrap_or_default();
	let sizing = Sizing {
		fullscreen,
		width,
		height,
	};

	let context_build = context.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let data = data.get();
		mount.update_value(|previous| {
			previous.take();
		});

		info!("border-graph: building from {} pairs", data.pairs.len());
		emit(on_notify, Notification::Building);
		let built = mount_graph(
			canvas,
			&data,
			sizing,
			strength.get_untracked(),
			theme.map(|theme| theme.get_untracked()),
			config.clone(),
			&context_build,
			on_notify,
		);
		mount.set_value(built);
	});

	on_cleanup(move || {
		mount.try_update_value(|current| {
			current.take();
		});
	});

	let context_strength = context.clone();
	Effect::new(move |_| {
		let value = strength.get();
		with_state(&context_strength, |state| state.set_strength(value));
	});

	if let Some(theme) = theme {
		let context_theme = context.clone();
		Effect::new(move |_| {
			let mode = theme.get();
			with_state(&context_theme, |state| state.set_theme(mode));
		});
	}

	if let Some(reset) = reset {
		let context_reset = context.clone();
		Effect::new(move |previous: Option<u64>| {
			let generation = reset.get();
			if previous.is_some_and(|previous| previous != generation) {
				debug!("border-graph: reset requested");
				with_state(&context_reset, |state| state.reset_view());
			}
			generation
		});
	}

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		if let Some(canvas) = canvas_ref.get() {
			let _ = canvas.focus();
		}
		let Some(point) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		with_state(&context_md, |state| state.pointer_down(point));
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(point) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		with_state(&context_mm, |state| state.pointer_move(point));
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(point) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		// Notify after the state borrow is released.
		if let Some(notification) = with_state(&context_mu, |state| state.pointer_up(point)).flatten() {
			emit(on_notify, notification);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&context_ml, |state| state.pointer_leave());
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(point) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		with_state(&context_wh, |state| state.wheel(point, ev.delta_y()));
	};

	let context_kd = context.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if with_state(&context_kd, |state| state.key(&ev.key())) == Some(true) {
			ev.prevent_default();
		}
	};

	let context_ts = context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(point) = touch_point(canvas_ref, ev.touches()) else {
			return;
		};
		with_state(&context_ts, |state| {
			state.pointer_move(point);
			state.pointer_down(point);
		});
	};

	let context_tm = context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(point) = touch_point(canvas_ref, ev.touches()) else {
			return;
		};
		with_state(&context_tm, |state| state.pointer_move(point));
	};

	let context_te = context.clone();
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		let notification = touch_point(canvas_ref, ev.changed_touches()).and_then(|point| {
			with_state(&context_te, |state| {
				let notification = state.pointer_up(point);
				state.pointer_leave();
				notification
			})
			.flatten()
		});
		if let Some(notification) = notification {
			emit(on_notify, notification);
		}
	};

	let context_tc = context.clone();
	let on_touchcancel = move |_: TouchEvent| {
		with_state(&context_tc, |state| state.pointer_leave());
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="border-graph-canvas"
			tabindex="0"
			aria-label="Country border graph"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:keydown=on_keydown
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block; cursor: grab; outline: none; touch-action: none;"
		/>
	}
}
