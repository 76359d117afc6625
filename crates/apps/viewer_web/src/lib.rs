use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use formats::GlobePoints;
use runtime::{FrameClock, Visibility, VisibilityChange, VisibilityGate};
use scene::{GlobeConfig, GlobeScene};

mod dom;
mod error;
mod frame_data;
mod wgpu;

use dom::Dom;
use error::ViewerError;
use frame_data::{BufferCapacities, FrameData};
use crate::wgpu::{WgpuContext, init_wgpu_from_canvas, render_globe, resize_wgpu};

pub const DEFAULT_DATA_URL: &str = "data/globe-points.json";

#[derive(Debug, Default)]
struct ViewerState {
    scene: Option<GlobeScene>,
    wgpu: Option<WgpuContext>,
    dom: Option<Dom>,
    clock: FrameClock,
    gate: VisibilityGate,
    loop_running: bool,
    booted: bool,
    failed: bool,
}

impl ViewerState {
    fn render_frame(&mut self, timestamp_ms: f64) {
        let frame = self.clock.on_paint(timestamp_ms);
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        scene.tick(frame.dt_ms());

        if let Some(ctx) = &self.wgpu {
            let data = FrameData::from_scene(scene);
            if let Err(err) = render_globe(ctx, &data) {
                console_error(&format!("render failed: {err:?}"));
            }
        }

        if let Some(dom) = self.dom.as_mut() {
            if scene.labels().is_visible() {
                dom.show_list();
            }
            dom.sync_labels(&scene.label_placements());
        }
    }

    fn apply_size(&mut self, width: f64, height: f64) {
        if let Some(scene) = self.scene.as_mut() {
            scene.set_viewport(width, height);
        }
        if let Some(ctx) = self.wgpu.as_mut() {
            resize_wgpu(ctx, width as u32, height as u32);
        }
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::default());
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

/// TLS access that yields a default during teardown instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<ViewerState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn console_log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

/// Logs the cause and shows the single fallback alert, once.
fn report_failure(err: &ViewerError) {
    console_error(&format!("globe: {err}"));
    let first = with_state(|state| {
        let mut s = state.borrow_mut();
        let first = !s.failed;
        s.failed = true;
        first
    });
    if !first {
        return;
    }
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(err.alert_message());
    }
}

fn has_webgl(window: &web_sys::Window) -> bool {
    js_sys::Reflect::get(window, &JsValue::from_str("WebGLRenderingContext"))
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Loads `data_url` (or the default data file) and starts the globe.
#[wasm_bindgen]
pub fn boot(data_url: Option<String>) {
    boot_inner(data_url, None);
}

/// Like `boot`, with a JSON `GlobeConfig` that overrides any config in the data.
#[wasm_bindgen]
pub fn boot_with_config(data_url: Option<String>, config_json: String) {
    boot_inner(data_url, Some(config_json));
}

fn boot_inner(data_url: Option<String>, config_json: Option<String>) {
    let already = with_state(|state| {
        let mut s = state.borrow_mut();
        let already = s.booted;
        s.booted = true;
        already
    });
    if already {
        console_log("globe: already booted");
        return;
    }

    let url = data_url
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());
    spawn_local(async move {
        if let Err(err) = boot_async(url, config_json).await {
            report_failure(&err);
        }
    });
}

async fn boot_async(url: String, config_json: Option<String>) -> Result<(), ViewerError> {
    let window = web_sys::window().ok_or(ViewerError::MissingElement { selector: "window" })?;
    if !has_webgl(&window) {
        return Err(ViewerError::WebGlUnsupported);
    }
    let mut dom = Dom::query(window)?;

    let data = fetch_globe_points(&url).await?;
    let config = match (config_json, &data.config) {
        (Some(text), _) => GlobeConfig::from_json_str(&text)?,
        (None, Some(value)) => GlobeConfig::from_json_value(value.clone())?,
        (None, None) => GlobeConfig::default(),
    };

    let seed = js_sys::Date::now() as u64;
    let mut scene = GlobeScene::new(data, config, seed)?;
    dom.create_labels(scene.labels())?;

    let (width, height) = dom.resize();
    scene.set_viewport(width, height);

    let capacities = BufferCapacities::for_scene(&scene);
    let ctx = init_wgpu_from_canvas(dom.canvas.clone(), capacities)
        .await
        .map_err(|e| ViewerError::Gpu(format!("{e:?}")))?;

    console_log(&format!(
        "globe: {} locations, {} connectors, {} dots",
        scene.data().locations.len(),
        scene.connectors().connectors().len(),
        scene.globe_dots().len(),
    ));

    let document = dom.document().clone();
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.scene = Some(scene);
        s.wgpu = Some(ctx);
        s.dom = Some(dom);
    });

    install_listeners(&document)?;
    install_frame_callback();
    resume_loop();
    Ok(())
}

async fn fetch_globe_points(url: &str) -> Result<GlobePoints, ViewerError> {
    let fetch_err = |reason: String| ViewerError::Fetch {
        url: url.to_string(),
        reason,
    };
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    if !resp.ok() {
        return Err(fetch_err(format!("HTTP {}", resp.status())));
    }
    let text = resp.text().await.map_err(|e| fetch_err(e.to_string()))?;
    Ok(GlobePoints::from_json_str(&text)?)
}

fn install_frame_callback() {
    let callback = Closure::<dyn FnMut(f64)>::new(on_frame);
    FRAME_CALLBACK.with(|cb| *cb.borrow_mut() = Some(callback));
}

fn schedule_frame() {
    FRAME_CALLBACK.with(|cb| {
        let cb = cb.borrow();
        let (Some(callback), Some(window)) = (cb.as_ref(), web_sys::window()) else {
            return;
        };
        if let Err(err) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            console_error(&format!("requestAnimationFrame failed: {err:?}"));
        }
    });
}

/// Starts the paint loop unless a callback is already pending.
fn resume_loop() {
    let should_schedule = with_state(|state| {
        let mut s = state.borrow_mut();
        if s.loop_running || !s.gate.should_schedule_next_frame() {
            return false;
        }
        s.loop_running = true;
        true
    });
    if should_schedule {
        schedule_frame();
    }
}

fn on_frame(timestamp_ms: f64) {
    let keep_going = with_state(|state| {
        let mut s = state.borrow_mut();
        s.render_frame(timestamp_ms);
        let keep = s.gate.should_schedule_next_frame();
        s.loop_running = keep;
        keep
    });
    if keep_going {
        schedule_frame();
    }
}

fn apply_visibility_change(change: VisibilityChange) {
    match change {
        VisibilityChange::Paused => with_state(|state| state.borrow_mut().clock.pause()),
        VisibilityChange::Resumed => resume_loop(),
        VisibilityChange::Unchanged => {}
    }
}

fn on_visibility_change() {
    let visibility = web_sys::window()
        .and_then(|w| w.document())
        .map(|d| match d.visibility_state() {
            web_sys::VisibilityState::Hidden => Visibility::Hidden,
            _ => Visibility::Visible,
        })
        .unwrap_or_default();
    let change = with_state(|state| Some(state.borrow_mut().gate.report(visibility)));
    if let Some(change) = change {
        apply_visibility_change(change);
    }
}

fn on_resize() {
    with_state(|state| {
        let mut s = state.borrow_mut();
        let Some((width, height)) = s.dom.as_ref().map(Dom::resize) else {
            return;
        };
        s.apply_size(width, height);
    });
}

fn install_listeners(document: &web_sys::Document) -> Result<(), ViewerError> {
    let window = web_sys::window().ok_or(ViewerError::MissingElement { selector: "window" })?;
    let listen_err = |e: JsValue| ViewerError::Dom(format!("{e:?}"));

    let visibility = Closure::<dyn FnMut()>::new(on_visibility_change);
    document
        .add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())
        .map_err(listen_err)?;
    visibility.forget();

    let resize = Closure::<dyn FnMut()>::new(on_resize);
    window
        .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
        .map_err(listen_err)?;

    // Orientation changes report the old size until layout settles.
    let deferred_resize: js_sys::Function = resize.into_js_value().unchecked_into();
    let orientation = Closure::<dyn FnMut()>::new(move || {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&deferred_resize, 0);
        }
    });
    window
        .add_event_listener_with_callback("orientationchange", orientation.as_ref().unchecked_ref())
        .map_err(listen_err)?;
    orientation.forget();

    Ok(())
}

/// Host-driven resize, in CSS pixels.
#[wasm_bindgen]
pub fn set_canvas_sizes(width: f64, height: f64) {
    with_state(|state| state.borrow_mut().apply_size(width.max(1.0), height.max(1.0)));
}

/// Pauses or resumes the paint loop independently of page visibility.
#[wasm_bindgen]
pub fn set_paused(paused: bool) {
    let change = with_state(|state| Some(state.borrow_mut().gate.set_paused(paused)));
    if let Some(change) = change {
        apply_visibility_change(change);
    }
}
