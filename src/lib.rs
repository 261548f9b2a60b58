#![cfg(target_arch = "wasm32")]
//! Browser front-end for the sonic wave visualizer.
//!
//! The page constructs one [`SonicVisualizer`] and hands it to its player;
//! there is no global instance.

use sonic_core::{Backdrop, Visualizer, VisualizerConfig};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod canvas;
mod constants;
mod dom;
mod events;
mod frame;

use audio::WebTap;
use canvas::CanvasSurface;
use frame::RafScheduler;

pub(crate) type WebVisualizer = Visualizer<WebTap, CanvasSurface, RafScheduler>;

#[wasm_bindgen(start)]
pub fn boot() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("sonic-web loaded");
    Ok(())
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

fn build(config: VisualizerConfig) -> anyhow::Result<Rc<RefCell<WebVisualizer>>> {
    // The scheduler's callback needs a handle to the visualizer that owns
    // the scheduler; fill it in once the visualizer exists.
    let slot: Rc<RefCell<Weak<RefCell<WebVisualizer>>>> = Rc::new(RefCell::new(Weak::new()));
    let target = slot.clone();
    let scheduler = RafScheduler::new(move |token| {
        let weak = target.borrow().clone();
        events::dispatch_frame(&weak, token);
    });
    let tap = WebTap::new(config.tap);
    let viz = Visualizer::new(tap, scheduler, config)?;
    let shared = Rc::new(RefCell::new(viz));
    *slot.borrow_mut() = Rc::downgrade(&shared);
    Ok(shared)
}

/// Handle given to the playback layer.
#[wasm_bindgen]
pub struct SonicVisualizer {
    inner: Rc<RefCell<WebVisualizer>>,
    listeners: Vec<dom::Listener>,
}

#[wasm_bindgen]
impl SonicVisualizer {
    /// Bind to `#audio-visualizer` (created if missing) as a trail strip.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<SonicVisualizer, JsValue> {
        Self::init().map_err(to_js)
    }

    /// Tap `audio`. Ignored while a tap is already attached.
    #[wasm_bindgen(js_name = connectAudio)]
    pub fn connect_audio(&self, audio: &web::HtmlMediaElement) {
        self.inner.borrow_mut().connect_audio(audio);
    }

    /// Connect and follow the element's play/pause/ended/error/volume events.
    #[wasm_bindgen(js_name = attachPlayer)]
    pub fn attach_player(&mut self, audio: &web::HtmlMediaElement) -> Result<(), JsValue> {
        self.inner.borrow_mut().connect_audio(audio);
        let mut wired = events::wire_player(&self.inner, audio).map_err(to_js)?;
        self.listeners.append(&mut wired);
        self.inner.borrow_mut().set_volume(audio.volume() as f32);
        if !audio.paused() {
            self.inner.borrow_mut().start();
        }
        Ok(())
    }

    pub fn start(&self) {
        self.inner.borrow_mut().start();
    }

    pub fn stop(&self) {
        self.inner.borrow_mut().stop();
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        self.inner.borrow_mut().set_volume(volume as f32);
    }

    /// Move drawing to another canvas. `overlay` canvases are cleared to
    /// transparent each frame instead of leaving a trail.
    #[wasm_bindgen(js_name = setDrawTarget)]
    pub fn set_draw_target(&self, canvas: web::HtmlCanvasElement, overlay: bool) {
        let backdrop = if overlay {
            Backdrop::Overlay
        } else {
            Backdrop::Trail
        };
        let previous = self
            .inner
            .borrow_mut()
            .set_draw_target(CanvasSurface::new(canvas, backdrop));
        if let Some(prev) = previous {
            log::debug!("released draw target #{}", prev.canvas().id());
        }
    }

    #[wasm_bindgen(js_name = averageAmplitude)]
    pub fn average_amplitude(&self) -> f64 {
        self.inner.borrow().average_amplitude() as f64
    }

    pub fn phase(&self) -> String {
        self.inner.borrow().phase().to_string()
    }

    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.inner.borrow_mut().destroy();
    }
}

impl SonicVisualizer {
    fn init() -> anyhow::Result<SonicVisualizer> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let canvas = dom::find_or_create_canvas(&document)?;
        let inner = build(VisualizerConfig::default())?;
        inner
            .borrow_mut()
            .set_draw_target(CanvasSurface::new(canvas, Backdrop::Trail));
        let resize = events::wire_resize(&inner)?;
        Ok(SonicVisualizer {
            inner,
            listeners: vec![resize],
        })
    }
}

impl Drop for SonicVisualizer {
    fn drop(&mut self) {
        if let Ok(mut viz) = self.inner.try_borrow_mut() {
            viz.destroy();
        }
    }
}
