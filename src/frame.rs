use crate::dom;
use sonic_core::{FrameScheduler, FrameToken};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame`-backed scheduler.
///
/// Every request gets its own one-shot callback carrying the frame token,
/// so there is no shared "keep running" flag for a late callback to miss.
pub struct RafScheduler {
    on_frame: Rc<dyn Fn(FrameToken)>,
}

impl RafScheduler {
    pub fn new(on_frame: impl Fn(FrameToken) + 'static) -> Self {
        Self {
            on_frame: Rc::new(on_frame),
        }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn schedule(&mut self, token: FrameToken) -> Option<i32> {
        let window = web::window()?;
        let on_frame = self.on_frame.clone();
        // freed by wasm-bindgen once it has run; a cancelled one is leaked
        let callback = Closure::once_into_js(move |_timestamp: f64| on_frame(token));
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(window) = web::window() {
            _ = window.cancel_animation_frame(handle);
        }
    }

    fn host_hidden(&self) -> bool {
        dom::window_document()
            .map(|d| d.hidden())
            .unwrap_or(false)
    }
}
