use crate::constants::{CANVAS_CLASS, CANVAS_ID, PLAYER_BAR_SELECTOR};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// A DOM listener that is removed from its target when dropped.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

pub fn listen(
    target: &web::EventTarget,
    event: &'static str,
    mut handler: impl FnMut() + 'static,
) -> anyhow::Result<Listener> {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", event, e))?;
    Ok(Listener {
        target: target.clone(),
        event,
        closure,
    })
}

/// The page's visualizer canvas, created before the player bar (or at the
/// end of `<body>`) when the page does not have one.
pub fn find_or_create_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    if let Some(el) = document.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", CANVAS_ID, e));
    }

    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_id(CANVAS_ID);
    canvas.set_class_name(CANVAS_CLASS);

    let player_bar = document.query_selector(PLAYER_BAR_SELECTOR).ok().flatten();
    match player_bar.as_ref().and_then(|bar| bar.parent_node().map(|p| (bar, p))) {
        Some((bar, parent)) => {
            parent
                .insert_before(&canvas, Some(bar.as_ref()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        None => {
            let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
            body.append_child(&canvas)
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }
    log::info!("created #{} canvas", CANVAS_ID);
    Ok(canvas)
}
