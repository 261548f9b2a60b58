use crate::constants::{
    EVENT_ENDED, EVENT_ERROR, EVENT_PAUSE, EVENT_PLAY, EVENT_RESIZE, EVENT_VOLUME,
};
use crate::dom::{listen, Listener};
use crate::WebVisualizer;
use sonic_core::FrameToken;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys as web;

// Run `f` against the visualizer if it is still alive and not mid-call.
fn with_visualizer(
    shared: &Rc<RefCell<WebVisualizer>>,
    mut f: impl FnMut(&mut WebVisualizer) + 'static,
) -> impl FnMut() + 'static {
    let weak = Rc::downgrade(shared);
    move || {
        let Some(viz) = weak.upgrade() else {
            return;
        };
        match viz.try_borrow_mut() {
            Ok(mut viz) => f(&mut viz),
            Err(_) => log::warn!("visualizer busy; event dropped"),
        };
    }
}

/// Deliver an animation frame to the visualizer behind `target`.
pub fn dispatch_frame(target: &Weak<RefCell<WebVisualizer>>, token: FrameToken) {
    let Some(viz) = target.upgrade() else {
        return;
    };
    match viz.try_borrow_mut() {
        Ok(mut viz) => {
            viz.on_frame(token);
        }
        Err(_) => log::error!("frame {} arrived while visualizer borrowed", token.id()),
    };
}

/// play -> start, pause/ended/error -> stop, volumechange -> set_volume.
pub fn wire_player(
    shared: &Rc<RefCell<WebVisualizer>>,
    media: &web::HtmlMediaElement,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(5);
    listeners.push(listen(media, EVENT_PLAY, with_visualizer(shared, |v| v.start()))?);
    for event in [EVENT_PAUSE, EVENT_ENDED, EVENT_ERROR] {
        listeners.push(listen(media, event, with_visualizer(shared, |v| v.stop()))?);
    }
    let volume_src = media.clone();
    listeners.push(listen(
        media,
        EVENT_VOLUME,
        with_visualizer(shared, move |v| v.set_volume(volume_src.volume() as f32)),
    )?);
    Ok(listeners)
}

/// Re-fit the canvas backing store whenever the window resizes.
pub fn wire_resize(shared: &Rc<RefCell<WebVisualizer>>) -> anyhow::Result<Listener> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    listen(&window, EVENT_RESIZE, with_visualizer(shared, |v| v.refresh_size()))
}
