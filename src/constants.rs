// DOM wiring and canvas sizing constants for the browser front-end.
// No web-sys types here; host tests `include!` this file.

// Canvas created when the page does not provide one
pub const CANVAS_ID: &str = "audio-visualizer";
pub const CANVAS_CLASS: &str = "audio-visualizer-canvas";
// Created canvas goes right before the player bar, if there is one
pub const PLAYER_BAR_SELECTOR: &str = ".player-bar";
// Toggled on the canvas while the visualizer is playing
pub const ACTIVE_CLASS: &str = "active";

// Used when the canvas has no laid-out height yet (CSS px)
pub const FALLBACK_CSS_HEIGHT: f64 = 200.0;

// Device pixel ratio clamp
pub const DPR_MIN: f64 = 1.0;
pub const DPR_MAX: f64 = 2.0;

// Media element events driving start/stop/volume
pub const EVENT_PLAY: &str = "play";
pub const EVENT_PAUSE: &str = "pause";
pub const EVENT_ENDED: &str = "ended";
pub const EVENT_ERROR: &str = "error";
pub const EVENT_VOLUME: &str = "volumechange";
pub const EVENT_RESIZE: &str = "resize";

/// Clamp a reported device pixel ratio; missing or bogus values become 1.
#[inline]
pub fn clamp_device_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() {
        dpr.clamp(DPR_MIN, DPR_MAX)
    } else {
        DPR_MIN
    }
}

/// CSS size to fit the canvas to, given its laid-out box and the window's
/// inner width. Zero width falls back to the window, zero height to
/// `FALLBACK_CSS_HEIGHT`.
#[inline]
pub fn css_box_or_fallback(rect_width: f64, rect_height: f64, window_width: f64) -> (f64, f64) {
    let width = if rect_width > 0.0 {
        rect_width
    } else {
        window_width.max(0.0)
    };
    let height = if rect_height > 0.0 {
        rect_height
    } else {
        FALLBACK_CSS_HEIGHT
    };
    (width, height)
}

/// CSS box to fit a canvas to. A background strip always spans the window's
/// inner width; any other canvas keeps its laid-out box.
#[inline]
pub fn fit_css_box(strip: bool, rect_width: f64, rect_height: f64, window_width: f64) -> (f64, f64) {
    if strip {
        css_box_or_fallback(0.0, rect_height, window_width)
    } else {
        css_box_or_fallback(rect_width, rect_height, window_width)
    }
}
