//! Drawing surface abstraction.
//!
//! The renderer works in CSS-pixel space and emits a handful of primitive
//! calls (clear, fill, stroke a polyline); a `DrawSurface` maps them onto a
//! concrete canvas. Backing-store sizing is computed here so every platform
//! agrees on the device-pixel-ratio math.

use crate::preset::Rgba;
use glam::Vec2;

/// Size of the element in CSS px and the device pixel ratio to render at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMetrics {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

/// Backing store size in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

/// Drawable area in CSS px.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl SurfaceMetrics {
    pub fn backing_size(&self) -> BackingSize {
        BackingSize {
            width: scaled_px(self.css_width, self.device_pixel_ratio),
            height: scaled_px(self.css_height, self.device_pixel_ratio),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.css_width.max(0.0) as f32,
            height: self.css_height.max(0.0) as f32,
        }
    }
}

#[inline]
fn scaled_px(css: f64, dpr: f64) -> u32 {
    let px = (css * dpr).floor();
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

/// What sits behind the waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Backdrop {
    /// Stacked over other content: clear to transparent every frame.
    Overlay,
    /// Dedicated strip: translucent black fill leaves a motion trail.
    #[default]
    Trail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    SourceOver,
    /// Additive ("lighter") compositing.
    Lighter,
}

/// Style for one polyline stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Horizontal gradient stops `(offset, color)` from x = 0 to
    /// x = `gradient_width`.
    pub gradient: [(f32, Rgba); 3],
    pub gradient_width: f32,
    pub width: f32,
    /// Global alpha for the stroke, already multiplied by the fade.
    pub alpha: f32,
    pub glow_blur: f32,
    pub glow_color: Rgba,
    pub blend: Blend,
}

pub trait DrawSurface {
    /// Current CSS box and pixel ratio, or `None` when the element cannot
    /// be measured (detached, no window).
    fn measure(&self) -> Option<SurfaceMetrics>;

    /// Resize the backing store to `size` and scale drawing so one unit is
    /// one CSS px. Any CSS box the surface writes back must be the measured
    /// `metrics` box, never `size` divided by the ratio, so the next
    /// `measure` still follows the page layout.
    fn apply_size(&mut self, size: BackingSize, metrics: &SurfaceMetrics);

    fn backdrop(&self) -> Backdrop;

    /// Whether a drawing context is present right now.
    fn is_drawable(&self) -> bool;

    /// Clear to fully transparent.
    fn clear(&mut self, viewport: Viewport);

    fn fill(&mut self, viewport: Viewport, color: Rgba);

    fn stroke(&mut self, path: &[Vec2], stroke: &Stroke);

    /// Host-visible "visualizer on" marker (a CSS class in the browser).
    fn set_active(&mut self, active: bool);
}
