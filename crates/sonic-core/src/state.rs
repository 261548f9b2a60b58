//! Render-side state shared between the controller and the renderer.
//!
//! These types avoid referencing platform APIs. The controller mutates them
//! once per frame; the renderer only reads them.

use crate::surface::{SurfaceMetrics, Viewport};

/// Fade opacity, wave phase and the size the canvas was last fitted to.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Current opacity in [0, 1].
    pub alpha: f32,
    /// 0 or 1; `alpha` eases toward it.
    pub target_alpha: f32,
    /// Frames rendered since the visualizer was created; drives phase.
    pub frame: u64,
    pub viewport: Viewport,
    pub device_pixel_ratio: f64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            target_alpha: 0.0,
            frame: 0,
            viewport: Viewport::default(),
            device_pixel_ratio: 1.0,
        }
    }
}

impl RenderState {
    /// Ease `alpha` toward the target by `speed` (fraction of the gap).
    pub fn step_fade(&mut self, speed: f32) {
        self.alpha += (self.target_alpha - self.alpha) * speed;
        self.alpha = self.alpha.clamp(0.0, 1.0);
    }

    /// Phase accumulator for a layer advancing `speed` radians per frame.
    #[inline]
    pub fn phase(&self, speed: f32) -> f32 {
        self.frame as f32 * speed
    }

    pub fn advance(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn fit(&mut self, metrics: &SurfaceMetrics) {
        self.viewport = metrics.viewport();
        self.device_pixel_ratio = metrics.device_pixel_ratio;
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.alpha > threshold
    }
}
