//! Static wave layer configuration ("presets") and colors.

use crate::constants::*;
use smallvec::{smallvec, SmallVec};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            rgb: self,
            a: a.clamp(0.0, 1.0),
        }
    }
}

/// Color with straight alpha; `Display` renders a CSS `rgba()` string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {:.3})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.a
        )
    }
}

pub const HOT_PINK: Rgb = Rgb::new(255, 0, 102);
pub const MAGENTA_PINK: Rgb = Rgb::new(245, 0, 143);
pub const PURPLE: Rgb = Rgb::new(142, 45, 226);
pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// One stroked wave in the stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveLayer {
    /// Multiplier on the shared amplitude.
    pub amp: f32,
    /// Stroke width, CSS px.
    pub thickness: f32,
    /// Phase advance per frame, radians.
    pub speed: f32,
    /// Sine cycles across the full width.
    pub freq: f32,
    /// Glow (shadow blur) radius, CSS px.
    pub blur: f32,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub layers: SmallVec<[WaveLayer; 4]>,
    /// Horizontal spacing between path points, CSS px.
    pub point_step: f32,
    pub base_amplitude: f32,
    pub max_amplitude: f32,
    pub gradient: [GradientStop; 3],
    pub glow_color: Rgb,
}

impl Preset {
    /// Three stacked neon sines in a pink-to-purple gradient.
    pub fn sonic() -> Self {
        Self {
            layers: smallvec![
                WaveLayer {
                    amp: 1.0,
                    thickness: 2.2,
                    speed: 0.018,
                    freq: 1.2,
                    blur: 26.0,
                    opacity: 0.85,
                },
                WaveLayer {
                    amp: 0.72,
                    thickness: 1.8,
                    speed: 0.024,
                    freq: 1.75,
                    blur: 18.0,
                    opacity: 0.65,
                },
                WaveLayer {
                    amp: 0.5,
                    thickness: 1.4,
                    speed: 0.031,
                    freq: 2.4,
                    blur: 12.0,
                    opacity: 0.45,
                },
            ],
            point_step: POINT_STEP,
            base_amplitude: BASE_AMPLITUDE,
            max_amplitude: MAX_AMPLITUDE,
            gradient: [
                GradientStop {
                    offset: 0.0,
                    color: HOT_PINK,
                },
                GradientStop {
                    offset: 0.5,
                    color: MAGENTA_PINK,
                },
                GradientStop {
                    offset: 1.0,
                    color: PURPLE,
                },
            ],
            glow_color: HOT_PINK,
        }
    }

    /// Point spacing actually used, never finer than `POINT_STEP_MIN`.
    pub fn effective_step(&self) -> f32 {
        self.point_step.floor().max(POINT_STEP_MIN)
    }

    /// Amplitude in CSS px for an intensity (may exceed 1 with volume boost).
    pub fn amplitude(&self, intensity: f32) -> f32 {
        self.base_amplitude + (self.max_amplitude - self.base_amplitude) * intensity
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::sonic()
    }
}
