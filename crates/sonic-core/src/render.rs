//! Multi-layer wave renderer.
//!
//! Every layer is a sine foundation modulated by the live time-domain
//! samples, sized by the current energy envelope and stroked twice: a wide
//! glowing pass and a crisp center line.

use crate::constants::*;
use crate::energy::EnergyState;
use crate::preset::{Preset, WaveLayer, BLACK};
use crate::sample::FrameSample;
use crate::state::RenderState;
use crate::surface::{Backdrop, Blend, DrawSurface, Stroke, Viewport};
use glam::Vec2;
use std::f32::consts::TAU;

pub struct WaveRenderer {
    preset: Preset,
    // reused between layers and frames
    path: Vec<Vec2>,
}

/// Visual intensity for an energy state and player volume. Not capped at 1:
/// a loud track at full volume overshoots the nominal max amplitude.
pub fn intensity(energy: &EnergyState, volume: f32) -> f32 {
    let volume_boost = VOLUME_BOOST_BASE + volume * VOLUME_BOOST_SPAN;
    (energy.energy * INTENSITY_ENERGY_WEIGHT + energy.beat * INTENSITY_BEAT_WEIGHT).min(1.0)
        * volume_boost
}

/// Build one layer's polyline into `out`. Points start at x = 0 and the last
/// one sits exactly at x = `viewport.width`.
pub fn build_wave_path(
    out: &mut Vec<Vec2>,
    viewport: Viewport,
    step: f32,
    time_domain: &[u8],
    layer: &WaveLayer,
    phase: f32,
    amplitude: f32,
) {
    out.clear();
    if viewport.is_empty() || step <= 0.0 {
        return;
    }
    let width = viewport.width;
    let center_y = viewport.height * 0.5;
    let layer_amp = amplitude * layer.amp;
    let points = (width / step).floor() as usize;

    let mut push = |x: f32| {
        let norm_x = x / width;
        let td = if time_domain.is_empty() {
            0.0
        } else {
            let idx = ((norm_x * time_domain.len() as f32) as usize).min(time_domain.len() - 1);
            (time_domain[idx] as f32 - TIME_DOMAIN_CENTER) / TIME_DOMAIN_CENTER
        };
        let sine = (norm_x * TAU * layer.freq + phase).sin();
        let y = center_y + (sine + td * WOBBLE_WEIGHT) * layer_amp;
        out.push(Vec2::new(x, y));
    };

    for p in 0..=points {
        push(p as f32 * step);
    }
    if (points as f32) * step < width {
        push(width);
    }
}

impl WaveRenderer {
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            path: Vec::new(),
        }
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Paint one frame onto `surface`.
    pub fn paint<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        sample: &FrameSample,
        energy: &EnergyState,
        state: &RenderState,
        volume: f32,
    ) {
        let viewport = state.viewport;
        if viewport.is_empty() {
            return;
        }
        match surface.backdrop() {
            Backdrop::Overlay => surface.clear(viewport),
            Backdrop::Trail => surface.fill(viewport, BLACK.with_alpha(TRAIL_ALPHA)),
        }

        let fade = state.alpha;
        let amplitude = self.preset.amplitude(intensity(energy, volume));
        let gradient = self
            .preset
            .gradient
            .map(|stop| (stop.offset, stop.color.with_alpha(GRADIENT_ALPHA * fade)));
        let glow_color = self.preset.glow_color.with_alpha(GLOW_ALPHA * fade);
        let step = self.preset.effective_step();

        for layer in self.preset.layers.iter() {
            build_wave_path(
                &mut self.path,
                viewport,
                step,
                &sample.time_domain,
                layer,
                state.phase(layer.speed),
                amplitude,
            );

            let glow = Stroke {
                gradient,
                gradient_width: viewport.width,
                width: layer.thickness,
                alpha: layer.opacity * fade,
                glow_blur: layer.blur,
                glow_color,
                blend: Blend::Lighter,
            };
            surface.stroke(&self.path, &glow);

            let crisp = Stroke {
                width: (layer.thickness * CRISP_WIDTH_SCALE).max(CRISP_WIDTH_MIN),
                alpha: layer.opacity * CRISP_OPACITY_SCALE * fade,
                glow_blur: 0.0,
                ..glow
            };
            surface.stroke(&self.path, &crisp);
        }
    }
}
