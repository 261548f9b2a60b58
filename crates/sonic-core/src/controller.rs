//! Lifecycle/transport controller.
//!
//! Owns the tap, the energy and render state and (a handle to) the drawing
//! surface, and drives them from the display-frame scheduler. States:
//!
//! ```text
//! Idle --connect--> ConnectedSilent --start--> Playing --stop--> FadingOut
//!   \___________________start________________/^    ^              |
//!                                              |    +----start-----+
//!                       fade complete: back to ConnectedSilent / Idle
//! any --destroy--> Destroyed (terminal)
//! ```
//!
//! Exactly one frame callback is in flight while Playing or FadingOut and
//! none otherwise.

use crate::config::VisualizerConfig;
use crate::energy::EnergyState;
use crate::error::VisualizerError;
use crate::render::WaveRenderer;
use crate::sample::FrameSample;
use crate::scheduler::{FrameScheduler, FrameToken};
use crate::state::RenderState;
use crate::surface::DrawSurface;
use crate::tap::AnalysisTap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ConnectedSilent,
    Playing,
    FadingOut,
    Destroyed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::ConnectedSilent => "connected-silent",
            Phase::Playing => "playing",
            Phase::FadingOut => "fading-out",
            Phase::Destroyed => "destroyed",
        }
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Phase::Playing | Phase::FadingOut)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a frame callback ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Token did not match the pending frame; nothing done.
    Stale,
    /// Rescheduled without sampling or drawing (hidden page, nothing bound).
    Skipped,
    Rendered,
    /// Fade-out completed; loop cancelled and canvas cleared.
    Finished,
}

pub struct Visualizer<T, S, F>
where
    T: AnalysisTap,
    S: DrawSurface,
    F: FrameScheduler,
{
    tap: T,
    surface: Option<S>,
    scheduler: F,
    renderer: WaveRenderer,
    sample: FrameSample,
    energy: EnergyState,
    render: RenderState,
    phase: Phase,
    // no audio capability: every call is a no-op from here on
    inert: bool,
    volume: f32,
    fade_speed: f32,
    visibility_threshold: f32,
    pending: Option<(FrameToken, F::Handle)>,
    next_token: FrameToken,
}

#[inline]
fn clamp_volume(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl<T, S, F> Visualizer<T, S, F>
where
    T: AnalysisTap,
    S: DrawSurface,
    F: FrameScheduler,
{
    pub fn new(tap: T, scheduler: F, config: VisualizerConfig) -> Result<Self, VisualizerError> {
        config.validate()?;
        Ok(Self {
            tap,
            surface: None,
            scheduler,
            sample: FrameSample::new(config.tap.bin_count()),
            renderer: WaveRenderer::new(config.preset),
            energy: EnergyState::default(),
            render: RenderState::default(),
            phase: Phase::Idle,
            inert: false,
            volume: clamp_volume(config.initial_volume),
            fade_speed: config.fade_speed,
            visibility_threshold: config.visibility_threshold,
            pending: None,
            next_token: FrameToken::first(),
        })
    }

    fn accepting(&self, op: &str) -> bool {
        if self.phase == Phase::Destroyed {
            log::warn!("visualizer: {} after destroy ignored", op);
            return false;
        }
        !self.inert
    }

    /// Attach the tap to `source`. A no-op while a tap is already attached.
    pub fn connect_audio(&mut self, source: &T::Source) {
        if !self.accepting("connect_audio") {
            return;
        }
        if self.tap.is_attached() {
            log::debug!("visualizer: tap already attached, connect ignored");
            return;
        }
        match self.tap.connect(source) {
            Ok(status) => {
                log::info!("visualizer: audio tap {:?}", status);
                if self.phase == Phase::Idle {
                    self.phase = Phase::ConnectedSilent;
                }
            }
            Err(VisualizerError::SourceAlreadyConnected) => {
                log::warn!("visualizer: media source already wrapped elsewhere; staying disconnected");
            }
            Err(e @ VisualizerError::Unsupported(_)) => {
                log::error!("visualizer disabled: {}", e);
                self.inert = true;
            }
            Err(e) => log::error!("visualizer: connect failed: {}", e),
        }
    }

    /// Point the visualizer at a different surface. Energy, fade and phase
    /// carry over; the old surface is cleared, deactivated and returned.
    pub fn set_draw_target(&mut self, surface: S) -> Option<S> {
        if self.phase == Phase::Destroyed {
            log::warn!("visualizer: set_draw_target after destroy ignored");
            return Some(surface);
        }
        let mut previous = self.surface.replace(surface);
        if let Some(old) = previous.as_mut() {
            old.clear(self.render.viewport);
            old.set_active(false);
        }
        self.refresh_size();
        let playing = self.phase == Phase::Playing;
        if let Some(current) = self.surface.as_mut() {
            current.set_active(playing);
        }
        log::info!(
            "visualizer: draw target set ({}x{} css px)",
            self.render.viewport.width,
            self.render.viewport.height
        );
        previous
    }

    /// Unbind the current surface, clearing it first.
    pub fn take_draw_target(&mut self) -> Option<S> {
        let mut surface = self.surface.take()?;
        surface.clear(self.render.viewport);
        surface.set_active(false);
        Some(surface)
    }

    /// Re-fit the backing store to the surface's CSS box.
    pub fn refresh_size(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        match surface.measure() {
            Some(metrics) => {
                surface.apply_size(metrics.backing_size(), &metrics);
                self.render.fit(&metrics);
            }
            None => log::debug!("visualizer: draw target not measurable, size kept"),
        }
    }

    pub fn start(&mut self) {
        if !self.accepting("start") || self.phase == Phase::Playing {
            return;
        }
        self.phase = Phase::Playing;
        self.render.target_alpha = 1.0;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_active(true);
        }
        self.tap.resume();
        if self.pending.is_none() {
            self.schedule_next();
        }
        log::debug!("visualizer: start");
    }

    /// Begin fading out. The loop keeps running until the canvas is
    /// invisible, then cancels itself.
    pub fn stop(&mut self) {
        if !self.accepting("stop") || self.phase != Phase::Playing {
            return;
        }
        self.phase = Phase::FadingOut;
        self.render.target_alpha = 0.0;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_active(false);
        }
        if self.pending.is_none() {
            self.schedule_next();
        }
        log::debug!("visualizer: stop, fading out");
    }

    /// Scales drawing amplitude only; never touches audio gain.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
    }

    pub fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.cancel_pending();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear(self.render.viewport);
            surface.set_active(false);
        }
        self.tap.release();
        self.energy.reset();
        self.render.alpha = 0.0;
        self.render.target_alpha = 0.0;
        self.phase = Phase::Destroyed;
        log::info!("visualizer: destroyed");
    }

    /// Frame callback entry point.
    pub fn on_frame(&mut self, token: FrameToken) -> FrameOutcome {
        match &self.pending {
            Some((pending, _)) if *pending == token => {}
            _ => return FrameOutcome::Stale,
        }
        // this callback has fired; its handle is spent
        self.pending = None;

        let fading = match self.phase {
            Phase::Playing => false,
            Phase::FadingOut if self.render.is_visible(self.visibility_threshold) => true,
            Phase::FadingOut => {
                self.finish_fade();
                return FrameOutcome::Finished;
            }
            _ => return FrameOutcome::Stale,
        };

        self.schedule_next();
        if self.scheduler.host_hidden() {
            return FrameOutcome::Skipped;
        }

        let drawable =
            self.tap.is_ready() && self.surface.as_ref().is_some_and(|s| s.is_drawable());
        if !drawable {
            if fading {
                self.finish_fade();
                return FrameOutcome::Finished;
            }
            return FrameOutcome::Skipped;
        }
        let Some(surface) = self.surface.as_mut() else {
            return FrameOutcome::Skipped;
        };

        self.tap.sample(&mut self.sample);
        self.energy.update(&self.sample);
        self.render.step_fade(self.fade_speed);
        self.renderer
            .paint(surface, &self.sample, &self.energy, &self.render, self.volume);
        self.render.advance();
        FrameOutcome::Rendered
    }

    fn finish_fade(&mut self) {
        self.cancel_pending();
        self.render.alpha = 0.0;
        if let Some(surface) = self.surface.as_mut() {
            surface.clear(self.render.viewport);
        }
        self.energy.reset();
        self.phase = if self.tap.is_attached() {
            Phase::ConnectedSilent
        } else {
            Phase::Idle
        };
        log::debug!("visualizer: fade complete, loop idle");
    }

    fn schedule_next(&mut self) {
        self.cancel_pending();
        let token = self.next_token;
        self.next_token = token.next();
        match self.scheduler.schedule(token) {
            Some(handle) => self.pending = Some((token, handle)),
            None => log::warn!("visualizer: frame request refused by host"),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some((_, handle)) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn energy(&self) -> &EnergyState {
        &self.energy
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Mean time-domain level of the last sampled frame, in [0, 1].
    pub fn average_amplitude(&self) -> f32 {
        self.sample.average_amplitude()
    }

    pub fn tap(&self) -> &T {
        &self.tap
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}
