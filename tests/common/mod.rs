// Host-side stand-ins for the browser tap, canvas and animation-frame clock.

#![allow(dead_code)]
mod dom_constants {
    include!("../../src/constants.rs");
}

use dom_constants::fit_css_box;
use glam::Vec2;
use sonic_core::*;
use std::collections::HashSet;

/// Scripted analyser. Sources are plain ids; wrapping an id twice fails the
/// way `createMediaElementSource` does.
#[derive(Default)]
pub struct MockTap {
    pub attached: bool,
    pub wrapped: HashSet<u32>,
    pub fail_with: Option<VisualizerError>,
    pub connect_calls: usize,
    pub nodes_created: usize,
    pub resumes: usize,
    pub samples_taken: usize,
    pub released: bool,
    pub feed_time: Vec<u8>,
    pub feed_freq: Vec<u8>,
}

impl MockTap {
    pub fn feed(&mut self, time: u8, freq: u8) {
        self.feed_time = vec![time; 1024];
        self.feed_freq = vec![freq; 1024];
    }
}

impl AnalysisTap for MockTap {
    type Source = u32;

    fn connect(&mut self, source: &u32) -> Result<TapStatus, VisualizerError> {
        self.connect_calls += 1;
        if let Some(e) = self.fail_with.clone() {
            return Err(e);
        }
        if !self.wrapped.insert(*source) {
            return Err(VisualizerError::SourceAlreadyConnected);
        }
        self.nodes_created += 1;
        self.attached = true;
        Ok(TapStatus::Connected)
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn is_ready(&self) -> bool {
        self.attached && !self.released
    }

    fn resume(&mut self) {
        self.resumes += 1;
    }

    fn sample(&mut self, frame: &mut FrameSample) {
        self.samples_taken += 1;
        for (dst, src) in frame.time_domain.iter_mut().zip(&self.feed_time) {
            *dst = *src;
        }
        for (dst, src) in frame.frequency.iter_mut().zip(&self.feed_freq) {
            *dst = *src;
        }
    }

    fn release(&mut self) {
        self.released = true;
        self.attached = false;
    }
}

#[derive(Clone, Debug)]
pub struct RecordedStroke {
    pub path: Vec<Vec2>,
    pub stroke: Stroke,
}

/// Page geometry around a canvas, measured the way the browser adapter does:
/// an inline CSS size written by `apply_size` wins over the stylesheet box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub window_width: f64,
    pub stylesheet_box: (f64, f64),
    pub inline_box: Option<(f64, f64)>,
    pub device_pixel_ratio: f64,
}

impl PageLayout {
    pub fn new(window_width: f64, stylesheet_box: (f64, f64), device_pixel_ratio: f64) -> Self {
        Self {
            window_width,
            stylesheet_box,
            inline_box: None,
            device_pixel_ratio,
        }
    }
}

/// Canvas that records what it was asked to draw. Strokes are reset at the
/// start of each frame (on clear/fill).
pub struct MockSurface {
    pub metrics: Option<SurfaceMetrics>,
    /// When set, `measure` derives metrics from the layout instead.
    pub layout: Option<PageLayout>,
    pub backdrop: Backdrop,
    pub drawable: bool,
    pub backing: Option<BackingSize>,
    pub scale: f64,
    pub active: bool,
    pub clears: usize,
    pub fills: Vec<Rgba>,
    pub strokes: Vec<RecordedStroke>,
}

impl MockSurface {
    pub fn in_page(backdrop: Backdrop, layout: PageLayout) -> Self {
        let mut surface = Self::new(0.0, 0.0, layout.device_pixel_ratio, backdrop);
        surface.metrics = None;
        surface.layout = Some(layout);
        surface
    }

    pub fn new(css_width: f64, css_height: f64, dpr: f64, backdrop: Backdrop) -> Self {
        Self {
            metrics: Some(SurfaceMetrics {
                css_width,
                css_height,
                device_pixel_ratio: dpr,
            }),
            layout: None,
            backdrop,
            drawable: true,
            backing: None,
            scale: 1.0,
            active: false,
            clears: 0,
            fills: Vec::new(),
            strokes: Vec::new(),
        }
    }
}

impl DrawSurface for MockSurface {
    fn measure(&self) -> Option<SurfaceMetrics> {
        let Some(layout) = self.layout else {
            return self.metrics;
        };
        let (rect_w, rect_h) = layout.inline_box.unwrap_or(layout.stylesheet_box);
        let strip = self.backdrop == Backdrop::Trail;
        let (css_width, css_height) = fit_css_box(strip, rect_w, rect_h, layout.window_width);
        Some(SurfaceMetrics {
            css_width,
            css_height,
            device_pixel_ratio: layout.device_pixel_ratio,
        })
    }

    fn apply_size(&mut self, size: BackingSize, metrics: &SurfaceMetrics) {
        self.backing = Some(size);
        self.scale = metrics.device_pixel_ratio;
        if let Some(layout) = self.layout.as_mut() {
            if self.backdrop == Backdrop::Trail {
                layout.inline_box = Some((metrics.css_width, metrics.css_height));
            }
        }
    }

    fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    fn is_drawable(&self) -> bool {
        self.drawable
    }

    fn clear(&mut self, _viewport: Viewport) {
        self.clears += 1;
        self.strokes.clear();
    }

    fn fill(&mut self, _viewport: Viewport, color: Rgba) {
        self.fills.push(color);
        self.strokes.clear();
    }

    fn stroke(&mut self, path: &[Vec2], stroke: &Stroke) {
        self.strokes.push(RecordedStroke {
            path: path.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Manual frame clock: nothing runs until a test fires the pending frame.
#[derive(Default)]
pub struct MockScheduler {
    pub live: Vec<(u32, FrameToken)>,
    pub next_handle: u32,
    pub total_scheduled: usize,
    pub hidden: bool,
}

impl MockScheduler {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl FrameScheduler for MockScheduler {
    type Handle = u32;

    fn schedule(&mut self, token: FrameToken) -> Option<u32> {
        self.next_handle += 1;
        self.total_scheduled += 1;
        self.live.push((self.next_handle, token));
        Some(self.next_handle)
    }

    fn cancel(&mut self, handle: u32) {
        self.live.retain(|(h, _)| *h != handle);
    }

    fn host_hidden(&self) -> bool {
        self.hidden
    }
}

pub type TestVisualizer = Visualizer<MockTap, MockSurface, MockScheduler>;

pub fn visualizer() -> TestVisualizer {
    visualizer_with(MockTap::default())
}

pub fn visualizer_with(tap: MockTap) -> TestVisualizer {
    Visualizer::new(tap, MockScheduler::default(), VisualizerConfig::default())
        .expect("default config is valid")
}

/// Connected, bound to a 400x100 trail strip, playing a loud signal.
pub fn playing_visualizer() -> TestVisualizer {
    let mut tap = MockTap::default();
    tap.feed(255, 200);
    let mut viz = visualizer_with(tap);
    viz.connect_audio(&1);
    viz.set_draw_target(MockSurface::new(400.0, 100.0, 1.0, Backdrop::Trail));
    viz.start();
    viz
}

/// Fire the pending frame the way the browser would: the callback is
/// consumed before it runs.
pub fn fire(viz: &mut TestVisualizer) -> Option<FrameOutcome> {
    let (_, token) = viz.scheduler_mut().live.pop()?;
    Some(viz.on_frame(token))
}

pub fn sample_of(bins: usize, time: u8, freq: u8) -> FrameSample {
    FrameSample {
        time_domain: vec![time; bins],
        frequency: vec![freq; bins],
    }
}
