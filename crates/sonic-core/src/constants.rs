//! Tuning constants for analysis, smoothing and fades.
//!
//! These express intended behavior (smoothing rates, thresholds, visual
//! weights) and keep magic numbers out of the estimator and renderer.

// Analysis window (samples) and analyser smoothing
pub const FFT_SIZE: u32 = 2048;
pub const ANALYSER_SMOOTHING: f64 = 0.85;
pub const FFT_SIZE_MIN: u32 = 32;
pub const FFT_SIZE_MAX: u32 = 32768;

// Time-domain bytes are centered on this value
pub const TIME_DOMAIN_CENTER: f32 = 128.0;
pub const BYTE_MAX: f32 = 255.0;

// Loudness smoothing: one fixed rate, no attack/release split
pub const RMS_SMOOTHING: f32 = 0.18;

// Low end = lowest 8% of bins, never fewer than 8
pub const BASS_BIN_FRACTION: f32 = 0.08;
pub const BASS_MIN_BINS: usize = 8;

// Composite energy weights: min(1, (rms*W_RMS + bass*W_BASS) / 2)
pub const ENERGY_RMS_WEIGHT: f32 = 1.4;
pub const ENERGY_BASS_WEIGHT: f32 = 1.2;

// Energy envelope
pub const ENERGY_ATTACK: f32 = 0.22;
pub const ENERGY_RELEASE: f32 = 0.08;

// Beat transient: energy above the floor, through its own filter
pub const BEAT_FLOOR: f32 = 0.25;
pub const BEAT_SMOOTHING: f32 = 0.35;

// Fade per frame and the alpha under which the canvas counts as invisible
pub const FADE_SPEED: f32 = 0.08;
pub const VISIBILITY_THRESHOLD: f32 = 0.01;

// Intensity mapping
pub const VOLUME_BOOST_BASE: f32 = 0.35;
pub const VOLUME_BOOST_SPAN: f32 = 1.15;
pub const INTENSITY_ENERGY_WEIGHT: f32 = 1.1;
pub const INTENSITY_BEAT_WEIGHT: f32 = 0.9;
pub const DEFAULT_VOLUME: f32 = 0.5;

// Wave geometry (CSS px)
pub const POINT_STEP: f32 = 6.0;
pub const POINT_STEP_MIN: f32 = 3.0;
pub const BASE_AMPLITUDE: f32 = 24.0;
pub const MAX_AMPLITUDE: f32 = 92.0;
pub const WOBBLE_WEIGHT: f32 = 0.75;

// Stroke styling
pub const GRADIENT_ALPHA: f32 = 0.95;
pub const GLOW_ALPHA: f32 = 0.35;
pub const CRISP_OPACITY_SCALE: f32 = 0.55;
pub const CRISP_WIDTH_SCALE: f32 = 0.75;
pub const CRISP_WIDTH_MIN: f32 = 1.0;

// Trail backdrop alpha (black)
pub const TRAIL_ALPHA: f32 = 0.12;
