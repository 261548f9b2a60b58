use crate::constants::{ANALYSER_SMOOTHING, FFT_SIZE, FFT_SIZE_MAX, FFT_SIZE_MIN};
use crate::error::VisualizerError;
use crate::sample::FrameSample;

/// Analysis node configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapSettings {
    /// Window size in samples; a power of two.
    pub fft_size: u32,
    /// Analyser temporal smoothing in [0, 1).
    pub smoothing: f64,
}

impl Default for TapSettings {
    fn default() -> Self {
        Self {
            fft_size: FFT_SIZE,
            smoothing: ANALYSER_SMOOTHING,
        }
    }
}

impl TapSettings {
    pub fn validate(&self) -> Result<(), VisualizerError> {
        let n = self.fft_size;
        if !n.is_power_of_two() || !(FFT_SIZE_MIN..=FFT_SIZE_MAX).contains(&n) {
            return Err(VisualizerError::InvalidWindowSize(n));
        }
        Ok(())
    }

    /// Entries per buffer in a `FrameSample`.
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapStatus {
    /// Source wired to the analyser; samples are live.
    Connected,
    /// Waiting on the audio context to resume before wiring.
    Pending,
}

/// A read-only hookup between one playing media source and an analyser.
///
/// Implementations own the audio-processing context. They must never wrap
/// the same source twice: once `is_attached` is true, `connect` is not
/// called again by the controller.
pub trait AnalysisTap {
    type Source: ?Sized;

    /// Create the context if needed and wire source -> analyser -> output.
    fn connect(&mut self, source: &Self::Source) -> Result<TapStatus, VisualizerError>;

    /// Connected, or a connection is in flight.
    fn is_attached(&self) -> bool;

    /// Samples can be pulled this frame.
    fn is_ready(&self) -> bool;

    /// Kick a suspended context; does not wait.
    fn resume(&mut self);

    /// Fill `frame` with the latest analyser output without blocking.
    fn sample(&mut self, frame: &mut FrameSample);

    /// Disconnect everything and close the context.
    fn release(&mut self);
}
