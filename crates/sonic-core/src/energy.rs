//! Energy estimation from analyser snapshots.
//!
//! Each frame the estimator measures instantaneous loudness (time-domain RMS)
//! and low-end energy (average of the lowest frequency bins), then folds them
//! into persistent envelopes so the visuals pump with the music instead of
//! flickering with it.

use crate::constants::*;
use crate::sample::FrameSample;

/// Smoothed scalar signals derived from successive frames. All in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnergyState {
    pub rms: f32,
    pub bass: f32,
    pub energy: f32,
    pub beat: f32,
}

impl EnergyState {
    /// Fold one frame into the envelopes. An empty sample changes nothing.
    pub fn update(&mut self, sample: &FrameSample) {
        if sample.is_empty() {
            return;
        }

        let instant_rms = time_domain_rms(&sample.time_domain);
        self.rms += (instant_rms - self.rms) * RMS_SMOOTHING;

        self.bass = low_band_level(&sample.frequency);

        let raw = ((self.rms * ENERGY_RMS_WEIGHT + self.bass * ENERGY_BASS_WEIGHT) / 2.0).min(1.0);
        let rate = if raw > self.energy {
            ENERGY_ATTACK
        } else {
            ENERGY_RELEASE
        };
        self.energy += (raw - self.energy) * rate;

        let beat_target = (self.energy - BEAT_FLOOR).max(0.0);
        self.beat += (beat_target - self.beat) * BEAT_SMOOTHING;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Root-mean-square of byte samples mapped to [-1, 1].
pub fn time_domain_rms(bytes: &[u8]) -> f32 {
    if bytes.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = bytes
        .iter()
        .map(|&b| {
            let v = (b as f32 - TIME_DOMAIN_CENTER) / TIME_DOMAIN_CENTER;
            v * v
        })
        .sum();
    (sum_sq / bytes.len() as f32).sqrt().min(1.0)
}

/// Number of bins treated as "bass" for a spectrum of `bins` entries.
pub fn bass_bin_count(bins: usize) -> usize {
    let fraction = (bins as f32 * BASS_BIN_FRACTION) as usize;
    fraction.max(BASS_MIN_BINS).min(bins)
}

/// Average magnitude of the low bins, normalized to [0, 1].
pub fn low_band_level(frequency: &[u8]) -> f32 {
    let take = bass_bin_count(frequency.len());
    if take == 0 {
        return 0.0;
    }
    let sum: u32 = frequency[..take].iter().map(|&b| b as u32).sum();
    sum as f32 / take as f32 / BYTE_MAX
}
