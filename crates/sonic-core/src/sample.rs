use crate::constants::BYTE_MAX;

/// One frame's worth of analyser output.
///
/// Both buffers are allocated once and overwritten in place every frame;
/// a tap fills them, the estimator and renderer only read them.
#[derive(Clone, Debug)]
pub struct FrameSample {
    /// Waveform bytes, 128 = silence.
    pub time_domain: Vec<u8>,
    /// Magnitude bytes, lowest frequency first.
    pub frequency: Vec<u8>,
}

impl FrameSample {
    /// Silent sample with `bins` entries in each buffer.
    pub fn new(bins: usize) -> Self {
        Self {
            time_domain: vec![128; bins],
            frequency: vec![0; bins],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.time_domain.is_empty()
    }

    /// Mean time-domain level in [0, 1]; 0 for an empty sample.
    pub fn average_amplitude(&self) -> f32 {
        if self.time_domain.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.time_domain.iter().map(|&b| b as u64).sum();
        sum as f32 / self.time_domain.len() as f32 / BYTE_MAX
    }
}
