use crate::constants::{DEFAULT_VOLUME, FADE_SPEED, VISIBILITY_THRESHOLD};
use crate::error::VisualizerError;
use crate::preset::Preset;
use crate::tap::TapSettings;

#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerConfig {
    pub tap: TapSettings,
    /// Fraction of the remaining gap closed by the fade each frame.
    pub fade_speed: f32,
    /// Alpha at or below which a fading canvas counts as invisible.
    pub visibility_threshold: f32,
    pub initial_volume: f32,
    pub preset: Preset,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            tap: TapSettings::default(),
            fade_speed: FADE_SPEED,
            visibility_threshold: VISIBILITY_THRESHOLD,
            initial_volume: DEFAULT_VOLUME,
            preset: Preset::sonic(),
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> Result<(), VisualizerError> {
        self.tap.validate()
    }
}
