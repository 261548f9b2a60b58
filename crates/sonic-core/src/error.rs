use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisualizerError {
    /// The host has no usable audio-processing capability.
    #[error("audio analysis unsupported: {0}")]
    Unsupported(String),
    /// The media element is already wrapped by an analysis source.
    #[error("media source already connected to an analysis node")]
    SourceAlreadyConnected,
    #[error("analysis window size {0} is not a power of two in [32, 32768]")]
    InvalidWindowSize(u32),
    #[error("platform error: {0}")]
    Platform(String),
}
