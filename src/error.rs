use std::path::PathBuf;

use crate::shared::TrackId;

#[derive(Debug, thiserror::Error)]
pub enum SoundboardError {
    #[error("sounds directory {path:?} could not be read: {source}")]
    SoundsDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("color map error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported wav format: {0}")]
    UnsupportedWav(String),

    // length of the track, requested index
    #[error("block {index} is out of range on {track} (length {len})")]
    BlockOutOfRange {
        track: TrackId,
        index: usize,
        len: usize,
    },

    #[error("no default output device")]
    NoOutputDevice,

    #[error("audio stream error: {0}")]
    AudioStream(String),

    #[error("unsupported sample format {0} (only f32 output is supported)")]
    UnsupportedSampleFormat(String),
}

pub type Result<T> = std::result::Result<T, SoundboardError>;
