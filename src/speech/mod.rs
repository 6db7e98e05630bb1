//! Text-to-speech.
//!
//! Everything that talks goes through [`Speaker`]; the session and the
//! exporter receive one instead of reaching for a global engine.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;

use crate::audio::{AudioError, EncodeError};
use crate::util::piper_path::PiperPathError;

pub mod piper;

pub use piper::{PiperSpeaker, PiperVoice};

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("voice model not found at {0}")]
    VoiceNotFound(PathBuf),
    #[error("failed to spawn Piper process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Piper exited with status {status}: {stderr}")]
    PiperFailure { status: i32, stderr: String },
    #[error(transparent)]
    PiperUnavailable(#[from] PiperPathError),
    #[error(transparent)]
    Playback(#[from] AudioError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Speaker {
    /// Says `text` out loud and returns once it has been spoken.
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;

    /// Writes `text` as audio to `target`; the extension picks the format.
    fn render_to_file(&mut self, text: &str, target: &Path) -> Result<(), SpeechError>;
}

/// Reading speed, in the words per minute of the classic slow / normal /
/// fast presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    pub fn words_per_minute(self) -> u32 {
        match self {
            Speed::Slow => 100,
            Speed::Normal => 150,
            Speed::Fast => 200,
        }
    }

    /// Piper's `--length_scale`, where 1.0 is the model's natural pace.
    pub fn length_scale(self) -> f32 {
        Speed::Normal.words_per_minute() as f32 / self.words_per_minute() as f32
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_presets_scale_around_normal() {
        assert!((Speed::Normal.length_scale() - 1.0).abs() < f32::EPSILON);
        assert!((Speed::Slow.length_scale() - 1.5).abs() < f32::EPSILON);
        assert!((Speed::Fast.length_scale() - 0.75).abs() < f32::EPSILON);
    }
}
