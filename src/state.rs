use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use crate::{
    audio::Encoder,
    speech::{PiperSpeaker, PiperVoice, Speed},
    util::piper_path,
    voices::VoiceLibrary,
};

/// Voice options shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct VoiceOptions {
    /// Reading speed
    #[arg(long, global = true, value_enum, default_value_t = Speed::Normal)]
    pub speed: Speed,
    /// Voice id from the voices directory (see `audiobook voices`)
    #[arg(long, global = true, env = "READER_VOICE")]
    pub voice: Option<String>,
    /// Path to a Piper .onnx model, overrides --voice
    #[arg(long, global = true, env = "READER_VOICE_MODEL")]
    pub model: Option<PathBuf>,
    /// Speaker id for multi-speaker models
    #[arg(long, global = true)]
    pub speaker: Option<String>,
}

pub struct AppState {
    pub voices: VoiceLibrary,
    runtime_dir: PathBuf,
    options: VoiceOptions,
}

impl AppState {
    pub fn initialise(options: VoiceOptions) -> Self {
        let runtime_dir = env_path("READER_RUNTIME_DIR", "runtime");
        let voices = VoiceLibrary::new(env_path("READER_VOICES_DIR", "assets/voices"));
        Self {
            voices,
            runtime_dir,
            options,
        }
    }

    /// Builds the Piper speaker for the configured voice.
    pub fn speaker(&self) -> Result<PiperSpeaker> {
        let command =
            piper_path::resolve(&self.runtime_dir).context("unable to locate Piper")?;

        let model_path = match &self.options.model {
            Some(path) => path.clone(),
            None => {
                self.voices
                    .select(self.options.voice.as_deref())
                    .with_context(|| {
                        format!(
                            "failed to choose a voice from {}",
                            self.voices.base_dir().display()
                        )
                    })?
                    .model_path
            }
        };
        info!(
            "Using voice model {} at {:?} speed",
            model_path.display(),
            self.options.speed
        );

        Ok(PiperSpeaker::new(
            command,
            PiperVoice {
                model_path,
                speaker: self.options.speaker.clone(),
                length_scale: Some(self.options.speed.length_scale()),
            },
            Encoder::from_env(),
        ))
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var_os(key)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(default))
}
