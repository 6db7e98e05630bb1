use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("unable to open audio file: {0}")]
    Io(String),
    #[error("audio file is corrupt: {0}")]
    Decode(String),
    #[error("no audio output device found")]
    Device,
}

/// Blocking WAV playback on the default output device.
///
/// The device stream is opened on first use and kept for the lifetime of
/// the player.
#[derive(Default)]
pub struct Player {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays `path` and returns once the last sample has been played.
    pub fn play_until_end(&mut self, path: &Path) -> Result<(), AudioError> {
        let file = File::open(path).map_err(|err| AudioError::Io(err.to_string()))?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|err| AudioError::Decode(err.to_string()))?;

        let handle = self.handle()?;
        let sink = Sink::try_new(handle).map_err(|err| AudioError::Io(err.to_string()))?;
        sink.append(decoder);
        debug!("Playing {}", path.display());
        sink.sleep_until_end();
        Ok(())
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle, AudioError> {
        if self.output.is_none() {
            let output = OutputStream::try_default().map_err(|_| AudioError::Device)?;
            self.output = Some(output);
        }
        self.output
            .as_ref()
            .map(|(_, handle)| handle)
            .ok_or(AudioError::Device)
    }
}
