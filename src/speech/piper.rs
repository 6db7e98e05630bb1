use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::Instant,
};

use log::{debug, error, info, warn};

use crate::audio::{Encoder, Player};
use crate::util::piper_path::{command_to_args, PiperCommand};

use super::{Speaker, SpeechError};

/// Model and synthesis parameters passed to every Piper run.
#[derive(Debug, Clone, PartialEq)]
pub struct PiperVoice {
    pub model_path: PathBuf,
    pub speaker: Option<String>,
    pub length_scale: Option<f32>,
}

pub struct PiperSpeaker {
    command: PiperCommand,
    voice: PiperVoice,
    player: Player,
    encoder: Encoder,
}

impl PiperSpeaker {
    pub fn new(command: PiperCommand, voice: PiperVoice, encoder: Encoder) -> Self {
        Self {
            command,
            voice,
            player: Player::new(),
            encoder,
        }
    }

    fn build_command(&self, output_path: &Path) -> Result<Command, SpeechError> {
        if !self.voice.model_path.exists() {
            return Err(SpeechError::VoiceNotFound(self.voice.model_path.clone()));
        }

        if let Some(parent) = output_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        let (program, args) = command_to_args(&self.command);
        let mut command = Command::new(program);
        command.args(args);
        command.arg("--model");
        command.arg(&self.voice.model_path);
        command.arg("--output_file");
        command.arg(output_path);
        if let Some(speaker) = &self.voice.speaker {
            command.arg("--speaker");
            command.arg(speaker);
        }
        if let Some(scale) = self.voice.length_scale {
            command.arg("--length_scale");
            command.arg(scale.to_string());
        }
        Ok(command)
    }

    /// Runs Piper once, writing a WAV file to `output_path`.
    pub fn synthesize(&self, text: &str, output_path: &Path) -> Result<(), SpeechError> {
        let start = Instant::now();
        let mut child = self
            .build_command(output_path)?
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(SpeechError::Spawn)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            let status = output.status.code().unwrap_or_default();
            error!("Piper command exited with status {status}: {stderr}");
            return Err(SpeechError::PiperFailure { status, stderr });
        }

        if !output_path.exists() {
            warn!(
                "Piper succeeded but the expected output {} was not created",
                output_path.display()
            );
        }
        debug!(
            "Piper synthesised {} chars in {} ms",
            text.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(())
    }

    fn temporary_wav() -> Result<tempfile::TempPath, SpeechError> {
        Ok(tempfile::Builder::new()
            .prefix("audiobook-")
            .suffix(".wav")
            .tempfile()?
            .into_temp_path())
    }
}

impl Speaker for PiperSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            debug!("Nothing to say, skipping synthesis");
            return Ok(());
        }
        let wav = Self::temporary_wav()?;
        self.synthesize(text, &wav)?;
        self.player.play_until_end(&wav)?;
        Ok(())
    }

    fn render_to_file(&mut self, text: &str, target: &Path) -> Result<(), SpeechError> {
        info!("Rendering speech to {}", target.display());
        let is_wav = target
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if is_wav {
            return self.synthesize(text, target);
        }

        let wav = Self::temporary_wav()?;
        self.synthesize(text, &wav)?;
        self.encoder.encode(&wav, target)?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MOCK_PIPER: &str = r#"OUT=""
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--output_file" ]; then
    shift
    OUT="$1"
  fi
  shift
done
printf 'WAV:' > "$OUT"
cat >> "$OUT"
"#;

    const COPYING_FFMPEG: &str = r#"IN=""; OUT=""
while [ "$1" != "" ]; do
  if [ "$1" = "-i" ]; then
    shift
    IN="$1"
  fi
  OUT="$1"
  shift
done
cat "$IN" > "$OUT"
"#;

    fn script(temp: &TempDir, name: &str, body: &str) -> String {
        let path = temp.path().join(name);
        fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn speaker(temp: &TempDir, piper_body: &str, model_exists: bool) -> PiperSpeaker {
        let model_path = temp.path().join("voice.onnx");
        if model_exists {
            fs::write(&model_path, b"voice").unwrap();
        }
        let piper = script(temp, "mock_piper.sh", piper_body);
        let ffmpeg = script(temp, "mock_ffmpeg.sh", COPYING_FFMPEG);
        PiperSpeaker::new(
            PiperCommand::Custom {
                program: "sh".into(),
                args: vec![piper],
            },
            PiperVoice {
                model_path,
                speaker: None,
                length_scale: Some(1.5),
            },
            Encoder::with_ffmpeg("sh", vec![ffmpeg.into()]),
        )
    }

    #[test]
    fn synthesize_writes_audio() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out").join("page.wav");
        speaker(&temp, MOCK_PIPER, true)
            .synthesize("hello", &output)
            .unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "WAV:hello");
    }

    #[test]
    fn missing_voice_returns_error() {
        let temp = TempDir::new().unwrap();
        let error = speaker(&temp, MOCK_PIPER, false)
            .synthesize("hello", &temp.path().join("page.wav"))
            .unwrap_err();
        assert!(matches!(error, SpeechError::VoiceNotFound(_)));
    }

    #[test]
    fn process_failure_returns_error() {
        let temp = TempDir::new().unwrap();
        let error = speaker(&temp, "cat > /dev/null\necho boom >&2\nexit 2\n", true)
            .synthesize("hello", &temp.path().join("page.wav"))
            .unwrap_err();
        match error {
            SpeechError::PiperFailure { status, stderr } => {
                assert_eq!(status, 2);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn render_to_mp3_goes_through_the_encoder() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("libro_0.mp3");
        speaker(&temp, MOCK_PIPER, true)
            .render_to_file("page one", &target)
            .unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "WAV:page one");
    }

    #[test]
    fn render_to_wav_skips_the_encoder() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("libro_0.wav");
        speaker(&temp, MOCK_PIPER, true)
            .render_to_file("one", &target)
            .unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "WAV:one");
    }

    #[test]
    fn blank_text_is_not_spoken() {
        let temp = TempDir::new().unwrap();
        speaker(&temp, "exit 9\n", false).speak("  \n").unwrap();
    }
}
