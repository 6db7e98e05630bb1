use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::{error, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("audio source {0} not found")]
    SourceMissing(PathBuf),
    #[error("ffmpeg is not available on PATH, export WAV or install ffmpeg")]
    FfmpegMissing,
    #[error("failed to launch ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("ffmpeg returned {0}")]
    Failed(ExitStatus),
    #[error("failed to write {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

fn locate_ffmpeg() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("READER_FFMPEG_PATH") {
        let candidate = PathBuf::from(path);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    which::which("ffmpeg").ok()
}

/// Converts synthesised WAV files into the container implied by the target
/// extension.
#[derive(Debug, Clone)]
pub struct Encoder {
    ffmpeg: Option<(OsString, Vec<OsString>)>,
}

impl Encoder {
    pub fn from_env() -> Self {
        Self {
            ffmpeg: locate_ffmpeg().map(|path| (path.into_os_string(), Vec::new())),
        }
    }

    /// Uses `program` followed by `args` in place of the ffmpeg binary.
    pub fn with_ffmpeg(program: impl Into<OsString>, args: Vec<OsString>) -> Self {
        Self {
            ffmpeg: Some((program.into(), args)),
        }
    }

    pub fn without_ffmpeg() -> Self {
        Self { ffmpeg: None }
    }

    pub fn encode(&self, source: &Path, target: &Path) -> Result<(), EncodeError> {
        if !source.exists() {
            return Err(EncodeError::SourceMissing(source.to_path_buf()));
        }

        let format = target
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if format != "mp3" {
            std::fs::copy(source, target)
                .map_err(|err| EncodeError::Io(target.to_path_buf(), err))?;
            return Ok(());
        }

        let Some((program, args)) = &self.ffmpeg else {
            error!("ffmpeg not available, cannot write {}", target.display());
            return Err(EncodeError::FfmpegMissing);
        };

        info!("Encoding {} to MP3 with ffmpeg", target.display());
        let status = Command::new(program)
            .args(args)
            .arg("-y")
            .arg("-i")
            .arg(source)
            .args(["-vn", "-ar", "22050", "-ac", "1"])
            .arg(target)
            .status()
            .map_err(EncodeError::Spawn)?;

        if status.success() {
            Ok(())
        } else {
            error!("ffmpeg exited with {status}");
            Err(EncodeError::Failed(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::env_guard::EnvGuard;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_source(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("input.wav");
        fs::write(&path, b"RIFF....WAVEdata").unwrap();
        path
    }

    fn stub_ffmpeg(temp: &TempDir, body: &str) -> Encoder {
        let script = temp.path().join("ffmpeg.sh");
        fs::write(&script, body).unwrap();
        Encoder::with_ffmpeg("sh", vec![script.into_os_string()])
    }

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

    #[test]
    fn fails_when_source_missing() {
        let temp = TempDir::new().unwrap();
        let error = Encoder::without_ffmpeg()
            .encode(&temp.path().join("nope.wav"), &temp.path().join("out.mp3"))
            .unwrap_err();
        assert!(matches!(error, EncodeError::SourceMissing(_)));
    }

    #[cfg(unix)]
    #[test]
    fn mp3_uses_ffmpeg() {
        let temp = TempDir::new().unwrap();
        let source = create_source(&temp);
        let target = temp.path().join("out.mp3");
        stub_ffmpeg(&temp, COPYING_FFMPEG)
            .encode(&source, &target)
            .unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"RIFF....WAVEdata");
    }

    #[cfg(unix)]
    #[test]
    fn ffmpeg_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let source = create_source(&temp);
        let error = stub_ffmpeg(&temp, "exit 1\n")
            .encode(&source, &temp.path().join("out.mp3"))
            .unwrap_err();
        assert!(matches!(error, EncodeError::Failed(_)));
    }

    #[test]
    fn mp3_reports_missing_ffmpeg() {
        let temp = TempDir::new().unwrap();
        let source = create_source(&temp);
        let error = Encoder::without_ffmpeg()
            .encode(&source, &temp.path().join("out.mp3"))
            .unwrap_err();
        assert!(matches!(error, EncodeError::FfmpegMissing));
    }

    #[test]
    fn wav_targets_copy_the_file() {
        let temp = TempDir::new().unwrap();
        let source = create_source(&temp);
        let target = temp.path().join("copy.wav");
        Encoder::without_ffmpeg().encode(&source, &target).unwrap();
        assert!(target.exists());
    }

    #[test]
    #[serial]
    fn env_override_points_at_ffmpeg() {
        let temp = TempDir::new().unwrap();
        let fake = temp.path().join("ffmpeg");
        fs::write(&fake, b"").unwrap();
        let _ffmpeg = EnvGuard::set("READER_FFMPEG_PATH", &fake);
        assert_eq!(locate_ffmpeg(), Some(fake));
    }
}
