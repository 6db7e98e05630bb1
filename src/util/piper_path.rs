use std::ffi::OsString;
use std::path::{Path, PathBuf};

use shlex::Shlex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PiperCommand {
    Executable(PathBuf),
    PythonModule(PathBuf),
    Custom { program: String, args: Vec<String> },
}

#[derive(Debug, Error)]
pub enum PiperPathError {
    #[error("READER_PIPER_COMMAND is empty")]
    EmptyCommand,
    #[error("piper was not found in {0}, on PATH, or as a python module")]
    Unavailable(PathBuf),
}

/// Finds the Piper command: `READER_PIPER_COMMAND`, then the bundled binary
/// under `runtime_dir`, then `piper` on `PATH`, then `python -m piper`.
pub fn resolve(runtime_dir: &Path) -> Result<PiperCommand, PiperPathError> {
    if let Some(raw) = std::env::var_os("READER_PIPER_COMMAND") {
        return parse_command_line(&raw.to_string_lossy());
    }

    let candidate =
        runtime_dir
            .join("piper")
            .join(if cfg!(windows) { "piper.exe" } else { "piper" });
    if candidate.exists() {
        return Ok(PiperCommand::Executable(candidate));
    }

    if let Ok(path) = which::which("piper") {
        return Ok(PiperCommand::Executable(path));
    }

    ["python3", "python"]
        .iter()
        .find_map(|name| which::which(name).ok())
        .map(PiperCommand::PythonModule)
        .ok_or_else(|| PiperPathError::Unavailable(runtime_dir.to_path_buf()))
}

pub fn parse_command_line(raw: &str) -> Result<PiperCommand, PiperPathError> {
    let mut parts: Vec<String> = Shlex::new(raw).collect();
    if parts.is_empty() {
        return Err(PiperPathError::EmptyCommand);
    }
    let program = parts.remove(0);
    Ok(PiperCommand::Custom {
        program,
        args: parts,
    })
}

pub fn command_to_args(cmd: &PiperCommand) -> (OsString, Vec<OsString>) {
    match cmd {
        PiperCommand::Executable(path) => (path.as_os_str().into(), vec![]),
        PiperCommand::PythonModule(python) => {
            (python.as_os_str().into(), vec!["-m".into(), "piper".into()])
        }
        PiperCommand::Custom { program, args } => (
            program.into(),
            args.iter().map(OsString::from).collect(),
        ),
    }
}
