use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

/// Starts file logging under `log_dir`. Keep the handle alive until exit,
/// dropping it shuts the file writer down.
pub fn init(log_dir: &Path) -> anyhow::Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)?;
    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename("audiobook")
                .suffix("log")
                .suppress_timestamp(),
        )
        .rotate(
            Criterion::Size(5_000_000),
            Naming::Numbers,
            Cleanup::KeepLogFiles(5),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .start()?;
    Ok(handle)
}

pub fn log_dir() -> PathBuf {
    std::env::var_os("READER_LOG_DIR")
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("logs"))
}
