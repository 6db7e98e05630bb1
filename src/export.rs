//! Batch export: one audio file per page.

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use log::info;
use thiserror::Error;

use crate::book::PagedBook;
use crate::speech::{Speaker, SpeechError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unable to create output directory {0}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error("failed to render page {page}: {source}")]
    Render {
        page: usize,
        #[source]
        source: SpeechError,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

/// The name used for the export directory and file prefix: the file name up
/// to its first dot.
pub fn book_basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "book".to_string())
}

pub fn page_file_name(basename: &str, page: usize, format: AudioFormat) -> String {
    format!("{basename}_{page}.{}", format.extension())
}

/// Renders every page of `book` into `{out_root}/{basename}/`, in page order,
/// and returns the written files.
pub fn export_book(
    book: &PagedBook,
    basename: &str,
    out_root: &Path,
    format: AudioFormat,
    speaker: &mut impl Speaker,
) -> Result<Vec<PathBuf>, ExportError> {
    let out_dir = out_root.join(basename);
    fs::create_dir_all(&out_dir).map_err(|err| ExportError::CreateDir(out_dir.clone(), err))?;
    info!("Saving audio files in folder: {}", out_dir.display());

    let mut written = Vec::with_capacity(book.page_count());
    for (page, text) in book.pages() {
        let target = out_dir.join(page_file_name(basename, page, format));
        speaker
            .render_to_file(text, &target)
            .map_err(|source| ExportError::Render { page, source })?;
        written.push(target);
    }
    info!("Exported {} pages to {}", written.len(), out_dir.display());
    Ok(written)
}
