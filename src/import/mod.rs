//! Document importers.
//!
//! Both importers produce a [`PagedBook`]: plain text is cut into fixed-size
//! pages, PDFs keep their physical pages. PDF text comes from an external
//! extractor process, see [`pdf::ScriptPdfExtractor`].

use std::path::{Path, PathBuf};

use log::{error, info};
use thiserror::Error;

use crate::book::PagedBook;

pub mod pdf;
pub mod text;

pub use pdf::{PdfExtractor, ScriptPdfExtractor};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported document format {0}, expected a .txt or .pdf file")]
    UnsupportedFormat(PathBuf),
    #[error("unable to decrypt {0} with the supplied password")]
    DecryptionFailed(PathBuf),
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to launch the PDF extractor: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("PDF extractor failed ({code}): {message}")]
    Extractor { code: String, message: String },
    #[error("PDF extractor returned invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("txt") => Ok(DocumentKind::Text),
            Some("pdf") => Ok(DocumentKind::Pdf),
            _ => Err(ImportError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A document that exists on disk and has a supported extension.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    kind: DocumentKind,
    password: Option<String>,
}

impl Document {
    /// Checks that `path` exists, then that its format is supported.
    pub fn open(path: &Path, password: Option<&str>) -> Result<Self, ImportError> {
        if !path.exists() {
            error!("Input file {} does not exist", path.display());
            return Err(ImportError::NotFound(path.to_path_buf()));
        }
        let kind = DocumentKind::from_path(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            kind,
            password: password.map(str::to_owned),
        })
    }

    /// Paginates the document. PDFs go through the extractor configured by
    /// `READER_PDF_COMMAND`; text files never look at it.
    pub fn paginate(&self) -> Result<(PagedBook, usize), ImportError> {
        match self.kind {
            DocumentKind::Text => self.finish(text::paginate_file(&self.path)?),
            DocumentKind::Pdf => self.paginate_with(&ScriptPdfExtractor::from_env()?),
        }
    }

    pub fn paginate_with(
        &self,
        extractor: &dyn PdfExtractor,
    ) -> Result<(PagedBook, usize), ImportError> {
        let book = match self.kind {
            DocumentKind::Text => text::paginate_file(&self.path)?,
            DocumentKind::Pdf => {
                pdf::paginate_pdf(&self.path, self.password.as_deref(), extractor)?
            }
        };
        self.finish(book)
    }

    fn finish(&self, book: PagedBook) -> Result<(PagedBook, usize), ImportError> {
        let pages = book.page_count();
        info!("Paginated {} into {pages} pages", self.path.display());
        Ok((book, pages))
    }
}

/// Opens and paginates `path` in one step.
pub fn paginate(path: &Path, password: Option<&str>) -> Result<(PagedBook, usize), ImportError> {
    Document::open(path, password)?.paginate()
}
