use std::{
    io::Write,
    path::Path,
    process::{Command, Stdio},
};

use log::{error, info, warn};
use serde::Deserialize;
use shlex::Shlex;

use crate::book::PagedBook;

use super::ImportError;

pub const DEFAULT_PDF_COMMAND: &str = "python3 scripts/py/pdf_extract.py";

const ERROR_DECRYPT: &str = "DECRYPT_FAIL";
const ERROR_SCRIPT_FAILED: &str = "PDF_SCRIPT_FAIL";
const ERROR_PARSE: &str = "PDF_PARSE_FAIL";

/// What an extractor found in a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfReport {
    pub encrypted: bool,
    pub decrypted: bool,
    pub pages: Vec<String>,
}

pub trait PdfExtractor {
    /// Extracts one string per PDF page, decrypting with `password` when the
    /// document is encrypted.
    fn extract(&self, path: &Path, password: &str) -> Result<PdfReport, ImportError>;
}

pub fn paginate_pdf(
    path: &Path,
    password: Option<&str>,
    extractor: &dyn PdfExtractor,
) -> Result<PagedBook, ImportError> {
    let report = extractor.extract(path, password.unwrap_or_default())?;
    if report.encrypted {
        info!("{} is encrypted, trying to decrypt", path.display());
        if !report.decrypted {
            error!("Decryption of {} failed", path.display());
            return Err(ImportError::DecryptionFailed(path.to_path_buf()));
        }
    }
    Ok(PagedBook::new(report.pages))
}

#[derive(Debug, Deserialize)]
struct ExtractorOutput {
    ok: bool,
    #[serde(default)]
    encrypted: bool,
    #[serde(default = "default_decrypted")]
    decrypted: bool,
    #[serde(default)]
    pages: Vec<Option<String>>,
    code: Option<String>,
    message: Option<String>,
}

fn default_decrypted() -> bool {
    true
}

impl ExtractorOutput {
    fn into_report(self, path: &Path) -> Result<PdfReport, ImportError> {
        if !self.ok {
            let code = self.code.unwrap_or_else(|| ERROR_PARSE.to_string());
            if code == ERROR_DECRYPT {
                return Err(ImportError::DecryptionFailed(path.to_path_buf()));
            }
            return Err(ImportError::Extractor {
                code,
                message: self
                    .message
                    .unwrap_or_else(|| "failed to import PDF".to_string()),
            });
        }

        Ok(PdfReport {
            encrypted: self.encrypted,
            decrypted: self.decrypted,
            pages: self
                .pages
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
        })
    }
}

/// Runs an extractor program with the PDF path as last argument and the
/// password on stdin, then reads a JSON report from its stdout.
#[derive(Debug, Clone)]
pub struct ScriptPdfExtractor {
    program: String,
    args: Vec<String>,
}

impl ScriptPdfExtractor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_env() -> Result<Self, ImportError> {
        let raw = std::env::var("READER_PDF_COMMAND")
            .unwrap_or_else(|_| DEFAULT_PDF_COMMAND.to_string());
        Self::from_command_line(&raw)
    }

    pub fn from_command_line(raw: &str) -> Result<Self, ImportError> {
        let mut parts: Vec<String> = Shlex::new(raw).collect();
        if parts.is_empty() {
            return Err(ImportError::Extractor {
                code: ERROR_SCRIPT_FAILED.to_string(),
                message: "READER_PDF_COMMAND is empty".to_string(),
            });
        }
        let program = parts.remove(0);
        Ok(Self::new(program, parts))
    }
}

impl PdfExtractor for ScriptPdfExtractor {
    fn extract(&self, path: &Path, password: &str) -> Result<PdfReport, ImportError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ImportError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = writeln!(stdin, "{password}") {
                warn!("PDF extractor did not read the password: {err}");
            }
        }

        let output = child.wait_with_output().map_err(ImportError::Spawn)?;
        if !output.status.success() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("PDF extractor failed: {message}");
            return Err(ImportError::Extractor {
                code: ERROR_SCRIPT_FAILED.to_string(),
                message,
            });
        }

        let parsed: ExtractorOutput =
            serde_json::from_slice(&output.stdout).map_err(ImportError::Parse)?;
        parsed.into_report(path)
    }
}
