use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::{info, warn};

use crate::{
    book::PagedBook, import::Document, navigator::Navigator, session::Session, state::AppState,
};

const BANNER: &str = "Creating your audiobook... Please wait...";

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Document to read (.txt or .pdf)
    pub path: PathBuf,
    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,
}

/// Interactive page-by-page reading of one document.
pub fn run(state: &AppState, args: &ReadArgs) -> Result<()> {
    let (book, pages) = load(&args.path, args.password.as_deref(), &mut io::stdout())?;
    if book.is_empty() {
        warn!("{} has no readable pages", args.path.display());
    }
    let mut speaker = state.speaker()?;

    info!("Starting reading session over {pages} pages");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let navigator = Session::new(Navigator::new(book), &mut speaker, stdin.lock(), stdout.lock())
        .run()
        .context("reading session failed")?;
    info!(
        "Reading session finished on {:?} (cursor {:?})",
        navigator.state(),
        navigator.cursor()
    );
    Ok(())
}

/// Opens the document and only then shows the banner, so a bad path fails
/// without it.
fn load(path: &Path, password: Option<&str>, out: &mut impl Write) -> Result<(PagedBook, usize)> {
    let document = Document::open(path, password)
        .with_context(|| format!("unable to open {}", path.display()))?;
    writeln!(out, "{BANNER}")?;
    out.flush()?;
    document
        .paginate()
        .with_context(|| format!("unable to paginate {}", path.display()))
}
