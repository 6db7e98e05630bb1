use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    export::{book_basename, export_book, AudioFormat},
    import,
    state::AppState,
};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document to export (.pdf or .txt)
    pub path: PathBuf,
    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,
    /// Directory that receives the `<basename>/` folder
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Audio format of the page files
    #[arg(long, value_enum, default_value_t = AudioFormat::Mp3)]
    pub format: AudioFormat,
}

/// Writes `<out_dir>/<basename>/<basename>_<page>.<ext>` for every page.
pub fn run(state: &AppState, args: &ExportArgs) -> Result<()> {
    let (book, _) = import::paginate(&args.path, args.password.as_deref())
        .with_context(|| format!("unable to open {}", args.path.display()))?;
    let mut speaker = state.speaker()?;

    let basename = book_basename(&args.path);
    let written = export_book(&book, &basename, &args.out_dir, args.format, &mut speaker)
        .with_context(|| format!("failed to export {}", args.path.display()))?;
    println!(
        "Saved {} audio files in {}",
        written.len(),
        args.out_dir.join(&basename).display()
    );
    Ok(())
}
