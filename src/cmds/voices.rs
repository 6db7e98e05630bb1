use anyhow::Result;

use crate::state::AppState;

/// Prints the discovered voices as JSON.
pub fn run(state: &AppState) -> Result<()> {
    let voices = state.voices.list();
    if voices.is_empty() {
        eprintln!(
            "No voice models found in {}",
            state.voices.base_dir().display()
        );
    }
    println!("{}", serde_json::to_string_pretty(&voices)?);
    Ok(())
}
