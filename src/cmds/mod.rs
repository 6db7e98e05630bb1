//! Subcommand handlers. Each one takes the shared [`crate::state::AppState`]
//! and its parsed arguments, and reports failures through `anyhow`.

pub mod export;
pub mod read;
pub mod voices;
