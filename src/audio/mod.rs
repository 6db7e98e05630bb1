//! Audio output for synthesised speech.
//!
//! [`Player`] plays WAV files through rodio and blocks until they finish,
//! [`Encoder`] turns them into the exported container (MP3 through ffmpeg).

pub mod encode;
pub mod player;

pub use encode::{EncodeError, Encoder};
pub use player::{AudioError, Player};
