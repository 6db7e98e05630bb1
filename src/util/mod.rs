#[cfg(test)]
pub mod env_guard;
pub mod logging;
pub mod piper_path;
