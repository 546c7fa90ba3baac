//! Presets — the built-in mixes and the user's saved collection.

pub mod builtin;
pub use builtin::*;
pub mod saved;
pub use saved::*;

#[cfg(feature = "store")]
pub mod file;
