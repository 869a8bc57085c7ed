//! Text normalization for searching.
//!
//! - [`normalize`]: raw page text to searchable text plus an offset map
//! - [`OffsetMap`]: normalized offsets back to raw offsets
//! - [`chars`]: character classes shared with whole-word matching

pub mod chars;
mod normalizer;
mod offset_map;

pub use normalizer::{normalize, NormalizedText};
pub use offset_map::{Breakpoint, OffsetMap};
