// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Finder
//!
//! Find-in-document for text extracted from PDF pages.
//!
//! ## Core Features
//!
//! - **Tolerant matching**: accents, curly quotes, vulgar fractions, ligatures,
//!   full-width forms and Hangul syllables match their plain equivalents
//! - **Line handling**: `cof-\nfee` matches "coffee", line breaks match spaces,
//!   CJK lines join without a gap
//! - **Exact offsets**: every match maps back to char offsets in the raw page
//!   text, for highlighting
//! - **Query options**: case sensitivity, whole words, several terms at once
//! - **Paging**: next/previous match across pages with wrap-around
//! - **Async extraction**: pages are extracted lazily, once, and concurrent
//!   requests for a page share one extraction
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use pdf_finder::{FindOptions, SearchSession, TextDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # tokio::runtime::Builder::new_current_thread().build()?.block_on(async {
//! let doc = TextDocument::from_text("First page\u{0C}The Caf\u{e9} on the second");
//! let session = SearchSession::with_document(Arc::new(doc));
//! session.set_query("cafe", FindOptions::new().with_entire_word(true))?;
//!
//! if let Some(found) = session.find_next().await {
//!     println!(
//!         "page {} chars {}..{}",
//!         found.page_index, found.original_begin, found.original_end
//!     );
//! }
//! # Ok::<(), pdf_finder::Error>(())
//! # })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Find options
pub mod config;

// Document collaborator
pub mod document;

// Normalization
pub mod text;

// Find engine
pub mod search;

// Re-exports
pub use config::FindOptions;
pub use document::{DocumentSource, TextDocument, TextRun};
pub use error::{Error, Result};
pub use search::{compile, CompiledQuery, Cursor, Match, SearchSession};
pub use text::{normalize, NormalizedText, OffsetMap};
