//! Find-in-document for paged text.
//!
//! Page text is extracted once per page, normalized so that the query
//! tolerates accents, punctuation variants, line-wrap hyphenation and
//! compatibility characters, and matched with a compiled query. Every match
//! carries offsets into the raw page text for highlighting.
//!
//! - [`PageTextCache`]: memoized, coalesced page extraction
//! - [`compile`]: query terms and [`FindOptions`](crate::config::FindOptions) to a [`CompiledQuery`]
//! - [`MatchLocator`]: next/previous match across pages, wrapping around
//! - [`SearchSession`]: cursor and query state for a UI
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pdf_finder::config::FindOptions;
//! use pdf_finder::document::TextDocument;
//! use pdf_finder::search::SearchSession;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let doc = TextDocument::from_text("Le caf\u{e9}\u{0C}Un autre cafe");
//! let session = SearchSession::with_document(Arc::new(doc));
//! session.set_query("cafe", FindOptions::default()).unwrap();
//!
//! let first = session.find_next().await.unwrap();
//! assert_eq!((first.page_index, first.original_begin, first.original_end), (0, 3, 7));
//! let second = session.find_next().await.unwrap();
//! assert_eq!((second.page_index, second.original_begin), (1, 9));
//! # });
//! ```

mod locator;
mod page_cache;
mod query;
mod session;

pub use locator::{DocumentPages, Match, MatchLocator, NormalizedPage};
pub use page_cache::{PageText, PageTextCache};
pub use query::{compile, CompiledQuery, QueryTerms};
pub use session::{Cursor, SearchSession};
