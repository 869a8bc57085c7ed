//! Session-level find API.
//!
//! A [`SearchSession`] owns the caches of the current document, the active
//! query and the position of the last reported match. Scans run without
//! holding the session lock; a scan whose document or query was replaced
//! while it ran reports nothing.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::FindOptions;
use crate::document::DocumentSource;
use crate::error::{Error, Result};
use crate::search::locator::{DocumentPages, Match, MatchLocator};
use crate::search::page_cache::PageText;
use crate::search::query::{compile, CompiledQuery, QueryTerms};

/// Position of the last reported match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cursor {
    /// Page index (0-based)
    pub page_index: usize,
    /// Start of the match in the page's normalized text
    pub normalized_begin: usize,
}

impl From<&Match> for Cursor {
    fn from(m: &Match) -> Self {
        Self {
            page_index: m.page_index,
            normalized_begin: m.normalized_begin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Default)]
struct SessionState {
    pages: Option<Arc<DocumentPages>>,
    query: Option<Arc<CompiledQuery>>,
    cursor: Option<Cursor>,
    start_page: usize,
    document_generation: u64,
    query_generation: u64,
}

impl SessionState {
    fn generations(&self) -> (u64, u64) {
        (self.document_generation, self.query_generation)
    }
}

/// Find-in-document state for one document at a time.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pdf_finder::config::FindOptions;
/// use pdf_finder::document::TextDocument;
/// use pdf_finder::search::SearchSession;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let session = SearchSession::with_document(Arc::new(TextDocument::from_text(
///     "no luck here\u{0C}a cof-\nfee break",
/// )));
/// session.set_query("coffee", FindOptions::default()).unwrap();
///
/// let found = session.find_next().await.unwrap();
/// assert_eq!(found.page_index, 1);
/// assert_eq!((found.original_begin, found.original_end), (2, 10));
/// # });
/// ```
#[derive(Default)]
pub struct SearchSession {
    state: Mutex<SessionState>,
}

impl SearchSession {
    /// A session with no document loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session over a document.
    pub fn with_document(source: Arc<dyn DocumentSource>) -> Self {
        let session = Self::new();
        session.set_document(source);
        session
    }

    /// Replace the document.
    ///
    /// All cached text, the query and the cursor are dropped. Scans still
    /// running against the previous document report nothing.
    pub fn set_document(&self, source: Arc<dyn DocumentSource>) {
        let pages = Arc::new(DocumentPages::new(source));
        let mut state = self.state.lock();
        log::debug!("Loading document with {} pages", pages.page_count());
        state.pages = Some(pages);
        state.query = None;
        state.cursor = None;
        state.start_page = 0;
        state.document_generation += 1;
        state.query_generation += 1;
    }

    /// Set the active query and reset the cursor.
    ///
    /// On [`Error::EmptyQuery`] the session is left with no query, so
    /// subsequent finds return `None`.
    pub fn set_query(&self, terms: impl Into<QueryTerms>, options: FindOptions) -> Result<()> {
        let compiled = compile(terms, &options);
        let mut state = self.state.lock();
        state.cursor = None;
        state.query_generation += 1;
        match compiled {
            Ok(query) => {
                state.query = Some(Arc::new(query));
                Ok(())
            },
            Err(e) => {
                state.query = None;
                Err(e)
            },
        }
    }

    /// Drop the query and the cursor.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.query = None;
        state.cursor = None;
        state.query_generation += 1;
    }

    /// Page where a search without a cursor begins. Resets the cursor.
    pub fn set_start_page(&self, page_index: usize) -> Result<()> {
        let mut state = self.state.lock();
        let page_count = state.pages.as_ref().map_or(0, |p| p.page_count());
        if page_index >= page_count {
            return Err(Error::PageOutOfRange {
                page: page_index,
                page_count,
            });
        }
        state.start_page = page_index;
        state.cursor = None;
        Ok(())
    }

    /// Number of pages in the current document (0 without a document).
    pub fn page_count(&self) -> usize {
        self.state
            .lock()
            .pages
            .as_ref()
            .map_or(0, |p| p.page_count())
    }

    /// Position of the last reported match.
    pub fn cursor(&self) -> Option<Cursor> {
        self.state.lock().cursor
    }

    /// The active query.
    pub fn query(&self) -> Option<Arc<CompiledQuery>> {
        self.state.lock().query.clone()
    }

    /// Extract and normalize every page ahead of the first search.
    pub async fn preload(&self) {
        let pages = self.state.lock().pages.clone();
        if let Some(pages) = pages {
            pages.preload().await;
        }
    }

    /// Raw text of a page, the text that [`Match`] original offsets index.
    pub async fn page_text(&self, page_index: usize) -> Result<Arc<PageText>> {
        let pages = self.state.lock().pages.clone();
        match pages {
            Some(pages) => pages.text_cache().get_page_text(page_index).await,
            None => Err(Error::PageOutOfRange {
                page: page_index,
                page_count: 0,
            }),
        }
    }

    /// Whether a page contains combining marks. `None` without a document or
    /// for a page out of range.
    pub async fn page_has_diacritics(&self, page_index: usize) -> Option<bool> {
        let pages = self.state.lock().pages.clone()?;
        if page_index >= pages.page_count() {
            return None;
        }
        Some(pages.normalized_page(page_index).await.has_diacritics())
    }

    /// The match after the cursor, or the first match from the start page.
    ///
    /// Returns `None` when there is no document or query, when no page
    /// matches after a full cycle, or when the document or query changed
    /// during the scan. A `None` clears the cursor, so the next call begins
    /// again at the start page.
    pub async fn find_next(&self) -> Option<Match> {
        self.find(Direction::Forward).await
    }

    /// The match before the cursor, or the last match scanning backwards from
    /// the start page.
    pub async fn find_previous(&self) -> Option<Match> {
        self.find(Direction::Backward).await
    }

    async fn find(&self, direction: Direction) -> Option<Match> {
        let (pages, query, cursor, start_page, generations) = {
            let state = self.state.lock();
            (
                state.pages.clone(),
                state.query.clone(),
                state.cursor,
                state.start_page,
                state.generations(),
            )
        };
        let (pages, query) = match (pages, query) {
            (Some(pages), Some(query)) => (pages, query),
            _ => return None,
        };

        let locator = MatchLocator::new(&pages, &query);
        let found = match (direction, cursor) {
            (Direction::Forward, Some(c)) => {
                locator
                    .scan_forward(c.page_index, c.normalized_begin + 1)
                    .await
            },
            (Direction::Forward, None) => locator.scan_forward(start_page, 0).await,
            (Direction::Backward, Some(c)) => {
                locator
                    .scan_backward(c.page_index, Some(c.normalized_begin))
                    .await
            },
            (Direction::Backward, None) => locator.scan_backward(start_page, None).await,
        };

        let mut state = self.state.lock();
        if state.generations() != generations {
            log::debug!("Discarding result of a stale {:?} scan", direction);
            return None;
        }
        state.cursor = found.as_ref().map(Cursor::from);
        if found.is_none() {
            log::debug!("No match for /{}/", query.pattern());
        }
        found
    }
}
