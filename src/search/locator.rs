//! Cross-page match location.
//!
//! [`DocumentPages`] pairs the raw text cache with a cache of normalized
//! pages. [`MatchLocator`] walks the pages from a starting point, wrapping
//! around the end of the document, and stops once every page has been
//! visited.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;

use crate::document::DocumentSource;
use crate::search::page_cache::{PageText, PageTextCache};
use crate::search::query::CompiledQuery;
use crate::text::{normalize, NormalizedText, OffsetMap};

/// A hit on a page.
///
/// Offsets count chars. `original_*` index into the raw page text and are
/// what highlight rendering uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Page index (0-based)
    pub page_index: usize,
    /// Start in the normalized text
    pub normalized_begin: usize,
    /// End (exclusive) in the normalized text
    pub normalized_end: usize,
    /// Start in the raw text
    pub original_begin: usize,
    /// End (exclusive) in the raw text
    pub original_end: usize,
}

impl Match {
    /// The matched slice of the raw page text.
    pub fn original_text<'a>(&self, raw_text: &'a str) -> &'a str {
        let mut indices = raw_text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(raw_text.len()));
        let begin = indices.nth(self.original_begin).unwrap_or(raw_text.len());
        if self.original_end <= self.original_begin {
            return "";
        }
        let end = indices
            .nth(self.original_end.saturating_sub(self.original_begin + 1))
            .unwrap_or(raw_text.len());
        &raw_text[begin..end.max(begin)]
    }
}

/// A page in searchable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    /// Page index (0-based)
    pub page_index: usize,
    raw: Arc<PageText>,
    normalized: NormalizedText,
}

impl NormalizedPage {
    /// Normalize a page's raw text.
    pub fn new(page: Arc<PageText>) -> Self {
        Self {
            page_index: page.page_index,
            normalized: normalize(&page.raw_text),
            raw: page,
        }
    }

    /// The raw text this page was normalized from.
    pub fn raw_text(&self) -> &str {
        &self.raw.raw_text
    }

    /// The normalized text.
    pub fn text(&self) -> &str {
        &self.normalized.text
    }

    /// Normalized -> raw offset map.
    pub fn offsets(&self) -> &OffsetMap {
        &self.normalized.offsets
    }

    /// Whether the raw text contained combining marks.
    pub fn has_diacritics(&self) -> bool {
        self.normalized.has_diacritics
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        let text = self.text();
        text.char_indices()
            .nth(char_index)
            .map_or(text.len(), |(i, _)| i)
    }

    fn char_index(&self, byte_offset: usize) -> usize {
        self.text()[..byte_offset].chars().count()
    }

    fn to_match(&self, start: usize, end: usize) -> Match {
        let normalized_begin = self.char_index(start);
        let normalized_end = normalized_begin + self.text()[start..end].chars().count();
        let (original_begin, mut original_end) = self
            .offsets()
            .original_range(normalized_begin, normalized_end);
        // stripped accents of the last matched letter belong to the hit
        let next_origin = self.offsets().original_index(normalized_end);
        original_end += self
            .raw_text()
            .chars()
            .skip(original_end)
            .take(next_origin.saturating_sub(original_end))
            .take_while(|&c| is_combining_mark(c))
            .count();
        Match {
            page_index: self.page_index,
            normalized_begin,
            normalized_end,
            original_begin,
            original_end,
        }
    }

    /// First hit starting at or after normalized char `from`.
    fn first_match(&self, query: &CompiledQuery, from: usize) -> Option<Match> {
        let start = self.byte_offset(from);
        query
            .find_at(self.text(), start)
            .map(|(s, e)| self.to_match(s, e))
    }

    /// Last hit starting before normalized char `before` (anywhere if `None`).
    fn last_match(&self, query: &CompiledQuery, before: Option<usize>) -> Option<Match> {
        let bound = before.map_or(self.text().len() + 1, |b| self.byte_offset(b));
        query
            .find_iter(self.text())
            .take_while(|&(s, _)| s < bound)
            .last()
            .map(|(s, e)| self.to_match(s, e))
    }
}

/// Raw and normalized page caches of one document.
pub struct DocumentPages {
    text_cache: PageTextCache,
    normalized: Mutex<HashMap<usize, Arc<NormalizedPage>>>,
}

impl DocumentPages {
    /// Empty caches over a document.
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            text_cache: PageTextCache::new(source),
            normalized: Mutex::new(HashMap::new()),
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.text_cache.page_count()
    }

    /// The raw text cache.
    pub fn text_cache(&self) -> &PageTextCache {
        &self.text_cache
    }

    /// Normalized form of a page, extracting and normalizing it on first use.
    ///
    /// A page that cannot be extracted normalizes to empty text.
    pub async fn normalized_page(&self, page_index: usize) -> Arc<NormalizedPage> {
        let cached = self.normalized.lock().get(&page_index).cloned();
        if let Some(page) = cached {
            return page;
        }
        let text = self.text_cache.page_text_or_placeholder(page_index).await;
        let page = Arc::new(NormalizedPage::new(text));
        self.normalized
            .lock()
            .entry(page_index)
            .or_insert(page)
            .clone()
    }

    /// Extract and normalize every page concurrently.
    pub async fn preload(&self) {
        join_all((0..self.page_count()).map(|i| self.normalized_page(i))).await;
    }
}

/// Finds matches of a compiled query across the pages of a document.
pub struct MatchLocator<'a> {
    pages: &'a DocumentPages,
    query: &'a CompiledQuery,
}

impl<'a> MatchLocator<'a> {
    /// Create a locator.
    pub fn new(pages: &'a DocumentPages, query: &'a CompiledQuery) -> Self {
        Self { pages, query }
    }

    /// Next match after a raw-text offset of `from_page`.
    ///
    /// With `after_original` set, only matches on `from_page` whose raw start
    /// is strictly greater are considered; the following pages are searched
    /// from their beginning, wrapping around. Returns `None` once every page
    /// has been visited once.
    pub async fn find_next(&self, from_page: usize, after_original: Option<usize>) -> Option<Match> {
        let page_count = self.pages.page_count();
        if page_count == 0 {
            return None;
        }
        let from_page = from_page % page_count;
        let start = match after_original {
            Some(offset) => {
                let page = self.pages.normalized_page(from_page).await;
                page.offsets().normalized_index(offset + 1)
            },
            None => 0,
        };
        self.scan_forward(from_page, start).await
    }

    /// Previous match before a raw-text offset of `from_page`, scanning pages
    /// backwards with the same wrap-around rule as [`find_next`].
    ///
    /// [`find_next`]: MatchLocator::find_next
    pub async fn find_previous(
        &self,
        from_page: usize,
        before_original: Option<usize>,
    ) -> Option<Match> {
        let page_count = self.pages.page_count();
        if page_count == 0 {
            return None;
        }
        let from_page = from_page % page_count;
        let before = match before_original {
            Some(offset) => {
                let page = self.pages.normalized_page(from_page).await;
                Some(page.offsets().normalized_index(offset))
            },
            None => None,
        };
        self.scan_backward(from_page, before).await
    }

    /// Scan forward; on `from_page` only hits at normalized char `start` or
    /// later count.
    pub(crate) async fn scan_forward(&self, from_page: usize, start: usize) -> Option<Match> {
        let page_count = self.pages.page_count();
        if page_count == 0 {
            return None;
        }
        let mut page_index = from_page % page_count;
        let mut start = start;
        for _ in 0..page_count {
            let page = self.pages.normalized_page(page_index).await;
            if let Some(found) = page.first_match(self.query, start) {
                return Some(found);
            }
            page_index = (page_index + 1) % page_count;
            if page_index == 0 {
                log::debug!("Search wrapped around to the first page");
            }
            start = 0;
        }
        None
    }

    /// Scan backward; on `from_page` only hits starting before normalized
    /// char `before` count.
    pub(crate) async fn scan_backward(
        &self,
        from_page: usize,
        before: Option<usize>,
    ) -> Option<Match> {
        let page_count = self.pages.page_count();
        if page_count == 0 {
            return None;
        }
        let mut page_index = from_page % page_count;
        let mut before = before;
        for _ in 0..page_count {
            let page = self.pages.normalized_page(page_index).await;
            if let Some(found) = page.last_match(self.query, before) {
                return Some(found);
            }
            if page_index == 0 {
                log::debug!("Search wrapped around to the last page");
            }
            page_index = (page_index + page_count - 1) % page_count;
            before = None;
        }
        None
    }
}
