//! Memoized extraction of raw page text.
//!
//! Every page is extracted at most once per document. Concurrent requests
//! for a page that is still being extracted wait for the same extraction
//! instead of starting their own.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::document::{DocumentSource, TextRun};
use crate::error::{Error, Result};

/// Raw text of one page: the runs concatenated verbatim, with a `\n` after
/// every run that ends a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page index (0-based)
    pub page_index: usize,
    /// Concatenated run text
    pub raw_text: String,
}

impl PageText {
    /// Concatenate the runs of a page.
    pub fn from_runs(page_index: usize, runs: &[TextRun]) -> Self {
        let mut raw_text = String::with_capacity(runs.iter().map(|r| r.text.len() + 1).sum());
        for run in runs {
            raw_text.push_str(&run.text);
            if run.ends_line {
                raw_text.push('\n');
            }
        }
        Self {
            page_index,
            raw_text,
        }
    }

    /// Empty text standing in for a page that could not be extracted.
    pub fn placeholder(page_index: usize) -> Self {
        Self {
            page_index,
            raw_text: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum PageSlot {
    Extracted(Arc<PageText>),
    Failed {
        placeholder: Arc<PageText>,
        reason: String,
    },
}

/// Per-document cache of extracted page text.
///
/// The cache belongs to one document. Reloading a document means building a
/// new cache; extractions still running against the old one complete into a
/// cache nobody reads any more.
pub struct PageTextCache {
    source: Arc<dyn DocumentSource>,
    page_count: usize,
    slots: Mutex<HashMap<usize, Arc<OnceCell<PageSlot>>>>,
}

impl PageTextCache {
    /// Create an empty cache over a document.
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        let page_count = source.page_count();
        Self {
            source,
            page_count,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Raw text of a page.
    ///
    /// Fails with [`Error::Extraction`] when the document could not produce
    /// text for the page; the failure is remembered and reported again on
    /// later calls without retrying extraction.
    pub async fn get_page_text(&self, page_index: usize) -> Result<Arc<PageText>> {
        match self.slot(page_index).await? {
            PageSlot::Extracted(text) => Ok(text),
            PageSlot::Failed { reason, .. } => Err(Error::extraction(page_index, reason)),
        }
    }

    /// Raw text of a page, or the empty placeholder if extraction failed.
    pub async fn page_text_or_placeholder(&self, page_index: usize) -> Arc<PageText> {
        match self.slot(page_index).await {
            Ok(PageSlot::Extracted(text)) => text,
            Ok(PageSlot::Failed { placeholder, .. }) => placeholder,
            Err(_) => Arc::new(PageText::placeholder(page_index)),
        }
    }

    /// Whether a page has already been extracted (or has failed).
    pub fn is_cached(&self, page_index: usize) -> bool {
        self.slots
            .lock()
            .get(&page_index)
            .is_some_and(|cell| cell.initialized())
    }

    /// Extract every page concurrently. Returns the number of pages that
    /// failed.
    pub async fn extract_all(&self) -> usize {
        let results = join_all((0..self.page_count).map(|i| self.get_page_text(i))).await;
        results.iter().filter(|r| r.is_err()).count()
    }

    async fn slot(&self, page_index: usize) -> Result<PageSlot> {
        if page_index >= self.page_count {
            return Err(Error::PageOutOfRange {
                page: page_index,
                page_count: self.page_count,
            });
        }
        let cell = self.slots.lock().entry(page_index).or_default().clone();
        if cell.initialized() {
            log::debug!("Page {} served from cache", page_index);
        }
        let slot = cell.get_or_init(|| self.extract(page_index)).await;
        Ok(slot.clone())
    }

    async fn extract(&self, page_index: usize) -> PageSlot {
        match self.source.page_runs(page_index).await {
            Ok(runs) => {
                let text = PageText::from_runs(page_index, &runs);
                log::debug!(
                    "Extracted page {} ({} runs, {} bytes)",
                    page_index,
                    runs.len(),
                    text.raw_text.len()
                );
                PageSlot::Extracted(Arc::new(text))
            },
            Err(e) => {
                log::warn!("Unable to get text content for page {}: {}", page_index, e);
                PageSlot::Failed {
                    placeholder: Arc::new(PageText::placeholder(page_index)),
                    reason: e.to_string(),
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextDocument;

    #[test]
    fn test_page_text_from_runs() {
        let runs = vec![
            TextRun::new("Hello ", false),
            TextRun::new("World", true),
            TextRun::new("next line", false),
        ];
        let text = PageText::from_runs(3, &runs);
        assert_eq!(text.page_index, 3);
        assert_eq!(text.raw_text, "Hello World\nnext line");
    }

    #[test]
    fn test_placeholder_is_empty() {
        assert_eq!(PageText::placeholder(1).raw_text, "");
    }

    #[tokio::test]
    async fn test_get_page_text_memoizes() {
        let cache = PageTextCache::new(Arc::new(TextDocument::from_pages(["one\ntwo", "three"])));
        assert_eq!(cache.page_count(), 2);
        assert!(!cache.is_cached(0));

        let first = cache.get_page_text(0).await.unwrap();
        assert_eq!(first.raw_text, "one\ntwo");
        assert!(cache.is_cached(0));

        let second = cache.get_page_text(0).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_page_uses_placeholder() {
        let doc = TextDocument::from_pages(["ok", "broken"]).with_failing_page(1);
        let cache = PageTextCache::new(Arc::new(doc));

        assert!(matches!(
            cache.get_page_text(1).await,
            Err(Error::Extraction { page: 1, .. })
        ));
        assert!(cache.is_cached(1));
        assert_eq!(cache.page_text_or_placeholder(1).await.raw_text, "");
        assert_eq!(cache.page_text_or_placeholder(0).await.raw_text, "ok");
    }

    #[tokio::test]
    async fn test_out_of_range_page() {
        let cache = PageTextCache::new(Arc::new(TextDocument::from_pages(["a"])));
        assert!(matches!(
            cache.get_page_text(4).await,
            Err(Error::PageOutOfRange { page: 4, page_count: 1 })
        ));
        assert!(!cache.is_cached(4));
    }

    #[tokio::test]
    async fn test_extract_all_counts_failures() {
        let doc = TextDocument::from_pages(["a", "b", "c"]).with_failing_page(2);
        let cache = PageTextCache::new(Arc::new(doc));
        assert_eq!(cache.extract_all().await, 1);
        assert!((0..3).all(|i| cache.is_cached(i)));
    }
}
