//! Document model consumed by the find engine.
//!
//! The engine never parses documents itself. A [`DocumentSource`] hands out
//! the text runs of each page, as produced by whatever PDF library renders
//! the document. [`TextDocument`] is an in-memory source for plain text.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Page separator in plain-text documents (form feed).
pub const PAGE_SEPARATOR: char = '\u{0C}';

/// A run of text as emitted by the document parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Text of the run, verbatim
    pub text: String,
    /// Whether the parser flagged this run as ending a visual line
    pub ends_line: bool,
}

impl TextRun {
    /// Create a run.
    pub fn new(text: impl Into<String>, ends_line: bool) -> Self {
        Self {
            text: text.into(),
            ends_line,
        }
    }
}

/// Source of per-page text runs.
///
/// Extraction may be slow (I/O against the document), so it is async.
/// Failures are per page: a page that cannot be extracted does not make the
/// whole document unsearchable.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Text runs of a page, in reading order
    async fn page_runs(&self, page_index: usize) -> Result<Vec<TextRun>>;
}

/// In-memory document built from plain text.
///
/// Each line of a page becomes one run flagged as ending a line, except the
/// last line of the page.
///
/// # Example
///
/// ```
/// use pdf_finder::document::{DocumentSource, TextDocument};
///
/// let doc = TextDocument::from_text("first page\u{0C}second page");
/// assert_eq!(doc.page_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    pages: Vec<Vec<TextRun>>,
    failing_pages: HashSet<usize>,
}

impl TextDocument {
    /// Build a document from already-split runs.
    pub fn from_runs(pages: Vec<Vec<TextRun>>) -> Self {
        Self {
            pages,
            failing_pages: HashSet::new(),
        }
    }

    /// Build a document with one entry per page.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_runs(pages.into_iter().map(|p| split_lines(p.as_ref())).collect())
    }

    /// Build a document from text whose pages are separated by form feeds.
    pub fn from_text(text: &str) -> Self {
        Self::from_pages(text.split(PAGE_SEPARATOR))
    }

    /// Load a UTF-8 text file whose pages are separated by form feeds.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let doc = Self::from_text(&text);
        log::debug!("Loaded {} pages from {}", doc.pages.len(), path.display());
        Ok(doc)
    }

    /// Make extraction of a page fail, as it would for damaged content.
    pub fn with_failing_page(mut self, page_index: usize) -> Self {
        self.failing_pages.insert(page_index);
        self
    }
}

fn split_lines(page: &str) -> Vec<TextRun> {
    let mut lines = page.split('\n').peekable();
    let mut runs = Vec::new();
    while let Some(line) = lines.next() {
        let ends_line = lines.peek().is_some();
        if line.is_empty() && !ends_line {
            continue;
        }
        runs.push(TextRun::new(line, ends_line));
    }
    runs
}

#[async_trait]
impl DocumentSource for TextDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_runs(&self, page_index: usize) -> Result<Vec<TextRun>> {
        if self.failing_pages.contains(&page_index) {
            return Err(Error::extraction(page_index, "page content is unreadable"));
        }
        self.pages
            .get(page_index)
            .cloned()
            .ok_or(Error::PageOutOfRange {
                page: page_index,
                page_count: self.pages.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        let runs = split_lines("one\ntwo");
        assert_eq!(
            runs,
            vec![TextRun::new("one", true), TextRun::new("two", false)]
        );
        assert_eq!(split_lines("one\n"), vec![TextRun::new("one", true)]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_from_text_pages() {
        let doc = TextDocument::from_text("a\u{0C}b\nc\u{0C}");
        assert_eq!(doc.page_count(), 3);
    }

    #[tokio::test]
    async fn test_page_runs() {
        let doc = TextDocument::from_pages(["alpha\nbeta"]);
        let runs = doc.page_runs(0).await.unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].ends_line);
        assert!(!runs[1].ends_line);
    }

    #[tokio::test]
    async fn test_failing_and_missing_pages() {
        let doc = TextDocument::from_pages(["a", "b"]).with_failing_page(1);
        assert!(matches!(
            doc.page_runs(1).await,
            Err(Error::Extraction { page: 1, .. })
        ));
        assert!(matches!(
            doc.page_runs(5).await,
            Err(Error::PageOutOfRange { page: 5, page_count: 2 })
        ));
    }
}
