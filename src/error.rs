//! Error types for the find engine.
//!
//! Running out of matches is not an error: scans return `Option<Match>`.
//! Everything here is recoverable at the session level.

/// Result type alias for find operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting, compiling or searching.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document collaborator could not produce text for a page
    /// (malformed or encrypted content). The page is searched as empty.
    #[error("Failed to extract text from page {page}: {reason}")]
    Extraction {
        /// Page index (0-based)
        page: usize,
        /// Reason reported by the collaborator
        reason: String,
    },

    /// Every query term was empty after trimming and normalization.
    #[error("Query is empty")]
    EmptyQuery,

    /// The compiled pattern was rejected by the regex engine.
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    /// Page index beyond the end of the document
    #[error("Page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange {
        /// Requested page index
        page: usize,
        /// Number of pages in the document
        page_count: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an extraction error for a page.
    pub fn extraction(page: usize, reason: impl Into<String>) -> Self {
        Error::Extraction {
            page,
            reason: reason.into(),
        }
    }
}
