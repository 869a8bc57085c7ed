//! Query compilation.
//!
//! Terms go through the same normalization as page text, are escaped for
//! literal matching and combined into a single regex. Case-insensitivity is
//! a matcher flag rather than a text transform, so match offsets stay exact.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use unicode_normalization::char::is_combining_mark;

use crate::config::FindOptions;
use crate::error::{Error, Result};
use crate::text::chars::character_type;
use crate::text::normalize;

lazy_static! {
    /// Whitespace runs inside a term
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// The terms of a query: a single phrase or a set of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTerms {
    /// One phrase
    Single(String),
    /// Any of several phrases
    Multiple(Vec<String>),
}

impl From<&str> for QueryTerms {
    fn from(term: &str) -> Self {
        QueryTerms::Single(term.to_string())
    }
}

impl From<String> for QueryTerms {
    fn from(term: String) -> Self {
        QueryTerms::Single(term)
    }
}

impl From<Vec<String>> for QueryTerms {
    fn from(terms: Vec<String>) -> Self {
        QueryTerms::Multiple(terms)
    }
}

impl From<Vec<&str>> for QueryTerms {
    fn from(terms: Vec<&str>) -> Self {
        QueryTerms::Multiple(terms.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for QueryTerms {
    fn from(terms: &[&str]) -> Self {
        QueryTerms::Multiple(terms.iter().map(|t| t.to_string()).collect())
    }
}

/// A query ready to run against normalized page text.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    regex: Regex,
    terms: Vec<String>,
    case_sensitive: bool,
    entire_word: bool,
    is_unicode: bool,
}

impl CompiledQuery {
    /// The regex source.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Normalized terms, in the priority order used by the pattern.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether letter case must match.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether hits must be whole words.
    pub fn entire_word(&self) -> bool {
        self.entire_word
    }

    /// Whether the pattern runs in Unicode mode.
    pub fn is_unicode(&self) -> bool {
        self.is_unicode
    }

    /// First accepted hit starting at or after byte offset `start`.
    ///
    /// Returns byte offsets. A hit rejected by the whole-word check does not
    /// hide an overlapping later hit.
    pub fn find_at(&self, text: &str, mut start: usize) -> Option<(usize, usize)> {
        while start <= text.len() {
            let m = self.regex.find_at(text, start)?;
            if m.end() > m.start()
                && (!self.entire_word || is_entire_word(text, m.start(), m.end()))
            {
                return Some((m.start(), m.end()));
            }
            start = next_char_boundary(text, m.start());
        }
        None
    }

    /// All accepted, non-overlapping hits in `text`, as byte offsets.
    pub fn find_iter<'q, 't>(
        &'q self,
        text: &'t str,
    ) -> impl Iterator<Item = (usize, usize)> + 'q
    where
        't: 'q,
    {
        let mut pos = 0;
        std::iter::from_fn(move || {
            let (start, end) = self.find_at(text, pos)?;
            pos = end;
            Some((start, end))
        })
    }
}

/// Compile query terms.
///
/// Fails with [`Error::EmptyQuery`] if no term survives trimming and
/// normalization. Several terms are tried in descending lexicographic order
/// so that a longer term is preferred over one of its prefixes ("foobar"
/// before "foo").
///
/// # Examples
///
/// ```
/// use pdf_finder::config::FindOptions;
/// use pdf_finder::search::compile;
///
/// let query = compile(vec!["foo", "foobar"], &FindOptions::default()).unwrap();
/// assert_eq!(query.find_at("foobar", 0), Some((0, 6)));
/// ```
pub fn compile(terms: impl Into<QueryTerms>, options: &FindOptions) -> Result<CompiledQuery> {
    let mut normalized: Vec<String> = match terms.into() {
        QueryTerms::Single(term) => normalize_term(&term).into_iter().collect(),
        QueryTerms::Multiple(terms) => terms.iter().filter_map(|t| normalize_term(t)).collect(),
    };
    if normalized.is_empty() {
        return Err(Error::EmptyQuery);
    }
    normalized.sort_unstable_by(|a, b| b.cmp(a));
    normalized.dedup();

    let pattern = if normalized.len() == 1 {
        term_pattern(&normalized[0])
    } else {
        normalized
            .iter()
            .map(|t| format!("(?:{})", term_pattern(t)))
            .collect::<Vec<_>>()
            .join("|")
    };

    let is_unicode = normalized.iter().any(|t| !t.is_ascii());
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .unicode(is_unicode)
        .build()
        .map_err(|e| Error::InvalidPattern(e.to_string()))?;

    log::debug!("Compiled query {:?} as /{}/", normalized, pattern);

    Ok(CompiledQuery {
        regex,
        terms: normalized,
        case_sensitive: options.case_sensitive,
        entire_word: options.entire_word,
        is_unicode,
    })
}

fn normalize_term(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let normalized = normalize(term).text.trim().to_string();
    (!normalized.is_empty()).then_some(normalized)
}

/// Literal pattern for a term; any whitespace run matches any whitespace run.
fn term_pattern(term: &str) -> String {
    RE_WHITESPACE
        .split(term)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Whether the hit `text[start..end]` is a whole word: at each edge either
/// there is no neighbouring character, one of the two characters is not
/// word-forming, or they belong to different script classes.
fn is_entire_word(text: &str, start: usize, end: usize) -> bool {
    let hit = &text[start..end];
    let before = text[..start].chars().rev().find(|c| !is_combining_mark(*c));
    let first = hit.chars().next();
    if let (Some(outside), Some(inside)) = (before, first) {
        if !is_word_boundary(outside, inside) {
            return false;
        }
    }

    let after = text[end..].chars().find(|c| !is_combining_mark(*c));
    let last = hit.chars().rev().find(|c| !is_combining_mark(*c));
    if let (Some(outside), Some(inside)) = (after, last) {
        if !is_word_boundary(inside, outside) {
            return false;
        }
    }
    true
}

fn is_word_boundary(a: char, b: char) -> bool {
    let (ta, tb) = (character_type(a), character_type(b));
    !ta.is_word_forming() || !tb.is_word_forming() || ta != tb
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    match text[index..].chars().next() {
        Some(c) => index + c.len_utf8(),
        None => text.len() + 1,
    }
}
