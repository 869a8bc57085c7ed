//! Search normalization of extracted page text.
//!
//! Extracted text rarely matches what a user types: accents may be composed
//! or decomposed, quotes are curly, words are split by line-wrap hyphens and
//! lines are glued without spaces. [`normalize`] rewrites the raw text into a
//! canonical searchable form and records an [`OffsetMap`] so that every hit in
//! the normalized text can be mapped back to the raw text.
//!
//! # Algorithm
//!
//! 1. Canonically decompose (NFD) the raw text, tagging every decomposed char
//!    with the raw char it came from. Hangul syllables expand to their jamo
//!    here and all the jamo share the syllable's raw index.
//! 2. Scan the decomposed chars once, applying the first rule that matches at
//!    each position:
//!    - typographic punctuation and vulgar fractions are replaced literally;
//!    - compatibility characters are replaced by their folded NFKC form;
//!    - a Kana voicing mark before a line break keeps the mark and drops the
//!      break (no word separation between the two lines);
//!    - a run of combining marks is stripped (Kana voicing marks and viramas
//!      survive), together with a following `-\n`; surviving marks that end
//!      up adjacent are put back in canonical order;
//!    - `X-\n` drops the hyphen and the break (hyphenated word continuation);
//!    - an ideograph before a line break drops the break;
//!    - any other line break becomes a space.
//! 3. Finish the offset map with the terminal breakpoint.
//!
//! Normalization is pure: the same input always yields the same output, and
//! normalizing normalized text changes nothing.

use unicode_normalization::char::{
    canonical_combining_class, decompose_canonical, is_combining_mark,
};
use unicode_normalization::{is_nfkc_quick, IsNormalized, UnicodeNormalization};

use crate::text::chars::{
    is_diacritic, is_ideographic, is_kana_voicing_mark, is_significant_mark,
    punctuation_replacement,
};
use crate::text::offset_map::{OffsetMap, OffsetMapBuilder};

/// Compatibility folds can produce further compatibility characters; this
/// bounds the recursion.
const MAX_FOLD_DEPTH: usize = 4;

/// Result of normalizing one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// The searchable text
    pub text: String,
    /// Normalized char offsets -> raw char offsets
    pub offsets: OffsetMap,
    /// Whether any combining mark was seen while normalizing
    pub has_diacritics: bool,
}

impl NormalizedText {
    /// Number of chars in the normalized text.
    pub fn char_len(&self) -> usize {
        self.offsets.normalized_len()
    }
}

/// Accumulates normalized chars together with their raw origin.
///
/// Non-starters are held back until the next starter so that marks which
/// become adjacent (a stripped mark between them, a removed line break, a
/// compatibility fold) still leave in canonical order.
struct Output {
    text: String,
    offsets: OffsetMapBuilder,
    marks: Vec<(char, usize)>,
}

impl Output {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            offsets: OffsetMapBuilder::new(),
            marks: Vec::new(),
        }
    }

    fn push(&mut self, c: char, origin: usize) {
        if canonical_combining_class(c) != 0 {
            self.marks.push((c, origin));
            return;
        }
        self.flush_marks();
        self.text.push(c);
        self.offsets.push(origin);
    }

    fn push_str(&mut self, s: &str, origin: usize) {
        for c in s.chars() {
            self.push(c, origin);
        }
    }

    fn flush_marks(&mut self) {
        self.marks.sort_by_key(|&(c, _)| canonical_combining_class(c));
        for (c, origin) in self.marks.drain(..) {
            self.text.push(c);
            self.offsets.push(origin);
        }
    }

    fn finish(mut self, original_len: usize, has_diacritics: bool) -> NormalizedText {
        self.flush_marks();
        NormalizedText {
            text: self.text,
            offsets: self.offsets.finish(original_len),
            has_diacritics,
        }
    }
}

/// Normalize raw page text for searching.
///
/// # Examples
///
/// ```
/// use pdf_finder::text::normalize;
///
/// assert_eq!(normalize("line1\nline2").text, "line1 line2");
/// assert_eq!(normalize("cof-\nfee").text, "coffee");
/// assert_eq!(normalize("caf\u{e9}").text, normalize("cafe\u{301}").text);
/// ```
pub fn normalize(raw: &str) -> NormalizedText {
    let decomposed = decompose(raw);
    let original_len = raw.chars().count();
    let next = |i: usize| decomposed.get(i).map(|&(c, _)| c);

    let mut out = Output::with_capacity(raw.len());
    let mut has_diacritics = false;
    let mut k = 0;

    while k < decomposed.len() {
        let (c, origin) = decomposed[k];

        if let Some(replacement) = punctuation_replacement(c) {
            out.push_str(replacement, origin);
            k += 1;
            continue;
        }

        if let Some(replacement) = compatibility_replacement(c, 0) {
            out.push_str(&replacement, origin);
            k += 1;
            continue;
        }

        if is_kana_voicing_mark(c) && next(k + 1) == Some('\n') {
            has_diacritics = true;
            out.push(c, origin);
            k += 2;
            continue;
        }

        if is_combining_mark(c) {
            has_diacritics = true;
            while let Some(&(mark, mark_origin)) = decomposed.get(k) {
                if !is_combining_mark(mark) {
                    break;
                }
                if is_significant_mark(mark) {
                    out.push(mark, mark_origin);
                }
                k += 1;
            }
            // accents followed by a line-wrap hyphen are not a word break
            if next(k) == Some('-') && next(k + 1) == Some('\n') {
                k += 2;
            }
            continue;
        }

        if !c.is_whitespace() && next(k + 1) == Some('-') && next(k + 2) == Some('\n') {
            out.push(c, origin);
            k += 3;
            continue;
        }

        if is_ideographic(c) && next(k + 1) == Some('\n') {
            out.push(c, origin);
            k += 2;
            continue;
        }

        if c == '\n' {
            out.push(' ', origin);
            k += 1;
            continue;
        }

        out.push(c, origin);
        k += 1;
    }

    out.finish(original_len, has_diacritics)
}

/// Canonical decomposition of `raw`, each char tagged with its raw index.
fn decompose(raw: &str) -> Vec<(char, usize)> {
    let mut decomposed = Vec::with_capacity(raw.len());
    for (index, c) in raw.chars().enumerate() {
        decompose_canonical(c, |d| decomposed.push((d, index)));
    }
    reorder_marks(&mut decomposed);
    decomposed
}

/// Canonical ordering: stable sort of every run of non-starters by
/// combining class.
fn reorder_marks(chars: &mut [(char, usize)]) {
    let mut start = 0;
    while start < chars.len() {
        if canonical_combining_class(chars[start].0) == 0 {
            start += 1;
            continue;
        }
        let mut end = start + 1;
        while end < chars.len() && canonical_combining_class(chars[end].0) != 0 {
            end += 1;
        }
        if end - start > 1 {
            chars[start..end].sort_by_key(|&(c, _)| canonical_combining_class(c));
        }
        start = end;
    }
}

/// Folded NFKC form of `c`, or `None` if `c` is already compatibility-stable
/// or is a combining mark.
fn compatibility_replacement(c: char, depth: usize) -> Option<String> {
    if c.is_ascii() || is_combining_mark(c) {
        return None;
    }
    if matches!(is_nfkc_quick(std::iter::once(c)), IsNormalized::Yes) {
        return None;
    }
    let composed: String = std::iter::once(c).nfkc().collect();
    if composed.chars().eq(std::iter::once(c)) {
        return None;
    }
    Some(fold(&composed, depth + 1))
}

/// Bring a compatibility replacement into normalized form so that a second
/// normalization pass leaves it untouched.
fn fold(text: &str, depth: usize) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.nfd() {
        if let Some(replacement) = punctuation_replacement(c) {
            folded.push_str(replacement);
        } else if is_diacritic(c) {
            continue;
        } else if depth < MAX_FOLD_DEPTH {
            match compatibility_replacement(c, depth) {
                Some(replacement) => folded.push_str(&replacement),
                None => folded.push(c),
            }
        } else {
            folded.push(c);
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn originals(normalized: &NormalizedText) -> Vec<usize> {
        (0..=normalized.char_len())
            .map(|i| normalized.offsets.original_index(i))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let n = normalize("");
        assert_eq!(n.text, "");
        assert!(!n.has_diacritics);
        assert_eq!(n.offsets.breakpoints().len(), 1);
        assert_eq!(n.offsets.original_index(0), 0);
    }

    #[test]
    fn test_plain_text_unchanged() {
        let n = normalize("Hello world");
        assert_eq!(n.text, "Hello world");
        assert_eq!(n.offsets, OffsetMap::identity(11));
        assert!(!n.has_diacritics);
    }

    #[test]
    fn test_composed_and_decomposed_accents() {
        let composed = normalize("caf\u{e9}");
        let decomposed = normalize("cafe\u{301}");
        assert_eq!(composed.text, "cafe");
        assert_eq!(decomposed.text, "cafe");
        assert!(composed.has_diacritics);
        assert!(decomposed.has_diacritics);
        assert_eq!(originals(&composed), vec![0, 1, 2, 3, 4]);
        assert_eq!(originals(&decomposed), vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn test_hyphen_break_collapse() {
        let n = normalize("cof-\nfee");
        assert_eq!(n.text, "coffee");
        assert_eq!(originals(&n), vec![0, 1, 2, 5, 6, 7, 8]);
    }

    #[test]
    fn test_hyphen_after_space_is_kept() {
        assert_eq!(normalize("a -\nb").text, "a - b");
    }

    #[test]
    fn test_line_break_becomes_space() {
        let n = normalize("line1\nline2");
        assert_eq!(n.text, "line1 line2");
        assert_eq!(n.offsets, OffsetMap::identity(11));
    }

    #[test]
    fn test_diacritic_before_hyphen_break() {
        let n = normalize("re\u{301}-\nsume\u{301}");
        assert_eq!(n.text, "resume");
        assert!(n.has_diacritics);
        // 's' comes from raw index 5
        assert_eq!(n.offsets.original_index(2), 5);
        assert_eq!(n.offsets.original_len(), 10);
    }

    #[test]
    fn test_marks_joined_across_hyphen_break_are_reordered() {
        // virama (ccc 9) and voicing mark (ccc 8) meet once "-\n" is gone
        let n = normalize("\u{915}\u{94D}-\n\u{3099}");
        assert_eq!(n.text, "\u{915}\u{3099}\u{94D}");
        assert_eq!(normalize(&n.text).text, n.text);
    }

    #[test]
    fn test_marks_reordered_after_stripped_starter_mark() {
        // U+0F76 decomposes to U+0FB2 (ccc 0, stripped) + U+0F80
        let n = normalize("\u{F71}\u{F76}\u{94D}");
        assert_eq!(n.text, "\u{94D}\u{F71}\u{F80}");
        assert_eq!(originals(&n), vec![2, 2, 2, 3]);
    }

    #[test]
    fn test_marks_reordered_after_compatibility_fold() {
        // halfwidth voiced mark folds to U+3099, which sorts before the virama
        let n = normalize("\u{94D}\u{FF9E}");
        assert_eq!(n.text, "\u{3099}\u{94D}");
        assert_eq!(originals(&n), vec![1, 1, 2]);
    }

    #[test]
    fn test_ideograph_line_break_dropped() {
        let n = normalize("中\n文");
        assert_eq!(n.text, "中文");
        assert_eq!(originals(&n), vec![0, 2, 3]);
    }

    #[test]
    fn test_kana_voicing_mark_before_line_break() {
        // が is か + U+3099 after decomposition
        let n = normalize("\u{304C}\nき");
        assert_eq!(n.text, "\u{304B}\u{3099}き");
        assert!(n.has_diacritics);
        assert_eq!(originals(&n), vec![0, 0, 2, 3]);
    }

    #[test]
    fn test_significant_marks_survive() {
        let n = normalize("क्ष");
        assert_eq!(n.text, "क्ष");
    }

    #[test]
    fn test_punctuation_substitution() {
        let n = normalize("\u{201C}it\u{2019}s\u{201D}");
        assert_eq!(n.text, "\"it's\"");
        assert_eq!(n.offsets, OffsetMap::identity(6));
    }

    #[test]
    fn test_fraction_expansion() {
        let n = normalize("\u{BD} cup");
        assert_eq!(n.text, "1/2 cup");
        assert_eq!(originals(&n), vec![0, 0, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_compatibility_characters() {
        assert_eq!(normalize("\u{FB01}le").text, "file");
        assert_eq!(normalize("\u{FF26}\u{FF55}\u{FF4C}\u{FF4C}").text, "Full");
        assert_eq!(normalize("x\u{B2}").text, "x2");
        assert_eq!(normalize("a\u{A0}b").text, "a b");
    }

    #[test]
    fn test_compatibility_fold_is_stable() {
        // U+2011 NON-BREAKING HYPHEN folds to U+2010 then to '-'
        assert_eq!(normalize("a\u{2011}b").text, "a-b");
        // U+00A8 DIAERESIS folds to a space and a stripped mark
        assert_eq!(normalize("a\u{A8}").text, "a ");
    }

    #[test]
    fn test_hangul_expansion() {
        let n = normalize("한국");
        assert_eq!(n.text.chars().count(), 6);
        assert_eq!(n.text, "한국".nfd().collect::<String>());
        assert_eq!(originals(&n), vec![0, 0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn test_idempotence_samples() {
        for sample in [
            "caf\u{e9} cr\u{e8}me",
            "cof-\nfee",
            "\u{304C}\nき",
            "\u{FB01}\u{BD}\u{2019}",
            "re\u{301}-\nsume",
            "한국어\n텍스트",
            "\u{F71}\u{F76}\u{94D}",
            "\u{94D}\u{FF9E}",
        ] {
            let once = normalize(sample).text;
            assert_eq!(normalize(&once).text, once, "sample {:?}", sample);
        }
    }
}
