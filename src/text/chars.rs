//! Character classification used by normalization and whole-word checks.
//!
//! The word classes follow the line-breaking conventions of browser word
//! breakers: a word boundary exists wherever the class changes, and spaces or
//! punctuation never form words on their own.

use unicode_normalization::char::is_combining_mark;

/// Word-breaking class of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterType {
    /// ASCII whitespace and NBSP
    Space,
    /// Letters, digits and underscore of alphabetic scripts
    AlphaLetter,
    /// ASCII punctuation and symbols
    Punct,
    /// Han ideographs
    HanLetter,
    /// Katakana
    KatakanaLetter,
    /// Hiragana
    HiraganaLetter,
    /// Halfwidth Katakana forms
    HalfwidthKatakanaLetter,
    /// Thai
    ThaiLetter,
}

impl CharacterType {
    /// Whether characters of this class can be part of a word.
    pub fn is_word_forming(self) -> bool {
        !matches!(self, CharacterType::Space | CharacterType::Punct)
    }
}

/// Classify a character for word-boundary purposes.
pub fn character_type(c: char) -> CharacterType {
    let code = c as u32;
    if code < 0x2E80 {
        if c.is_ascii() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                return CharacterType::Space;
            }
            if c.is_ascii_alphanumeric() || c == '_' {
                return CharacterType::AlphaLetter;
            }
            return CharacterType::Punct;
        }
        if code & 0xFF80 == 0x0E00 {
            return CharacterType::ThaiLetter;
        }
        if code == 0xA0 {
            return CharacterType::Space;
        }
        return CharacterType::AlphaLetter;
    }

    if is_han(code) {
        CharacterType::HanLetter
    } else if (0x30A0..=0x30FF).contains(&code) {
        CharacterType::KatakanaLetter
    } else if (0x3040..=0x309F).contains(&code) {
        CharacterType::HiraganaLetter
    } else if (0xFF60..=0xFF9F).contains(&code) {
        CharacterType::HalfwidthKatakanaLetter
    } else {
        CharacterType::AlphaLetter
    }
}

fn is_han(code: u32) -> bool {
    matches!(
        code,
        0x3400..=0x9FFF       // CJK Unified Ideographs and Extension A
        | 0xF900..=0xFAFF     // CJK Compatibility Ideographs
        | 0x20000..=0x323AF   // Extensions B through H, compatibility supplement
    )
}

/// Check if a character ends a line without implying a word break.
///
/// Ideographs, ideographic iteration/number marks, Hiragana and Katakana.
pub fn is_ideographic(c: char) -> bool {
    let code = c as u32;
    is_han(code)
        || matches!(
            code,
            0x3006..=0x3007     // IDEOGRAPHIC CLOSING MARK, NUMBER ZERO
            | 0x3021..=0x3029   // HANGZHOU NUMERALS
            | 0x3038..=0x303A   // HANGZHOU NUMERALS TEN..THIRTY
            | 0x3040..=0x30FF   // Hiragana, Katakana
            | 0x16FE4           // KHITAN SMALL SCRIPT FILLER
            | 0x17000..=0x18CFF // Tangut, Khitan
            | 0x18D00..=0x18D08 // Tangut supplement
            | 0x1B170..=0x1B2FB // Nushu
        )
}

/// Kana voicing marks (combining dakuten and handakuten).
pub fn is_kana_voicing_mark(c: char) -> bool {
    matches!(c, '\u{3099}' | '\u{309A}')
}

/// Combining marks that change the identity of a letter and therefore are
/// never stripped: Kana voicing marks, viramas and a few Tibetan and Telugu
/// vowel signs.
pub fn is_significant_mark(c: char) -> bool {
    matches!(
        c as u32,
        0x3099 | 0x309A
        // Viramas
        | 0x094D | 0x09CD | 0x0A4D | 0x0ACD | 0x0B4D | 0x0BCD | 0x0C4D | 0x0CCD
        | 0x0D3B | 0x0D3C | 0x0D4D | 0x0DCA | 0x0E3A | 0x0EBA | 0x0F84 | 0x1039
        | 0x103A | 0x1714 | 0x1734 | 0x17D2 | 0x1A60 | 0x1B44 | 0x1BAA | 0x1BAB
        | 0x1BF2 | 0x1BF3 | 0x2D7F | 0xA806 | 0xA82C | 0xA8C4 | 0xA953 | 0xA9C0
        | 0xAAF6 | 0xABED
        | 0x0C56
        | 0x0F71 | 0x0F72 | 0x0F74 | 0x0F7A..=0x0F7D | 0x0F80
    )
}

/// Combining marks that are removed from normalized text.
pub fn is_diacritic(c: char) -> bool {
    is_combining_mark(c) && !is_significant_mark(c)
}

/// Literal replacement for typographic punctuation and vulgar fractions.
pub fn punctuation_replacement(c: char) -> Option<&'static str> {
    match c {
        '\u{2010}' => Some("-"),                                        // HYPHEN
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => Some("'"), // single quotes
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => Some("\""), // double quotes
        '\u{00BC}' => Some("1/4"),
        '\u{00BD}' => Some("1/2"),
        '\u{00BE}' => Some("3/4"),
        _ => None,
    }
}
