//! Translation of normalized-text offsets back to original-text offsets.
//!
//! The map is a sorted list of `(normalized_index, shift)` breakpoints. For a
//! normalized index `i`, the original index is `i + shift` where `shift` comes
//! from the last breakpoint whose `normalized_index <= i`.
//!
//! ```
//! use pdf_finder::text::normalize;
//!
//! let normalized = normalize("cof-\nfee");
//! assert_eq!(normalized.text, "coffee");
//! // the second 'f' sits after the removed "-\n"
//! assert_eq!(normalized.offsets.original_index(3), 5);
//! ```
//!
//! Offsets count Unicode scalar values, not bytes.

/// A single breakpoint of an [`OffsetMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// First normalized index this shift applies to
    pub normalized_index: usize,
    /// original index - normalized index
    pub shift: isize,
}

impl Breakpoint {
    fn new(normalized_index: usize, shift: isize) -> Self {
        Self {
            normalized_index,
            shift,
        }
    }
}

/// Monotonic map from normalized offsets to original offsets.
///
/// Invariants: breakpoints are strictly increasing by `normalized_index`, the
/// first one is at index 0 and the last one is the terminal breakpoint at the
/// normalized text length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetMap {
    breakpoints: Vec<Breakpoint>,
}

impl OffsetMap {
    /// Map for a text that was not changed by normalization.
    pub fn identity(len: usize) -> Self {
        let mut builder = OffsetMapBuilder::new();
        for index in 0..len {
            builder.push(index);
        }
        builder.finish(len)
    }

    /// All breakpoints, terminal one included.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Length of the normalized text.
    pub fn normalized_len(&self) -> usize {
        self.breakpoints
            .last()
            .map(|b| b.normalized_index)
            .unwrap_or(0)
    }

    /// Length of the original text.
    pub fn original_len(&self) -> usize {
        self.original_index(self.normalized_len())
    }

    /// Original index of a normalized index.
    ///
    /// Indices past the end are clamped to the end of the text.
    pub fn original_index(&self, normalized: usize) -> usize {
        let normalized = normalized.min(self.normalized_len());
        let pos = self
            .breakpoints
            .partition_point(|b| b.normalized_index <= normalized);
        let shift = match pos.checked_sub(1) {
            Some(i) => self.breakpoints[i].shift,
            None => 0,
        };
        (normalized as isize + shift).max(0) as usize
    }

    /// Original `[begin, end)` range of a normalized `[begin, end)` range.
    ///
    /// The end is taken from the last covered character, so a range ending in
    /// the middle of an expansion (e.g. `1/` out of `½`) still covers the
    /// whole source character.
    pub fn original_range(&self, begin: usize, end: usize) -> (usize, usize) {
        let original_begin = self.original_index(begin);
        if end <= begin {
            return (original_begin, original_begin);
        }
        let original_end = self.original_index(end - 1) + 1;
        (original_begin, original_end.max(original_begin))
    }

    /// Smallest normalized index whose original index is `>= original`.
    ///
    /// Returns the normalized length when `original` is past the last
    /// character.
    pub fn normalized_index(&self, original: usize) -> usize {
        let (mut lo, mut hi) = (0, self.normalized_len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.original_index(mid) < original {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

/// Incremental construction of an [`OffsetMap`], one normalized char at a time.
#[derive(Debug)]
pub(crate) struct OffsetMapBuilder {
    breakpoints: Vec<Breakpoint>,
    produced: usize,
    last_original: usize,
}

impl OffsetMapBuilder {
    pub(crate) fn new() -> Self {
        Self {
            breakpoints: vec![Breakpoint::new(0, 0)],
            produced: 0,
            last_original: 0,
        }
    }

    /// Record that the next normalized char comes from `original`.
    ///
    /// Originals are clamped to be non-decreasing.
    pub(crate) fn push(&mut self, original: usize) {
        let original = original.max(self.last_original);
        self.last_original = original;
        let shift = original as isize - self.produced as isize;
        self.set_shift(self.produced, shift);
        self.produced += 1;
    }

    fn set_shift(&mut self, at: usize, shift: isize) {
        match self.breakpoints.last_mut() {
            Some(last) if last.shift == shift => {}
            Some(last) if last.normalized_index == at => last.shift = shift,
            _ => self.breakpoints.push(Breakpoint::new(at, shift)),
        }
    }

    /// Append the terminal breakpoint mapping the normalized end to the
    /// original end.
    pub(crate) fn finish(mut self, original_len: usize) -> OffsetMap {
        let shift = original_len as isize - self.produced as isize;
        match self.breakpoints.last_mut() {
            Some(last) if last.normalized_index == self.produced => last.shift = shift,
            _ => self
                .breakpoints
                .push(Breakpoint::new(self.produced, shift)),
        }
        OffsetMap {
            breakpoints: self.breakpoints,
        }
    }
}
