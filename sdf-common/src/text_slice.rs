use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Immutable view into the shared input buffer.
///
/// Lines, fields and data-item payloads are all `TextSlice`s over the one
/// `Arc<str>` holding the file, so string columns never copy the input. The
/// slice derefs to `&str`.
#[derive(Clone)]
pub struct TextSlice {
    buffer: Arc<str>,
    start: usize,
    end: usize,
}

impl TextSlice {
    /// Creates a new slice from the given shared buffer and byte range.
    pub fn new(buffer: Arc<str>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= buffer.len());
        Self { buffer, start, end }
    }

    /// Creates a slice that covers the entire buffer.
    pub fn from_arc(buffer: Arc<str>) -> Self {
        let end = buffer.len();
        Self {
            buffer,
            start: 0,
            end,
        }
    }

    /// Creates a slice over a freshly allocated buffer.
    pub fn owned(text: impl Into<String>) -> Self {
        Self::from_arc(Arc::from(text.into()))
    }

    /// An empty slice positioned at `offset` in `buffer`.
    pub fn empty_at(buffer: Arc<str>, offset: usize) -> Self {
        Self::new(buffer, offset, offset)
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the slice is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the underlying shared buffer.
    pub fn buffer(&self) -> Arc<str> {
        Arc::clone(&self.buffer)
    }

    /// Returns the start offset.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the end offset.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Sub-slice by byte range relative to this slice.
    ///
    /// Both bounds are clamped to the slice, so asking for columns past the end
    /// of a short line yields an empty (or shorter) slice instead of panicking.
    pub fn slice(&self, from: usize, to: usize) -> Self {
        let len = self.len();
        let from = from.min(len);
        let to = to.clamp(from, len);
        Self::new(
            Arc::clone(&self.buffer),
            self.start + from,
            self.start + to,
        )
    }

    /// Returns the slice with leading and trailing whitespace removed.
    pub fn trim(&self) -> Self {
        let text: &str = self;
        let leading = text.len() - text.trim_start().len();
        let trailing = text.trim_end().len();
        if trailing <= leading {
            return Self::empty_at(Arc::clone(&self.buffer), self.start + leading);
        }
        self.slice(leading, trailing)
    }

    /// Returns `true` if both slices view the same allocation.
    pub fn shares_buffer(&self, other: &TextSlice) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl fmt::Debug for TextSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..{}", self.deref(), self.start, self.end)
    }
}

impl fmt::Display for TextSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl Deref for TextSlice {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.buffer[self.start..self.end]
    }
}

impl AsRef<str> for TextSlice {
    fn as_ref(&self) -> &str {
        self
    }
}

impl PartialEq<&str> for TextSlice {
    fn eq(&self, other: &&str) -> bool {
        self.deref() == *other
    }
}

impl PartialEq<TextSlice> for &str {
    fn eq(&self, other: &TextSlice) -> bool {
        *self == other.deref()
    }
}

impl PartialEq for TextSlice {
    fn eq(&self, other: &Self) -> bool {
        self.deref() == other.deref()
    }
}

impl Eq for TextSlice {}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice_of(text: &str) -> TextSlice {
        TextSlice::from_arc(Arc::from(text))
    }

    #[test]
    fn test_slice_clamps_past_end() {
        let line = slice_of("  5  4");
        assert_eq!(line.slice(3, 6), "  4");
        assert_eq!(line.slice(4, 40), " 4");
        assert_eq!(line.slice(10, 20), "");
        assert_eq!(line.slice(10, 20).start(), 6);
    }

    #[test]
    fn test_trim_keeps_buffer() {
        let line = slice_of("   O   ");
        let trimmed = line.trim();
        assert_eq!(trimmed, "O");
        assert_eq!(trimmed.start(), 3);
        assert!(trimmed.shares_buffer(&line));
    }

    #[test]
    fn test_trim_all_whitespace() {
        let trimmed = slice_of("    ").trim();
        assert!(trimmed.is_empty());
    }

    #[test]
    fn test_equality_is_by_content() {
        assert_eq!(slice_of("drugbank"), TextSlice::owned("drugbank"));
        assert_ne!(slice_of("drugbank"), TextSlice::owned("pubchem"));
    }
}
