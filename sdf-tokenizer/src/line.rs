use sdf_common::{Field, ParseError, Position, TextSlice};

/// What a fixed-width read does when the line ends before the requested
/// column range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPolicy {
    /// Clamp the range to the line. Missing columns read as an empty field,
    /// which numeric readers of optional columns treat as zero.
    #[default]
    ZeroFill,
    /// Fail with `TruncatedField` unless the whole range is present.
    Strict,
}

/// One logical line of input, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: TextSlice,
    position: Position,
}

impl Line {
    pub fn new(text: TextSlice, position: Position) -> Self {
        Self { text, position }
    }

    pub fn text(&self) -> &TextSlice {
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 1-based line number in the input.
    pub fn number(&self) -> usize {
        self.position.line
    }

    /// Position of the first character of the line.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.text.starts_with(prefix)
    }

    /// Length of the line in characters.
    pub fn char_len(&self) -> usize {
        if self.text.is_ascii() {
            self.text.len()
        } else {
            self.text.chars().count()
        }
    }

    /// Position of the character starting at byte `index` of the line.
    pub fn position_at(&self, index: usize) -> Position {
        let chars = if self.text.is_ascii() {
            index
        } else {
            self.text[..index].chars().count()
        };
        self.position.shifted(chars, index)
    }

    /// Byte index of character column `column` (0-based), clamped to the line.
    fn byte_index(&self, column: usize) -> usize {
        if self.text.is_ascii() {
            return column.min(self.text.len());
        }
        self.text
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Cuts the character range `start..end` (0-based, end exclusive) out of
    /// the line and trims it.
    pub fn fixed_field(
        &self,
        start: usize,
        end: usize,
        field: &'static str,
        policy: FieldPolicy,
    ) -> Result<Field, ParseError> {
        if policy == FieldPolicy::Strict && self.char_len() < end {
            return Err(ParseError::TruncatedField {
                field,
                position: self.position.shifted(start, start),
            });
        }
        let from = self.byte_index(start);
        let to = self.byte_index(end);
        let position = self.position_at(from);
        Ok(Field::new(self.text.slice(from, to).trim(), position))
    }

    /// Whitespace-delimited tokens of the line.
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            line: self,
            index: 0,
        }
    }

    /// Text after `prefix` if the line starts with it.
    pub fn strip_prefix(&self, prefix: &str) -> Option<TextSlice> {
        self.text
            .starts_with(prefix)
            .then(|| self.text.slice(prefix.len(), self.text.len()))
    }
}

/// Iterator over the whitespace-delimited tokens of a [`Line`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    line: &'a Line,
    index: usize,
}

impl<'a> Tokens<'a> {
    /// Byte offset into the line where the next token search starts.
    pub fn offset(&self) -> usize {
        self.index
    }
}

impl Iterator for Tokens<'_> {
    type Item = Field;

    fn next(&mut self) -> Option<Self::Item> {
        let (field, next) = token_at(self.line, self.index)?;
        self.index = next;
        Some(field)
    }
}

/// Reads the token starting at or after byte `from`, returning it with the
/// byte offset just past it.
pub(crate) fn token_at(line: &Line, from: usize) -> Option<(Field, usize)> {
    let text = line.as_str();
    let rest = text.get(from..)?;
    let skipped = rest.len() - rest.trim_start().len();
    let start = from + skipped;
    if start >= text.len() {
        return None;
    }
    let len = text[start..]
        .find(char::is_whitespace)
        .unwrap_or(text.len() - start);
    let end = start + len;
    let field = Field::new(line.text.slice(start, end), line.position_at(start));
    Some((field, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Line {
        Line::new(TextSlice::owned(text), Position::line_start(4, 100))
    }

    const ATOM: &str = "    0.0000    0.8250    0.0000 O   0  5  0  0  0  0  0  0  0  0  0  0";

    #[test]
    fn test_fixed_field_trims() {
        let atom = line(ATOM);
        let y = atom.fixed_field(10, 20, "y", FieldPolicy::ZeroFill).unwrap();
        assert_eq!(y.as_str(), "0.8250");
        assert_eq!(y.position(), Position::at(4, 11, 110));
        let symbol = atom.fixed_field(31, 34, "type_symbol", FieldPolicy::ZeroFill);
        assert_eq!(symbol.unwrap().as_str(), "O");
    }

    #[test]
    fn test_fixed_field_zero_fill_past_end() {
        let short = line("  4  1  1");
        let stereo = short.fixed_field(9, 12, "stereo", FieldPolicy::ZeroFill).unwrap();
        assert!(stereo.is_empty());
        assert_eq!(stereo.parse_or_default::<i32>("stereo").unwrap(), 0);
    }

    #[test]
    fn test_fixed_field_strict_past_end() {
        let short = line("  4  1  1");
        let err = short
            .fixed_field(9, 12, "stereo", FieldPolicy::Strict)
            .unwrap_err();
        assert_eq!(err.position(), Some(Position::at(4, 10, 109)));
    }

    #[test]
    fn test_tokens_with_positions() {
        let counts = line(" 21 21  0");
        let tokens: Vec<_> = counts.tokens().collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].as_str(), "21");
        assert_eq!(tokens[1].position().column, 5);
        assert_eq!(tokens[2].as_str(), "0");
    }

    #[test]
    fn test_non_ascii_columns() {
        let text = line("ÅÅ  12");
        let field = text.fixed_field(2, 6, "n", FieldPolicy::ZeroFill).unwrap();
        assert_eq!(field.as_str(), "12");
        assert_eq!(field.position().column, 3);
    }

    #[test]
    fn test_strip_prefix() {
        let tag = line("> <DATABASE_ID>");
        assert_eq!(tag.strip_prefix("> ").unwrap(), "<DATABASE_ID>");
        assert!(tag.strip_prefix("M  ").is_none());
    }
}
