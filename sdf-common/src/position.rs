use std::fmt;

/// A location in the input buffer.
///
/// Every line, field and error produced while reading a record carries one of
/// these so that a failure can point at the exact spot in the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, counted in characters)
    pub column: usize,
    /// Byte offset from the start of the input
    pub offset: usize,
}

impl Position {
    /// Creates a position at the start of the input.
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Creates a position with the given values.
    pub fn at(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Position of the first character of a line starting at `offset`.
    pub fn line_start(line: usize, offset: usize) -> Self {
        Self::at(line, 1, offset)
    }

    /// Moves this position `chars` characters (`bytes` bytes) to the right on
    /// the same line.
    pub fn shifted(self, chars: usize, bytes: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + chars,
            offset: self.offset + bytes,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_new() {
        let pos = Position::new();
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.offset, 0);
    }

    #[test]
    fn test_position_at() {
        let pos = Position::at(5, 10, 100);
        assert_eq!(pos.line, 5);
        assert_eq!(pos.column, 10);
        assert_eq!(pos.offset, 100);
    }

    #[test]
    fn test_position_default() {
        assert_eq!(Position::default(), Position::new());
    }

    #[test]
    fn test_position_shifted() {
        let pos = Position::line_start(4, 120).shifted(10, 10);
        assert_eq!(pos, Position::at(4, 11, 130));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::at(7, 31, 0).to_string(), "line 7, column 31");
    }
}
