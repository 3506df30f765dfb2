use crate::Position;

/// A saved tokenizer state.
///
/// Restoring a checkpoint is the only way to un-read lines; the record parser
/// uses it to look at a line (separator, data tag) without consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Byte offset of the cursor at this checkpoint.
    offset: usize,
    /// Position of the cursor at this checkpoint.
    position: Position,
}

impl Checkpoint {
    pub fn new(offset: usize, position: Position) -> Self {
        Self { offset, position }
    }

    /// Returns the byte offset stored in this checkpoint.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the position stored in this checkpoint.
    pub fn position(&self) -> Position {
        self.position
    }
}
