use std::borrow::Cow;

use sdf_common::{Checkpoint, ParseError, Position};

use crate::line::Line;
use crate::tokenizer::Tokenizer;

/// Access to a line tokenizer for the block readers.
///
/// Block readers are generic over this trait rather than tied to
/// [`Tokenizer`], so a driver can wrap the tokenizer with its own bookkeeping
/// and still hand itself to the readers.
pub trait LineContext {
    /// Returns a reference to the tokenizer.
    fn tokenizer(&self) -> &Tokenizer;

    /// Returns a mutable reference to the tokenizer.
    fn tokenizer_mut(&mut self) -> &mut Tokenizer;

    /// Returns the current position.
    fn position(&self) -> Position {
        self.tokenizer().position()
    }

    /// Returns true if at end of input.
    fn is_eof(&self) -> bool {
        self.tokenizer().is_eof()
    }

    /// Looks at the next line without consuming it.
    fn peek_line(&self) -> Option<Line> {
        self.tokenizer().peek_line()
    }

    /// Consumes the next line if there is one.
    fn next_line(&mut self) -> Option<Line> {
        self.tokenizer_mut().next_line()
    }

    /// Consumes the next line, failing with `UnexpectedEof` at end of input.
    fn read_line(&mut self, expected: impl Into<Cow<'static, str>>) -> Result<Line, ParseError> {
        self.tokenizer_mut().read_line(expected)
    }

    /// Creates a checkpoint of the current state.
    fn checkpoint(&self) -> Checkpoint {
        self.tokenizer().checkpoint()
    }

    /// Restores the tokenizer to a checkpoint.
    fn restore(&mut self, checkpoint: Checkpoint) {
        self.tokenizer_mut().restore(checkpoint);
    }
}

/// A context that owns nothing but the tokenizer.
#[derive(Debug, Clone)]
pub struct DefaultContext {
    tokenizer: Tokenizer,
}

impl DefaultContext {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn into_tokenizer(self) -> Tokenizer {
        self.tokenizer
    }
}

impl From<&str> for DefaultContext {
    fn from(value: &str) -> Self {
        Self::new(Tokenizer::new(value))
    }
}

impl LineContext for DefaultContext {
    fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn tokenizer_mut(&mut self) -> &mut Tokenizer {
        &mut self.tokenizer
    }
}
