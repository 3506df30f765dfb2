use std::borrow::Cow;
use std::sync::Arc;

use sdf_common::{Checkpoint, Field, ParseError, Position, TextSlice};

use crate::line::{token_at, FieldPolicy, Line};

/// Line-oriented cursor over the whole input.
///
/// The input is held as a shared `Arc<str>` and never modified; the tokenizer
/// only moves a byte offset forward. Lines are consumed with
/// [`read_line`](Self::read_line) / [`next_line`](Self::next_line); the last
/// consumed line becomes the *current line*, which the field primitives
/// ([`read_fixed_field`](Self::read_fixed_field),
/// [`read_token`](Self::read_token), [`skip_whitespace`](Self::skip_whitespace))
/// operate on.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    buffer: Arc<str>,
    current: usize,
    position: Position,
    line: Option<Line>,
    line_cursor: usize,
    policy: FieldPolicy,
}

impl Tokenizer {
    /// Creates a tokenizer from the input string.
    pub fn new<S: Into<String>>(input: S) -> Self {
        let owned = input.into();
        Self::with_arc(Arc::<str>::from(owned))
    }

    /// Creates a tokenizer from an existing shared buffer.
    pub fn with_arc(buffer: Arc<str>) -> Self {
        Self {
            buffer,
            current: 0,
            position: Position::new(),
            line: None,
            line_cursor: 0,
            policy: FieldPolicy::default(),
        }
    }

    /// Sets how fixed-width reads treat lines shorter than the requested range.
    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FieldPolicy {
        self.policy
    }

    /// Returns the shared input buffer.
    pub fn buffer(&self) -> Arc<str> {
        Arc::clone(&self.buffer)
    }

    /// Position of the cursor: the start of the next unread line, or the
    /// point inside the current line reached by `read_token`.
    pub fn position(&self) -> Position {
        match &self.line {
            Some(line) if self.line_cursor > 0 => line.position_at(self.line_cursor),
            _ => self.position,
        }
    }

    /// Byte offset of the next unread line.
    pub fn offset(&self) -> usize {
        self.current
    }

    /// Total input length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns true if every line has been consumed.
    pub fn is_eof(&self) -> bool {
        self.current >= self.buffer.len()
    }

    /// Returns true if nothing but whitespace is left.
    pub fn rest_is_blank(&self) -> bool {
        self.buffer[self.current..].trim().is_empty()
    }

    /// Returns the next line without consuming it.
    pub fn peek_line(&self) -> Option<Line> {
        self.scan_line().map(|(line, _)| line)
    }

    /// Consumes and returns the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> Option<Line> {
        let (line, next) = self.scan_line()?;
        self.current = next;
        self.position = Position::line_start(line.number() + 1, next);
        self.line = Some(line.clone());
        self.line_cursor = 0;
        Some(line)
    }

    /// Consumes the next line, failing with `UnexpectedEof` if there is none.
    ///
    /// `expected` names what the caller needed, e.g. `"counts line"`.
    pub fn read_line(&mut self, expected: impl Into<Cow<'static, str>>) -> Result<Line, ParseError> {
        let position = self.position;
        self.next_line()
            .ok_or_else(|| ParseError::unexpected_eof(expected, position))
    }

    /// The most recently consumed line.
    pub fn current_line(&self) -> Option<&Line> {
        self.line.as_ref()
    }

    /// Skips spaces and tabs in the current line, returning how many bytes
    /// were skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        let Some(line) = &self.line else {
            return 0;
        };
        let rest = line.as_str().get(self.line_cursor..).unwrap_or("");
        let skipped = rest.len() - rest.trim_start().len();
        self.line_cursor += skipped;
        skipped
    }

    /// Reads the next whitespace-delimited token of the current line.
    pub fn read_token(&mut self) -> Option<Field> {
        let line = self.line.as_ref()?;
        let (field, next) = token_at(line, self.line_cursor)?;
        self.line_cursor = next;
        Some(field)
    }

    /// Cuts character columns `start..end` out of the current line, following
    /// the tokenizer's [`FieldPolicy`].
    pub fn read_fixed_field(
        &self,
        start: usize,
        end: usize,
        field: &'static str,
    ) -> Result<Field, ParseError> {
        match &self.line {
            Some(line) => line.fixed_field(start, end, field, self.policy),
            None => Err(ParseError::unexpected_eof(field, self.position)),
        }
    }

    /// Resets the cursor to the beginning.
    pub fn reset(&mut self) {
        self.current = 0;
        self.position = Position::new();
        self.line = None;
        self.line_cursor = 0;
    }

    /// Creates a checkpoint that can be restored later.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.current, self.position)
    }

    /// Restores the cursor to a previous checkpoint. The current line is
    /// cleared; lines read after the checkpoint are un-read.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.current = checkpoint.offset();
        self.position = checkpoint.position();
        self.line = None;
        self.line_cursor = 0;
    }

    /// Slice of the input between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> TextSlice {
        TextSlice::new(Arc::clone(&self.buffer), start, end)
    }

    /// Finds the line starting at the cursor. Returns it along with the offset
    /// of the following line.
    fn scan_line(&self) -> Option<(Line, usize)> {
        if self.is_eof() {
            return None;
        }
        let rest = &self.buffer[self.current..];
        let (mut end, next) = match rest.find('\n') {
            Some(i) => (self.current + i, self.current + i + 1),
            None => (self.buffer.len(), self.buffer.len()),
        };
        if end > self.current && self.buffer.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        let text = TextSlice::new(Arc::clone(&self.buffer), self.current, end);
        Some((Line::new(text, self.position), next))
    }
}
