use std::iter::FusedIterator;
use std::sync::Arc;

use sdf_common::{ParseError, Position};
use sdf_parser::{Compound, ParserOptions, RecordEnd, RecordParser};
use sdf_tokenizer::{DefaultContext, LineContext, Tokenizer};

/// Pull-based producer of records.
///
/// Each call to `next` parses exactly one record. After the first error the
/// reader is exhausted; records are never resynchronised past a bad one.
#[derive(Debug)]
pub struct SdfReader<C = DefaultContext> {
    ctx: C,
    parser: RecordParser,
    index: usize,
    finished: bool,
}

impl SdfReader<DefaultContext> {
    pub fn new(input: &str, options: ParserOptions) -> Self {
        Self::from_arc(Arc::from(input), options)
    }

    /// Reads from an already shared buffer without copying it.
    pub fn from_arc(input: Arc<str>, options: ParserOptions) -> Self {
        let tokenizer = Tokenizer::with_arc(input).with_policy(options.field_policy);
        Self::with_context(DefaultContext::new(tokenizer), options)
    }
}

impl<C: LineContext> SdfReader<C> {
    pub fn with_context(ctx: C, options: ParserOptions) -> Self {
        Self {
            ctx,
            parser: RecordParser::new(options),
            index: 0,
            finished: false,
        }
    }

    /// Start of the next unread line.
    pub fn position(&self) -> Position {
        self.ctx.position()
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.ctx.tokenizer().offset()
    }

    /// Input size in bytes.
    pub fn len(&self) -> usize {
        self.ctx.tokenizer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ctx.tokenizer().is_empty()
    }

    /// Records produced so far.
    pub fn records_read(&self) -> usize {
        self.index
    }

    pub fn into_context(self) -> C {
        self.ctx
    }
}

impl<C: LineContext> Iterator for SdfReader<C> {
    type Item = Result<Compound, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.ctx.tokenizer().rest_is_blank() {
            self.finished = true;
            return None;
        }
        match self.parser.parse(&mut self.ctx, self.index) {
            Ok((compound, end)) => {
                self.index += 1;
                self.finished = end == RecordEnd::EndOfInput;
                Some(Ok(compound))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<C: LineContext> FusedIterator for SdfReader<C> {}
