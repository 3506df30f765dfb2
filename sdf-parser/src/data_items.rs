use log::trace;
use sdf_columns::StrColumnBuilder;
use sdf_common::{ParseError, TextSlice};
use sdf_tokenizer::{Line, LineContext};

use crate::model::DataItems;
use crate::options::ParserOptions;

/// How the data-item block, and with it the record, ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEnd {
    /// The separator line was consumed.
    Separator,
    /// Input ran out first.
    EndOfInput,
}

/// Accumulates the `> <TAG>` / payload pairs of one record.
#[derive(Debug)]
pub struct DataItemBlockBuilder {
    data_header: StrColumnBuilder,
    data: StrColumnBuilder,
}

impl Default for DataItemBlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DataItemBlockBuilder {
    pub fn new() -> Self {
        Self {
            data_header: StrColumnBuilder::sliced("data_header"),
            data: StrColumnBuilder::sliced("data"),
        }
    }

    pub fn len(&self) -> usize {
        self.data_header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_header.is_empty()
    }

    /// Reads tag / payload pairs until the record separator or end of input.
    ///
    /// The block has no declared length; each payload runs until a blank
    /// line, the next tag line or the separator. Tag and separator lines are
    /// un-read through a checkpoint so the outer loop sees them.
    pub fn read<C: LineContext>(
        &mut self,
        ctx: &mut C,
        options: &ParserOptions,
    ) -> Result<RecordEnd, ParseError> {
        let separator: &str = &options.record_separator;
        let marker: &str = &options.data_tag_marker;
        while let Some(line) = ctx.next_line() {
            if is_separator(&line, separator)? {
                return Ok(RecordEnd::Separator);
            }
            match line.strip_prefix(marker) {
                Some(header) => {
                    self.data_header.push(header.trim())?;
                    let payload = read_payload(ctx, separator, marker, &line)?;
                    self.data.push(payload)?;
                }
                None if line.is_blank() => {}
                None => trace!("ignoring stray line {}: {}", line.number(), line.as_str()),
            }
        }
        Ok(RecordEnd::EndOfInput)
    }

    pub fn finish(mut self) -> Result<DataItems, ParseError> {
        Ok(DataItems {
            count: self.len(),
            data_header: self.data_header.freeze()?,
            data: self.data.freeze()?,
        })
    }
}

/// True for the separator line itself; a line that merely starts with the
/// separator is an error.
fn is_separator(line: &Line, separator: &str) -> Result<bool, ParseError> {
    if !line.starts_with(separator) {
        return Ok(false);
    }
    if line.as_str().trim_end() == separator {
        return Ok(true);
    }
    Err(ParseError::UnknownRecordSeparator {
        text: line.as_str().to_string(),
        position: line.position(),
    })
}

/// Collects the payload lines following `tag`, as one slice of the input.
fn read_payload<C: LineContext>(
    ctx: &mut C,
    separator: &str,
    marker: &str,
    tag: &Line,
) -> Result<TextSlice, ParseError> {
    let mut first: Option<Line> = None;
    let mut last: Option<Line> = None;
    loop {
        let checkpoint = ctx.checkpoint();
        let Some(line) = ctx.next_line() else {
            break;
        };
        if line.is_blank() {
            break;
        }
        if line.starts_with(separator) || line.starts_with(marker) {
            ctx.restore(checkpoint);
            break;
        }
        if first.is_none() {
            first = Some(line.clone());
        }
        last = Some(line);
    }

    let (Some(first), Some(last)) = (first, last) else {
        let end = tag.text();
        return Ok(TextSlice::empty_at(end.buffer(), end.end()));
    };
    let start = first.text();
    let payload = TextSlice::new(start.buffer(), start.start(), last.text().end());
    if payload.contains('\r') {
        return Ok(TextSlice::owned(payload.replace("\r\n", "\n")));
    }
    Ok(payload)
}
