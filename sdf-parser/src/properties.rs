use log::{trace, warn};
use sdf_columns::IntColumnBuilder;
use sdf_common::{Field, ParseError};
use sdf_tokenizer::{FieldPolicy, Line, LineContext};

use crate::model::{AtomProperty, Properties};
use crate::options::ParserOptions;

/// `M  XXX` tags defined by the V2000 format. Anything else is a future or
/// vendor extension.
const KNOWN_TAGS: &[&str] = &[
    "AAL", "ALS", "APO", "CHG", "CRS", "ISO", "LIN", "LOG", "RAD", "RBC", "REG", "RGP", "SAL",
    "SAP", "SBL", "SBT", "SBV", "SCL", "SCN", "SDD", "SDI", "SDS", "SDT", "SED", "SLB", "SMT",
    "SNC", "SPA", "SPL", "SST", "STY", "SUB", "UNS", "V30", "$3D",
];

/// Builder for one `{atom_index, value}` property table.
#[derive(Debug)]
pub struct AtomPropertyBuilder {
    atom_index: IntColumnBuilder,
    value: IntColumnBuilder,
}

impl AtomPropertyBuilder {
    pub fn new(value: &'static str) -> Self {
        Self {
            atom_index: IntColumnBuilder::new("atom_index"),
            value: IntColumnBuilder::new(value),
        }
    }

    pub fn len(&self) -> usize {
        self.atom_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_index.is_empty()
    }

    pub fn push(&mut self, atom_index: i32, value: i32) -> Result<(), ParseError> {
        self.atom_index.push(atom_index)?;
        self.value.push(value)
    }

    /// Decodes `M  XXXnn8 aaa vvv ...`: an entry count followed by that many
    /// atom / value pairs.
    pub fn push_line(&mut self, line: &Line) -> Result<(), ParseError> {
        let mut tokens = line.tokens().skip(2);
        let truncated = |field| ParseError::TruncatedField {
            field,
            position: line.position_at(line.as_str().len()),
        };
        let count: usize = tokens.next().ok_or_else(|| truncated("entry count"))?.parse("entry count")?;
        for _ in 0..count {
            let atom = tokens.next().ok_or_else(|| truncated("atom_index"))?;
            let value = tokens.next().ok_or_else(|| truncated(self.value.name()))?;
            self.push_fields(&atom, &value)?;
        }
        Ok(())
    }

    fn push_fields(&mut self, atom: &Field, value: &Field) -> Result<(), ParseError> {
        let atom_index = atom.parse("atom_index")?;
        let value = value.parse(self.value.name())?;
        self.push(atom_index, value)
    }

    pub fn finish(mut self) -> Result<AtomProperty, ParseError> {
        Ok(AtomProperty {
            count: self.len(),
            atom_index: self.atom_index.freeze()?,
            value: self.value.freeze()?,
        })
    }
}

/// Accumulates the property block of one record.
#[derive(Debug)]
pub struct PropertyBlockBuilder {
    pub charges: AtomPropertyBuilder,
    pub isotopes: AtomPropertyBuilder,
    pub radicals: AtomPropertyBuilder,
    pub attachment_points: AtomPropertyBuilder,
    skipped: usize,
}

impl Default for PropertyBlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyBlockBuilder {
    pub fn new() -> Self {
        Self {
            charges: AtomPropertyBuilder::new("charge"),
            isotopes: AtomPropertyBuilder::new("mass"),
            radicals: AtomPropertyBuilder::new("radical"),
            attachment_points: AtomPropertyBuilder::new("attachment_point"),
            skipped: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Reads property lines up to and including `M  END`.
    ///
    /// A data-item tag or the record separator also ends the block, without
    /// being consumed, for writers that omit `M  END`.
    pub fn read<C: LineContext>(
        &mut self,
        ctx: &mut C,
        options: &ParserOptions,
    ) -> Result<(), ParseError> {
        loop {
            let Some(line) = ctx.peek_line() else {
                return Err(ParseError::unexpected_eof("M  END", ctx.position()));
            };
            if line.starts_with(&options.data_tag_marker)
                || line.starts_with(&options.record_separator)
            {
                warn!("record ends at line {} without M  END", line.number());
                return Ok(());
            }
            ctx.next_line();

            if line.starts_with("M  ") {
                let tag = line.fixed_field(3, 6, "property tag", FieldPolicy::ZeroFill)?;
                if self.read_property(&line, &tag, options)? {
                    return Ok(());
                }
            } else if line.starts_with("A  ") || line.starts_with("G  ") {
                // alias and group abbreviation lines carry their text on the next line
                ctx.next_line();
                self.skip(&line, 2);
            } else if line.starts_with("S  SKP") {
                let count = line
                    .tokens()
                    .nth(2)
                    .map(|field| field.parse::<usize>("skip count"))
                    .transpose()?
                    .unwrap_or(0);
                for _ in 0..count {
                    ctx.next_line();
                }
                self.skip(&line, count + 1);
            } else {
                self.skip(&line, 1);
            }
        }
    }

    /// Handles one `M  XXX` line. Returns true on `M  END`.
    fn read_property(
        &mut self,
        line: &Line,
        tag: &Field,
        options: &ParserOptions,
    ) -> Result<bool, ParseError> {
        match tag.as_str() {
            "END" => return Ok(true),
            "CHG" => self.charges.push_line(line)?,
            "ISO" => self.isotopes.push_line(line)?,
            "RAD" => self.radicals.push_line(line)?,
            "APO" => self.attachment_points.push_line(line)?,
            other if options.strict_properties && !KNOWN_TAGS.contains(&other) => {
                return Err(ParseError::UnknownProperty {
                    tag: other.to_string(),
                    position: tag.position(),
                });
            }
            _ => self.skip(line, 1),
        }
        Ok(false)
    }

    fn skip(&mut self, line: &Line, lines: usize) {
        trace!("skipping property line {}: {}", line.number(), line.as_str());
        self.skipped += lines;
    }

    pub fn finish(self) -> Result<Properties, ParseError> {
        Ok(Properties {
            charges: self.charges.finish()?,
            isotopes: self.isotopes.finish()?,
            radicals: self.radicals.finish()?,
            attachment_points: self.attachment_points.finish()?,
            skipped: self.skipped,
        })
    }
}
