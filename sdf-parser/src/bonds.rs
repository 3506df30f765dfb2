use sdf_columns::IntColumnBuilder;
use sdf_common::{Field, ParseError};
use sdf_tokenizer::{FieldPolicy, Line};

use crate::model::Bonds;

/// `111222tttsssxxxrrrccc`: (name, fixed column range, whitespace token index).
/// The first three are required.
const BOND_FIELDS: [(&str, usize, usize, usize); 6] = [
    ("atom_index_a", 0, 3, 0),
    ("atom_index_b", 3, 6, 1),
    ("order", 6, 9, 2),
    ("stereo", 9, 12, 3),
    ("topology", 15, 18, 5),
    ("reacting_center", 18, 21, 6),
];

const REQUIRED: usize = 3;

fn fixed_row(line: &Line, policy: FieldPolicy) -> Result<[i32; 6], ParseError> {
    let mut row = [0; 6];
    for (i, (name, start, end, _)) in BOND_FIELDS.into_iter().enumerate() {
        let field = line.fixed_field(start, end, name, policy)?;
        row[i] = if i < REQUIRED {
            field.parse(name)?
        } else {
            field.parse_or_default(name)?
        };
    }
    Ok(row)
}

fn whitespace_row(line: &Line) -> Result<[i32; 6], ParseError> {
    let tokens: Vec<Field> = line.tokens().collect();
    let mut row = [0; 6];
    for (i, (name, _, _, index)) in BOND_FIELDS.into_iter().enumerate() {
        match tokens.get(index) {
            Some(token) => row[i] = token.parse(name)?,
            None if i < REQUIRED => {
                return Err(ParseError::TruncatedField {
                    field: name,
                    position: line.position_at(line.as_str().len()),
                })
            }
            None => {}
        }
    }
    Ok(row)
}

/// Accumulates the bond block of one record.
#[derive(Debug)]
pub struct BondBlockBuilder {
    columns: [IntColumnBuilder; 6],
    shifted_lines: usize,
}

impl BondBlockBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: BOND_FIELDS.map(|(name, ..)| IntColumnBuilder::with_capacity(name, capacity)),
            shifted_lines: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shifted_lines(&self) -> usize {
        self.shifted_lines
    }

    /// Decodes a V2000 bond line, retrying with whitespace tokens when
    /// `lenient` is set and the fixed columns do not parse.
    pub fn push_line(
        &mut self,
        line: &Line,
        policy: FieldPolicy,
        lenient: bool,
    ) -> Result<(), ParseError> {
        let row = match fixed_row(line, policy) {
            Ok(row) => row,
            Err(err) if lenient => {
                let row = whitespace_row(line).map_err(|_| err)?;
                self.shifted_lines += 1;
                row
            }
            Err(err) => return Err(err),
        };
        self.push_row(row)
    }

    /// Pushes one value per column, in [`Bonds::COLUMNS`] order.
    pub fn push_row(&mut self, row: [i32; 6]) -> Result<(), ParseError> {
        for (builder, value) in self.columns.iter_mut().zip(row) {
            builder.push(value)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<Bonds, ParseError> {
        let count = self.len();
        let [a, b, order, stereo, topology, reacting_center] =
            self.columns.each_mut().map(|builder| builder.freeze());
        Ok(Bonds {
            count,
            atom_index_a: a?,
            atom_index_b: b?,
            order: order?,
            stereo: stereo?,
            topology: topology?,
            reacting_center: reacting_center?,
        })
    }
}
