use sdf_columns::{FloatColumnBuilder, IntColumnBuilder, StrColumnBuilder};
use sdf_common::{Field, ParseError, TextSlice};
use sdf_tokenizer::{FieldPolicy, Line};

use crate::model::Atoms;

/// Integer columns of a V2000 atom line:
/// `xxxxx.xxxxyyyyy.yyyyzzzzz.zzzz aaaddcccssshhhbbbvvvHHHrrriiimmmnnneee`.
/// Each entry is (name, fixed column range, whitespace token index).
const INT_FIELDS: [(&str, usize, usize, usize); 10] = [
    ("mass_difference", 34, 36, 4),
    ("charge", 36, 39, 5),
    ("stereo_parity", 39, 42, 6),
    ("hydrogen_count", 42, 45, 7),
    ("stereo_care_box", 45, 48, 8),
    ("valence", 48, 51, 9),
    ("h0_designator", 51, 54, 10),
    ("atom_atom_mapping", 60, 63, 13),
    ("inversion_retention", 63, 66, 14),
    ("exact_change", 66, 69, 15),
];

/// One decoded atom line.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub type_symbol: TextSlice,
    pub ints: [i32; 10],
}

impl AtomRow {
    /// Decodes the column-aligned layout.
    pub fn fixed(line: &Line, policy: FieldPolicy) -> Result<Self, ParseError> {
        let coordinate = |start, name| -> Result<f64, ParseError> {
            line.fixed_field(start, start + 10, name, policy)?.parse_finite(name)
        };
        let x = coordinate(0, "x")?;
        let y = coordinate(10, "y")?;
        let z = coordinate(20, "z")?;
        let symbol = line.fixed_field(31, 34, "type_symbol", policy)?;
        if symbol.is_empty() && policy == FieldPolicy::Strict {
            return Err(ParseError::TruncatedField {
                field: "type_symbol",
                position: symbol.position(),
            });
        }
        let mut ints = [0; 10];
        for (slot, (name, start, end, _)) in ints.iter_mut().zip(INT_FIELDS) {
            *slot = line
                .fixed_field(start, end, name, policy)?
                .parse_or_default(name)?;
        }
        Ok(Self {
            x,
            y,
            z,
            type_symbol: symbol.into_text(),
            ints,
        })
    }

    /// Decodes a line whose fields are separated by whitespace but not
    /// aligned to the V2000 columns.
    pub fn whitespace(line: &Line) -> Result<Self, ParseError> {
        let tokens: Vec<Field> = line.tokens().collect();
        let missing = |name| ParseError::TruncatedField {
            field: name,
            position: line.position_at(line.as_str().len()),
        };
        let coordinate = |index: usize, name| -> Result<f64, ParseError> {
            tokens.get(index).ok_or_else(|| missing(name))?.parse_finite(name)
        };
        let x = coordinate(0, "x")?;
        let y = coordinate(1, "y")?;
        let z = coordinate(2, "z")?;
        let symbol = tokens.get(3).ok_or_else(|| missing("type_symbol"))?;
        let mut ints = [0; 10];
        for (slot, (name, _, _, index)) in ints.iter_mut().zip(INT_FIELDS) {
            if let Some(token) = tokens.get(index) {
                *slot = token.parse(name)?;
            }
        }
        Ok(Self {
            x,
            y,
            z,
            type_symbol: symbol.text().clone(),
            ints,
        })
    }
}

/// Accumulates the atom block of one record.
#[derive(Debug)]
pub struct AtomBlockBuilder {
    x: FloatColumnBuilder,
    y: FloatColumnBuilder,
    z: FloatColumnBuilder,
    type_symbol: StrColumnBuilder,
    ints: [IntColumnBuilder; 10],
    shifted_lines: usize,
}

impl AtomBlockBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: FloatColumnBuilder::with_capacity("x", capacity),
            y: FloatColumnBuilder::with_capacity("y", capacity),
            z: FloatColumnBuilder::with_capacity("z", capacity),
            type_symbol: StrColumnBuilder::interned_with_capacity("type_symbol", capacity),
            ints: INT_FIELDS.map(|(name, ..)| IntColumnBuilder::with_capacity(name, capacity)),
            shifted_lines: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Lines that had to be read with the whitespace layout.
    pub fn shifted_lines(&self) -> usize {
        self.shifted_lines
    }

    /// Decodes a V2000 atom line. With `lenient` set, a line that does not
    /// fit the fixed columns is retried as whitespace-separated tokens; the
    /// fixed-width error is reported if both fail.
    pub fn push_line(
        &mut self,
        line: &Line,
        policy: FieldPolicy,
        lenient: bool,
    ) -> Result<(), ParseError> {
        let row = match AtomRow::fixed(line, policy) {
            Ok(row) => row,
            Err(err) if lenient => {
                let row = AtomRow::whitespace(line).map_err(|_| err)?;
                self.shifted_lines += 1;
                row
            }
            Err(err) => return Err(err),
        };
        self.push_row(row)
    }

    pub fn push_row(&mut self, row: AtomRow) -> Result<(), ParseError> {
        self.x.push(row.x)?;
        self.y.push(row.y)?;
        self.z.push(row.z)?;
        self.type_symbol.push(row.type_symbol)?;
        for (builder, value) in self.ints.iter_mut().zip(row.ints) {
            builder.push(value)?;
        }
        Ok(())
    }

    /// Parses a coordinate straight into its column; used by V3000 lines.
    pub fn push_coordinates(&mut self, x: &Field, y: &Field, z: &Field) -> Result<(), ParseError> {
        let values = [x.parse_finite("x")?, y.parse_finite("y")?, z.parse_finite("z")?];
        self.x.push(values[0])?;
        self.y.push(values[1])?;
        self.z.push(values[2])?;
        Ok(())
    }

    pub fn push_symbol(&mut self, symbol: &Field) -> Result<(), ParseError> {
        self.type_symbol.push_field(symbol)
    }

    /// Pushes one value per integer column, in [`Atoms::COLUMNS`] order.
    pub fn push_ints(&mut self, values: [i32; 10]) -> Result<(), ParseError> {
        for (builder, value) in self.ints.iter_mut().zip(values) {
            builder.push(value)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<Atoms, ParseError> {
        let count = self.len();
        let [mass_difference, charge, stereo_parity, hydrogen_count, stereo_care_box, valence, h0_designator, atom_atom_mapping, inversion_retention, exact_change] =
            self.ints.each_mut().map(|builder| builder.freeze());
        Ok(Atoms {
            count,
            x: self.x.freeze()?,
            y: self.y.freeze()?,
            z: self.z.freeze()?,
            type_symbol: self.type_symbol.freeze()?,
            mass_difference: mass_difference?,
            charge: charge?,
            stereo_parity: stereo_parity?,
            hydrogen_count: hydrogen_count?,
            stereo_care_box: stereo_care_box?,
            valence: valence?,
            h0_designator: h0_designator?,
            atom_atom_mapping: atom_atom_mapping?,
            inversion_retention: inversion_retention?,
            exact_change: exact_change?,
        })
    }
}

/// Index of an integer column, for V3000 keyword mapping.
pub(crate) fn int_column(name: &str) -> Option<usize> {
    INT_FIELDS.iter().position(|(field, ..)| *field == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdf_common::{ErrorKind, Position};

    fn line(text: &str) -> Line {
        Line::new(TextSlice::owned(text), Position::line_start(5, 0))
    }

    #[test]
    fn test_fixed_atom_line() {
        let row = AtomRow::fixed(
            &line("    0.0000    0.8250    0.0000 O   0  5  0  0  0  0  0  0  0  0  0  0"),
            FieldPolicy::ZeroFill,
        )
        .unwrap();
        assert_eq!((row.x, row.y, row.z), (0.0, 0.825, 0.0));
        assert_eq!(row.type_symbol, "O");
        assert_eq!(row.ints[1], 5);
    }

    #[test]
    fn test_truncated_atom_line_zero_fills() {
        let row = AtomRow::fixed(
            &line("    1.2333    0.5540    0.7792 O"),
            FieldPolicy::ZeroFill,
        )
        .unwrap();
        assert_eq!(row.ints, [0; 10]);
    }

    #[test]
    fn test_missing_symbol_zero_fills() {
        let coordinates_only = line("    1.0000    2.0000    3.0000");
        let row = AtomRow::fixed(&coordinates_only, FieldPolicy::ZeroFill).unwrap();
        assert_eq!((row.x, row.y, row.z), (1.0, 2.0, 3.0));
        assert_eq!(row.type_symbol, "");
        assert_eq!(row.ints, [0; 10]);

        let mut block = AtomBlockBuilder::with_capacity(1);
        block.push_line(&coordinates_only, FieldPolicy::ZeroFill, true).unwrap();
        assert_eq!(block.shifted_lines(), 0);
        assert_eq!(block.finish().unwrap().type_symbol.value(0), "");

        let err = AtomRow::fixed(&coordinates_only, FieldPolicy::Strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedField);
    }

    #[test]
    fn test_non_finite_coordinate_is_malformed() {
        let mut block = AtomBlockBuilder::with_capacity(1);
        let err = block
            .push_line(&line("       NaN    0.0000    0.0000 C   0  0"), FieldPolicy::ZeroFill, true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
        assert_eq!(err.position(), Some(Position::at(5, 1, 0)));
        assert!(block.is_empty());
    }

    #[test]
    fn test_shifted_atom_line_falls_back() {
        let shifted = line("  0.0000    0.8250    0.0000 O   0  5  0  0  0  0  0  0  0  0  0  0");
        assert!(AtomRow::fixed(&shifted, FieldPolicy::ZeroFill).is_err());

        let mut block = AtomBlockBuilder::with_capacity(1);
        block.push_line(&shifted, FieldPolicy::ZeroFill, true).unwrap();
        assert_eq!(block.shifted_lines(), 1);
        let atoms = block.finish().unwrap();
        assert_eq!(atoms.type_symbol.value(0), "O");
        assert_eq!(atoms.y.value(0), 0.825);
        assert_eq!(atoms.charge.value(0), 5);
    }

    #[test]
    fn test_bad_coordinate_reports_fixed_error() {
        let bad = line("    0.0000    abcdef    0.0000 O   0  0");
        let mut block = AtomBlockBuilder::with_capacity(1);
        let err = block.push_line(&bad, FieldPolicy::ZeroFill, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
        assert_eq!(err.position(), Some(Position::at(5, 11, 10)));
        assert!(block.is_empty());
    }

    #[test]
    fn test_blank_atom_line() {
        let mut block = AtomBlockBuilder::with_capacity(1);
        let err = block.push_line(&line(""), FieldPolicy::ZeroFill, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
    }
}
