use std::str::FromStr;

use sdf_common::{Field, ParseError, TextSlice};

use crate::column::{Column, StrColumn};
use crate::intern::Interner;

/// Upper bound on the rows reserved up front. Declared counts come from the
/// input, so anything past this grows on push instead.
pub const MAX_RESERVED_ROWS: usize = 4096;

fn reserved<T>(capacity: usize) -> Vec<T> {
    Vec::with_capacity(capacity.min(MAX_RESERVED_ROWS))
}

/// Growable accumulator for a numeric column.
///
/// Text is parsed on push; a field that does not parse is a
/// `MalformedNumber` error, never a silent zero. After
/// [`freeze`](Self::freeze) every further push fails with `UseAfterFreeze`.
#[derive(Debug, Clone)]
pub struct NumericBuilder<T> {
    name: &'static str,
    values: Vec<T>,
    frozen: bool,
}

pub type IntColumnBuilder = NumericBuilder<i32>;
pub type FloatColumnBuilder = NumericBuilder<f64>;

impl<T> NumericBuilder<T>
where
    T: FromStr + Default + Copy,
{
    pub fn new(name: &'static str) -> Self {
        Self::with_capacity(name, 0)
    }

    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            values: reserved(capacity),
            frozen: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Rows the builder holds room for without reallocating.
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    fn check_open(&self) -> Result<(), ParseError> {
        if self.frozen {
            return Err(ParseError::UseAfterFreeze { column: self.name });
        }
        Ok(())
    }

    pub fn push(&mut self, value: T) -> Result<(), ParseError> {
        self.check_open()?;
        self.values.push(value);
        Ok(())
    }

    /// Parses a required field.
    pub fn push_field(&mut self, field: &Field) -> Result<(), ParseError> {
        self.check_open()?;
        let value = field.parse(self.name)?;
        self.values.push(value);
        Ok(())
    }

    /// Parses an optional field; an empty field stores zero.
    pub fn push_field_or_zero(&mut self, field: &Field) -> Result<(), ParseError> {
        self.check_open()?;
        let value = field.parse_or_default(self.name)?;
        self.values.push(value);
        Ok(())
    }

    /// Freezes the accumulated values into an immutable column.
    pub fn freeze(&mut self) -> Result<Column<T>, ParseError> {
        self.check_open()?;
        self.frozen = true;
        Ok(Column::new(self.name, std::mem::take(&mut self.values)))
    }
}

#[derive(Debug, Clone)]
enum StrBuffer {
    Sliced(Vec<TextSlice>),
    Interned { interner: Interner, codes: Vec<u32> },
}

/// Growable accumulator for a string column.
///
/// A *sliced* builder keeps views into the input; an *interned* builder
/// stores each distinct value once, which suits low-cardinality columns such
/// as element symbols.
#[derive(Debug, Clone)]
pub struct StrColumnBuilder {
    name: &'static str,
    buffer: StrBuffer,
    frozen: bool,
}

impl StrColumnBuilder {
    pub fn sliced(name: &'static str) -> Self {
        Self::sliced_with_capacity(name, 0)
    }

    pub fn sliced_with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            buffer: StrBuffer::Sliced(reserved(capacity)),
            frozen: false,
        }
    }

    pub fn interned(name: &'static str) -> Self {
        Self::interned_with_capacity(name, 0)
    }

    pub fn interned_with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            buffer: StrBuffer::Interned {
                interner: Interner::new(),
                codes: reserved(capacity),
            },
            frozen: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        match &self.buffer {
            StrBuffer::Sliced(values) => values.len(),
            StrBuffer::Interned { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn push(&mut self, value: TextSlice) -> Result<(), ParseError> {
        if self.frozen {
            return Err(ParseError::UseAfterFreeze { column: self.name });
        }
        match &mut self.buffer {
            StrBuffer::Sliced(values) => values.push(value),
            StrBuffer::Interned { interner, codes } => codes.push(interner.intern(&value)),
        }
        Ok(())
    }

    pub fn push_field(&mut self, field: &Field) -> Result<(), ParseError> {
        self.push(field.text().clone())
    }

    pub fn freeze(&mut self) -> Result<StrColumn, ParseError> {
        if self.frozen {
            return Err(ParseError::UseAfterFreeze { column: self.name });
        }
        self.frozen = true;
        let buffer = std::mem::replace(&mut self.buffer, StrBuffer::Sliced(Vec::new()));
        Ok(match buffer {
            StrBuffer::Sliced(values) => StrColumn::sliced(self.name, values),
            StrBuffer::Interned { interner, codes } => {
                StrColumn::interned(self.name, interner.into_symbols(), codes)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdf_common::{ErrorKind, Position};

    fn field(text: &str) -> Field {
        Field::new(TextSlice::owned(text), Position::at(5, 1, 0))
    }

    #[test]
    fn test_push_parses_text() {
        let mut x = FloatColumnBuilder::new("x");
        x.push_field(&field("-0.8250")).unwrap();
        x.push(1.5).unwrap();
        let column = x.freeze().unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column.value(0), -0.825);
        assert_eq!(column.value(1), 1.5);
    }

    #[test]
    fn test_malformed_number_is_not_coerced() {
        let mut order = IntColumnBuilder::new("order");
        let err = order.push_field(&field("1.5")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
        assert!(order.is_empty());
    }

    #[test]
    fn test_optional_empty_field_is_zero() {
        let mut charge = IntColumnBuilder::new("charge");
        charge.push_field_or_zero(&field("")).unwrap();
        assert!(charge.push_field(&field("")).is_err());
        assert_eq!(charge.freeze().unwrap().as_slice(), &[0]);
    }

    #[test]
    fn test_push_after_freeze() {
        let mut x = FloatColumnBuilder::new("x");
        x.freeze().unwrap();
        let err = x.push(0.0).unwrap_err();
        assert_eq!(err, ParseError::UseAfterFreeze { column: "x" });
        assert!(x.freeze().is_err());
    }

    #[test]
    fn test_interned_strings() {
        let mut symbols = StrColumnBuilder::interned("type_symbol");
        for symbol in ["O", "O", "P", "O"] {
            symbols.push(TextSlice::owned(symbol)).unwrap();
        }
        let column = symbols.freeze().unwrap();
        assert_eq!(column.len(), 4);
        assert_eq!(column.value(2), "P");
        assert_eq!(column.distinct(), Some(2));
        assert!(symbols.push(TextSlice::owned("C")).is_err());
    }

    #[test]
    fn test_sliced_strings_keep_views() {
        let mut data = StrColumnBuilder::sliced("data");
        data.push(TextSlice::owned("1\n11\n10")).unwrap();
        let column = data.freeze().unwrap();
        assert_eq!(column.value(0), "1\n11\n10");
        assert_eq!(column.distinct(), None);
        assert_eq!(column.get(1), None);
    }
}
