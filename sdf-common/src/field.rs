use std::str::FromStr;

use crate::{ParseError, Position, TextSlice};

/// One field cut out of a line, already trimmed.
///
/// `position` points at the first column of the field's source range (not at
/// the first non-blank character) so errors line up with the format's column
/// layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    text: TextSlice,
    position: Position,
}

impl Field {
    pub fn new(text: TextSlice, position: Position) -> Self {
        Self { text, position }
    }

    pub fn text(&self) -> &TextSlice {
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> TextSlice {
        self.text
    }

    /// Parses the field as a number. Empty fields are malformed.
    pub fn parse<T: FromStr>(&self, field: &'static str) -> Result<T, ParseError> {
        self.text
            .parse::<T>()
            .map_err(|_| ParseError::malformed_number(self.as_str(), field, self.position))
    }

    /// Parses a float that must be finite; `NaN` and `inf` are malformed.
    pub fn parse_finite(&self, field: &'static str) -> Result<f64, ParseError> {
        match self.parse::<f64>(field)? {
            value if value.is_finite() => Ok(value),
            _ => Err(ParseError::malformed_number(self.as_str(), field, self.position)),
        }
    }

    /// Parses the field as a number, treating an empty field as `T::default()`.
    ///
    /// Used for the optional trailing columns that legacy writers omit.
    pub fn parse_or_default<T: FromStr + Default>(
        &self,
        field: &'static str,
    ) -> Result<T, ParseError> {
        if self.is_empty() {
            return Ok(T::default());
        }
        self.parse(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn field(text: &str) -> Field {
        Field::new(TextSlice::owned(text), Position::at(3, 11, 40))
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(field("-0.8250").parse::<f64>("y").unwrap(), -0.825);
    }

    #[test]
    fn test_parse_reports_text_and_position() {
        let err = field("0.8x5").parse::<f64>("y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
        assert_eq!(err.position(), Some(Position::at(3, 11, 40)));
        assert!(err.to_string().contains("0.8x5"));
    }

    #[test]
    fn test_non_finite_float_is_malformed() {
        for text in ["NaN", "inf", "-infinity"] {
            let err = field(text).parse_finite("x").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedNumber);
            assert!(err.to_string().contains(text));
        }
        assert_eq!(field("1e3").parse_finite("x").unwrap(), 1000.0);
    }

    #[test]
    fn test_empty_field_is_not_zero() {
        assert!(field("").parse::<i32>("charge").is_err());
        assert_eq!(field("").parse_or_default::<i32>("charge").unwrap(), 0);
    }
}
