use std::borrow::Cow;
use std::fmt;
use std::result;

use thiserror::Error;

use crate::Position;

pub type Result<T, E = ParseError> = result::Result<T, E>;

/// Every way a parse invocation can fail.
///
/// All variants abort the whole parse; none is recovered from at block level.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected end of input: expected {expected} ({position})")]
    UnexpectedEof {
        expected: Cow<'static, str>,
        position: Position,
    },

    #[error("malformed number '{text}' in field {field} ({position})")]
    MalformedNumber {
        text: String,
        field: &'static str,
        position: Position,
    },

    #[error("malformed counts line '{text}' ({position})")]
    MalformedCountsLine { text: String, position: Position },

    #[error("unrecognised record separator '{text}' ({position})")]
    UnknownRecordSeparator { text: String, position: Position },

    #[error("line too short for field {field} ({position})")]
    TruncatedField {
        field: &'static str,
        position: Position,
    },

    #[error("unknown property line tag '{tag}' ({position})")]
    UnknownProperty { tag: String, position: Position },

    #[error("malformed V3000 block: {message} ({position})")]
    MalformedV3000 {
        message: Cow<'static, str>,
        position: Position,
    },

    #[error("column '{column}' was pushed to after being frozen")]
    UseAfterFreeze { column: &'static str },
}

/// Discriminant of [`ParseError`], convenient for matching in tests and
/// callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedEof,
    MalformedNumber,
    MalformedCountsLine,
    UnknownRecordSeparator,
    TruncatedField,
    UnknownProperty,
    MalformedV3000,
    UseAfterFreeze,
}

impl ParseError {
    pub fn unexpected_eof(expected: impl Into<Cow<'static, str>>, position: Position) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
            position,
        }
    }

    pub fn malformed_number(text: &str, field: &'static str, position: Position) -> Self {
        Self::MalformedNumber {
            text: text.to_string(),
            field,
            position,
        }
    }

    pub fn v3000(message: impl Into<Cow<'static, str>>, position: Position) -> Self {
        Self::MalformedV3000 {
            message: message.into(),
            position,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            Self::MalformedNumber { .. } => ErrorKind::MalformedNumber,
            Self::MalformedCountsLine { .. } => ErrorKind::MalformedCountsLine,
            Self::UnknownRecordSeparator { .. } => ErrorKind::UnknownRecordSeparator,
            Self::TruncatedField { .. } => ErrorKind::TruncatedField,
            Self::UnknownProperty { .. } => ErrorKind::UnknownProperty,
            Self::MalformedV3000 { .. } => ErrorKind::MalformedV3000,
            Self::UseAfterFreeze { .. } => ErrorKind::UseAfterFreeze,
        }
    }

    /// Where in the input the error occurred. `None` only for contract
    /// violations that are not tied to the input.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::UnexpectedEof { position, .. }
            | Self::MalformedNumber { position, .. }
            | Self::MalformedCountsLine { position, .. }
            | Self::UnknownRecordSeparator { position, .. }
            | Self::TruncatedField { position, .. }
            | Self::UnknownProperty { position, .. }
            | Self::MalformedV3000 { position, .. } => Some(*position),
            Self::UseAfterFreeze { .. } => None,
        }
    }

    /// The `{ message, line, column }` envelope shown to end users.
    pub fn diagnostic(&self) -> Diagnostic {
        let position = self.position().unwrap_or_default();
        Diagnostic {
            message: self.to_string(),
            line: position.line,
            column: position.column,
        }
    }
}

/// Display form of a failed parse, pointing at the offending location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_carries_line_and_column() {
        let err = ParseError::unexpected_eof("atom line 3 of 5", Position::at(9, 1, 212));
        let diagnostic = err.diagnostic();
        assert_eq!(diagnostic.line, 9);
        assert_eq!(diagnostic.column, 1);
        assert!(diagnostic.message.contains("atom line 3 of 5"));
    }

    #[test]
    fn test_use_after_freeze_has_no_position() {
        let err = ParseError::UseAfterFreeze { column: "x" };
        assert_eq!(err.kind(), ErrorKind::UseAfterFreeze);
        assert_eq!(err.position(), None);
        assert_eq!(err.diagnostic().line, 1);
    }
}
