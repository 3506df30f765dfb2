use sdf_common::{Diagnostic, ParseError, Position};
use sdf_parser::Compound;
use thiserror::Error;

/// Every record of a successfully parsed file, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SdfFile {
    pub compounds: Vec<Compound>,
}

impl SdfFile {
    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Compound> {
        self.compounds.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Compound> {
        self.compounds.iter()
    }
}

impl IntoIterator for SdfFile {
    type Item = Compound;
    type IntoIter = std::vec::IntoIter<Compound>;

    fn into_iter(self) -> Self::IntoIter {
        self.compounds.into_iter()
    }
}

impl<'a> IntoIterator for &'a SdfFile {
    type Item = &'a Compound;
    type IntoIter = std::slice::Iter<'a, Compound>;

    fn into_iter(self) -> Self::IntoIter {
        self.compounds.iter()
    }
}

/// The caller stopped the parse at a record boundary.
///
/// Not a data error. The records completed before the stop are kept for
/// introspection only; the parse as a whole did not succeed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse cancelled after {} records ({position})", .compounds.len())]
pub struct Cancelled {
    pub compounds: Vec<Compound>,
    /// Start of the first unread line.
    pub position: Position,
}

/// Why a parse produced no [`SdfFile`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl ParseFailure {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Message and location for display; `None` for a cancellation.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::Parse(err) => Some(err.diagnostic()),
            Self::Cancelled(_) => None,
        }
    }
}

/// Result of one parse invocation: all records, or one failure.
pub type ParseOutcome = Result<SdfFile, ParseFailure>;
