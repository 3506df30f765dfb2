use std::sync::Arc;

use sdf_common::TextSlice;

/// A frozen, immutable column of numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    name: &'static str,
    values: Box<[T]>,
}

pub type IntColumn = Column<i32>;
pub type FloatColumn = Column<f64>;

impl<T: Copy> Column<T> {
    pub(crate) fn new(name: &'static str, values: Vec<T>) -> Self {
        Self {
            name,
            values: values.into_boxed_slice(),
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

    /// Value at `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`, like slice indexing.
    pub fn value(&self, row: usize) -> T {
        self.values[row]
    }

    pub fn get(&self, row: usize) -> Option<T> {
        self.values.get(row).copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.values.iter().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum StrStorage {
    /// Values are views into the parsed input.
    Sliced(Box<[TextSlice]>),
    /// Values are codes into a small symbol table.
    Interned {
        symbols: Box<[Arc<str>]>,
        codes: Box<[u32]>,
    },
}

/// A frozen, immutable column of strings.
#[derive(Debug, Clone, PartialEq)]
pub struct StrColumn {
    name: &'static str,
    storage: StrStorage,
}

impl StrColumn {
    pub(crate) fn sliced(name: &'static str, values: Vec<TextSlice>) -> Self {
        Self {
            name,
            storage: StrStorage::Sliced(values.into_boxed_slice()),
        }
    }

    pub(crate) fn interned(name: &'static str, symbols: Vec<Arc<str>>, codes: Vec<u32>) -> Self {
        Self {
            name,
            storage: StrStorage::Interned {
                symbols: symbols.into_boxed_slice(),
                codes: codes.into_boxed_slice(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            StrStorage::Sliced(values) => values.len(),
            StrStorage::Interned { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    pub fn value(&self, row: usize) -> &str {
        match &self.storage {
            StrStorage::Sliced(values) => &values[row],
            StrStorage::Interned { symbols, codes } => &symbols[codes[row] as usize],
        }
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        (row < self.len()).then(|| self.value(row))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.len()).map(move |row| self.value(row))
    }

    /// Number of distinct values held by an interned column; `None` for
    /// sliced columns.
    pub fn distinct(&self) -> Option<usize> {
        match &self.storage {
            StrStorage::Sliced(_) => None,
            StrStorage::Interned { symbols, .. } => Some(symbols.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Str,
}

/// Borrowed column of any kind, returned by by-name lookups.
#[derive(Debug, Clone, Copy)]
pub enum ColumnRef<'a> {
    Int(&'a IntColumn),
    Float(&'a FloatColumn),
    Str(&'a StrColumn),
}

impl<'a> ColumnRef<'a> {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Int(_) => ColumnKind::Int,
            Self::Float(_) => ColumnKind::Float,
            Self::Str(_) => ColumnKind::Str,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Int(column) => column.name(),
            Self::Float(column) => column.name(),
            Self::Str(column) => column.name(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int(column) => column.len(),
            Self::Float(column) => column.len(),
            Self::Str(column) => column.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_int(&self) -> Option<&'a IntColumn> {
        match *self {
            Self::Int(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&'a FloatColumn> {
        match *self {
            Self::Float(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a StrColumn> {
        match *self {
            Self::Str(column) => Some(column),
            _ => None,
        }
    }

    /// Value at `row` rendered as text.
    pub fn display(&self, row: usize) -> Option<String> {
        match self {
            Self::Int(column) => column.get(row).map(|v| v.to_string()),
            Self::Float(column) => column.get(row).map(|v| v.to_string()),
            Self::Str(column) => column.get(row).map(str::to_string),
        }
    }
}
