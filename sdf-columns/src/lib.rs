//! Typed column builders and the frozen, randomly indexable columns they
//! produce.

pub mod builder;
pub mod column;
pub mod intern;

pub use builder::{
    FloatColumnBuilder, IntColumnBuilder, NumericBuilder, StrColumnBuilder, MAX_RESERVED_ROWS,
};
pub use column::{Column, ColumnKind, ColumnRef, FloatColumn, IntColumn, StrColumn};
pub use intern::Interner;
