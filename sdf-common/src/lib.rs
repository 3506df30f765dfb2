//! Shared building blocks for the SDF reader crates: source positions,
//! tokenizer checkpoints, zero-copy text slices, fields and the error type.

pub mod checkpoint;
pub mod error;
pub mod field;
pub mod position;
pub mod text_slice;

pub use checkpoint::Checkpoint;
pub use error::{Diagnostic, ErrorKind, ParseError, Result};
pub use field::Field;
pub use position::Position;
pub use text_slice::TextSlice;
