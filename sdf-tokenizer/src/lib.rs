//! Line tokenizer for fixed-width / line-oriented chemical table files.

pub mod context;
pub mod line;
pub mod tokenizer;

pub use context::{DefaultContext, LineContext};
pub use line::{FieldPolicy, Line, Tokens};
pub use sdf_common::{Checkpoint, Field, Position, TextSlice};
pub use tokenizer::Tokenizer;
