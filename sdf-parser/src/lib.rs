//! Record-block parser for MDL MOL / SD connection tables.
//!
//! [`RecordParser`] walks one record through the states
//! `ExpectHeader → ExpectCounts → ReadAtoms → ReadBonds → ReadProperties →
//! ReadDataItems → RecordComplete`, filling column builders per block and
//! freezing them into a [`Compound`] at the end. Both V2000 (fixed-width) and
//! V3000 (`M  V30`) connection tables are read.

pub mod atoms;
pub mod bonds;
pub mod counts;
pub mod data_items;
pub mod model;
pub mod options;
pub mod properties;
pub mod record;
pub mod v3000;

use sdf_tokenizer::{DefaultContext, Tokenizer};

pub use counts::parse_counts;
pub use data_items::RecordEnd;
pub use model::{
    AtomProperty, Atoms, BondIndexError, Bonds, Compound, CountsLine, CtabVersion, DataItems,
    Header, MolFile, Properties,
};
pub use options::ParserOptions;
pub use record::{RecordParser, RecordState};
pub use sdf_common::{Diagnostic, ErrorKind, ParseError, Position};
pub use sdf_tokenizer::FieldPolicy;

/// Parses a single MOL file: header, counts line, connection table and
/// property block. Anything after `M  END` is ignored.
pub fn parse_mol(input: &str, options: &ParserOptions) -> Result<MolFile, ParseError> {
    let tokenizer = Tokenizer::new(input).with_policy(options.field_policy);
    let mut ctx = DefaultContext::new(tokenizer);
    RecordParser::new(options.clone()).parse_mol_file(&mut ctx)
}
