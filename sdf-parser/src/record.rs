use log::{debug, warn};
use sdf_common::{ParseError, TextSlice};
use sdf_tokenizer::LineContext;

use crate::atoms::AtomBlockBuilder;
use crate::bonds::BondBlockBuilder;
use crate::counts::parse_counts;
use crate::data_items::{DataItemBlockBuilder, RecordEnd};
use crate::model::{Compound, CountsLine, CtabVersion, Header, MolFile};
use crate::options::ParserOptions;
use crate::properties::PropertyBlockBuilder;
use crate::v3000::{self, V3000Counts};

/// Where the record parser is within one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    ExpectHeader,
    ExpectCounts,
    ReadAtoms,
    ReadBonds,
    ReadProperties,
    ReadDataItems,
    RecordComplete,
}

/// Builders for the record in progress. Dropped unfrozen if the record fails.
#[derive(Debug)]
struct Draft {
    header: Vec<TextSlice>,
    counts: Option<CountsLine>,
    v3000: Option<V3000Counts>,
    atoms: Option<AtomBlockBuilder>,
    bonds: Option<BondBlockBuilder>,
    properties: PropertyBlockBuilder,
    data_items: DataItemBlockBuilder,
    end: RecordEnd,
}

impl Draft {
    fn new(header_lines: usize) -> Self {
        Self {
            header: Vec::with_capacity(header_lines),
            counts: None,
            v3000: None,
            atoms: None,
            bonds: None,
            properties: PropertyBlockBuilder::new(),
            data_items: DataItemBlockBuilder::new(),
            end: RecordEnd::EndOfInput,
        }
    }
}

/// Reads one record (header through data items) from a [`LineContext`].
///
/// The parser itself holds only the options; all per-record state lives in
/// a draft created by [`parse`](Self::parse), so the same parser is reused
/// for every record of a file.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    options: ParserOptions,
}

impl RecordParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses the connection table and data items of the record starting at
    /// the cursor. Returns the frozen record and how it ended.
    pub fn parse<C: LineContext>(
        &self,
        ctx: &mut C,
        index: usize,
    ) -> Result<(Compound, RecordEnd), ParseError> {
        let mut draft = Draft::new(self.options.header_lines);
        self.advance(ctx, &mut draft, RecordState::RecordComplete)?;
        let (compound, end) = self.complete(draft, index, ctx)?;
        debug!(
            "record {index} '{}': {} atoms, {} bonds, {} data items",
            compound.mol_file.header.title(),
            compound.mol_file.atoms.count,
            compound.mol_file.bonds.count,
            compound.data_items.count,
        );
        Ok((compound, end))
    }

    /// Parses a single connection table, stopping after `M  END`.
    pub fn parse_mol_file<C: LineContext>(&self, ctx: &mut C) -> Result<MolFile, ParseError> {
        let mut draft = Draft::new(self.options.header_lines);
        self.advance(ctx, &mut draft, RecordState::ReadDataItems)?;
        let (mol_file, _) = self.freeze(draft, ctx)?;
        Ok(mol_file)
    }

    /// Runs the state machine from `ExpectHeader` until it reaches `until`.
    fn advance<C: LineContext>(
        &self,
        ctx: &mut C,
        draft: &mut Draft,
        until: RecordState,
    ) -> Result<(), ParseError> {
        let mut state = RecordState::ExpectHeader;
        while state != until {
            state = match state {
                RecordState::ExpectHeader => {
                    for _ in 0..self.options.header_lines {
                        let line = ctx.read_line("header line")?;
                        draft.header.push(line.text().clone());
                    }
                    RecordState::ExpectCounts
                }
                RecordState::ExpectCounts => {
                    let line = ctx.read_line("counts line")?;
                    draft.counts = Some(parse_counts(&line, self.options.field_policy)?);
                    RecordState::ReadAtoms
                }
                RecordState::ReadAtoms => {
                    self.read_atoms(ctx, draft)?;
                    RecordState::ReadBonds
                }
                RecordState::ReadBonds => {
                    self.read_bonds(ctx, draft)?;
                    RecordState::ReadProperties
                }
                RecordState::ReadProperties => {
                    draft.properties.read(ctx, &self.options)?;
                    RecordState::ReadDataItems
                }
                RecordState::ReadDataItems => {
                    draft.end = draft.data_items.read(ctx, &self.options)?;
                    RecordState::RecordComplete
                }
                RecordState::RecordComplete => break,
            };
        }
        Ok(())
    }

    fn read_atoms<C: LineContext>(&self, ctx: &mut C, draft: &mut Draft) -> Result<(), ParseError> {
        let counts = self.counts(draft, ctx)?;
        if counts.version == Some(CtabVersion::V3000) {
            let (declared, atoms) = v3000::read_atoms(ctx, &mut draft.properties)?;
            draft.v3000 = Some(declared);
            draft.atoms = Some(atoms);
            return Ok(());
        }

        let lenient = self.options.lenient_layout();
        let mut atoms = AtomBlockBuilder::with_capacity(counts.atom_count);
        for _ in 0..counts.atom_count {
            let line = ctx.read_line("atom line")?;
            atoms.push_line(&line, self.options.field_policy, lenient)?;
        }
        if atoms.shifted_lines() > 0 {
            warn!(
                "{} atom lines before line {} are not column-aligned; read by whitespace",
                atoms.shifted_lines(),
                ctx.position().line
            );
        }
        draft.atoms = Some(atoms);
        Ok(())
    }

    fn read_bonds<C: LineContext>(&self, ctx: &mut C, draft: &mut Draft) -> Result<(), ParseError> {
        if let Some(declared) = draft.v3000 {
            draft.bonds = Some(v3000::read_bonds(ctx, &declared)?);
            return Ok(());
        }

        let counts = self.counts(draft, ctx)?;
        let lenient = self.options.lenient_layout();
        let mut bonds = BondBlockBuilder::with_capacity(counts.bond_count);
        for _ in 0..counts.bond_count {
            let line = ctx.read_line("bond line")?;
            bonds.push_line(&line, self.options.field_policy, lenient)?;
        }
        if bonds.shifted_lines() > 0 {
            warn!(
                "{} bond lines before line {} are not column-aligned; read by whitespace",
                bonds.shifted_lines(),
                ctx.position().line
            );
        }
        draft.bonds = Some(bonds);
        Ok(())
    }

    fn counts<C: LineContext>(&self, draft: &Draft, ctx: &C) -> Result<CountsLine, ParseError> {
        draft
            .counts
            .clone()
            .ok_or_else(|| ParseError::unexpected_eof("counts line", ctx.position()))
    }

    /// `RecordComplete`: freezes every builder of the record.
    fn complete<C: LineContext>(
        &self,
        mut draft: Draft,
        index: usize,
        ctx: &C,
    ) -> Result<(Compound, RecordEnd), ParseError> {
        let data_items = std::mem::take(&mut draft.data_items).finish()?;
        let (mol_file, end) = self.freeze(draft, ctx)?;
        let compound = Compound {
            index,
            mol_file,
            data_items,
        };
        Ok((compound, end))
    }

    fn freeze<C: LineContext>(
        &self,
        draft: Draft,
        ctx: &C,
    ) -> Result<(MolFile, RecordEnd), ParseError> {
        let missing = |block: &'static str| ParseError::unexpected_eof(block, ctx.position());
        let mut counts = draft.counts.ok_or_else(|| missing("counts line"))?;
        let atoms = draft.atoms.ok_or_else(|| missing("atom block"))?.finish()?;
        let bonds = draft.bonds.ok_or_else(|| missing("bond block"))?.finish()?;
        if let Some(declared) = draft.v3000 {
            counts.atom_count = declared.atom_count;
            counts.bond_count = declared.bond_count;
            counts.chiral = declared.chiral;
        }
        let mol_file = MolFile {
            header: Header {
                lines: draft.header,
            },
            counts,
            atoms,
            bonds,
            properties: draft.properties.finish()?,
        };
        Ok((mol_file, draft.end))
    }
}
