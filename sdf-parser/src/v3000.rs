//! Extended (V3000) connection tables.
//!
//! A V3000 record carries a `0  0 ... V3000` counts line and then the whole
//! table as `M  V30 ` lines:
//!
//! ```text
//! M  V30 BEGIN CTAB
//! M  V30 COUNTS 2 1 0 0 0
//! M  V30 BEGIN ATOM
//! M  V30 1 C 0 0 0 0 CHG=-1
//! M  V30 2 O 1.2 0 0 0
//! M  V30 END ATOM
//! M  V30 BEGIN BOND
//! M  V30 1 2 1 2
//! M  V30 END BOND
//! M  V30 END CTAB
//! M  END
//! ```
//!
//! A line ending in `-` continues on the next `M  V30 ` line. The rows land in
//! the same columns as V2000 atoms and bonds.

use log::trace;
use sdf_common::{Field, ParseError, Position, TextSlice};
use sdf_tokenizer::{Line, LineContext};

use crate::atoms::{int_column, AtomBlockBuilder};
use crate::bonds::BondBlockBuilder;
use crate::properties::PropertyBlockBuilder;

const PREFIX: &str = "M  V30 ";

/// Atom keywords stored in integer atom columns.
const ATOM_KEYWORDS: [(&str, &str); 6] = [
    ("CFG", "stereo_parity"),
    ("HCOUNT", "hydrogen_count"),
    ("STBOX", "stereo_care_box"),
    ("VAL", "valence"),
    ("INVRET", "inversion_retention"),
    ("EXACHG", "exact_change"),
];

fn malformed(message: impl Into<String>, position: Position) -> ParseError {
    ParseError::v3000(message.into(), position)
}

/// The part of an `M  V30 ` line after the prefix.
fn content(line: &Line) -> Result<Line, ParseError> {
    match line.strip_prefix(PREFIX) {
        Some(text) => Ok(Line::new(
            text,
            line.position().shifted(PREFIX.len(), PREFIX.len()),
        )),
        None => Err(malformed(
            format!("expected an M  V30 line, found '{}'", line.as_str()),
            line.position(),
        )),
    }
}

/// Reads one logical V3000 line, joining `-` continuations.
pub fn read_v30_line<C: LineContext>(ctx: &mut C) -> Result<Line, ParseError> {
    let first = ctx.read_line("M  V30 line")?;
    let mut line = content(&first)?;
    while let Some(head) = line.as_str().trim_end().strip_suffix('-') {
        let next = ctx.read_line("V3000 continuation line")?;
        let rest = content(&next)?;
        let joined = format!("{head}{}", rest.as_str());
        line = Line::new(TextSlice::owned(joined), line.position());
    }
    Ok(line)
}

/// Whitespace tokens of a V3000 line, with parenthesised lists such as
/// `ATTCHORD=(2 1 2)` kept as one token.
fn words(line: &Line) -> Vec<Field> {
    let mut words = Vec::new();
    let mut tokens = line.tokens();
    while let Some(token) = tokens.next() {
        if !token.as_str().contains('(') || token.as_str().contains(')') {
            words.push(token);
            continue;
        }
        let start = token.text();
        let mut end = start.end();
        for next in tokens.by_ref() {
            end = next.text().end();
            if next.as_str().contains(')') {
                break;
            }
        }
        let text = TextSlice::new(start.buffer(), start.start(), end);
        words.push(Field::new(text, token.position()));
    }
    words
}

/// Splits `KEY=VALUE`.
fn keyword(word: &Field) -> Option<(&str, Field)> {
    let eq = word.as_str().find('=')?;
    let value = word.text().slice(eq + 1, word.as_str().len());
    let position = word.position().shifted(eq + 1, eq + 1);
    Some((&word.as_str()[..eq], Field::new(value, position)))
}

fn expect_words(line: &Line, words: &[Field], expected: &[&str]) -> Result<(), ParseError> {
    let found: Vec<&str> = words.iter().take(expected.len()).map(Field::as_str).collect();
    if found != expected {
        return Err(malformed(
            format!("expected '{}', found '{}'", expected.join(" "), line.as_str()),
            line.position(),
        ));
    }
    Ok(())
}

/// Declared sizes from `COUNTS na nb nsg n3d chiral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V3000Counts {
    pub atom_count: usize,
    pub bond_count: usize,
    pub chiral: i32,
}

/// Reads `BEGIN CTAB`, `COUNTS` and the atom block.
pub fn read_atoms<C: LineContext>(
    ctx: &mut C,
    properties: &mut PropertyBlockBuilder,
) -> Result<(V3000Counts, AtomBlockBuilder), ParseError> {
    let begin = read_v30_line(ctx)?;
    expect_words(&begin, &words(&begin), &["BEGIN", "CTAB"])?;

    let line = read_v30_line(ctx)?;
    let counts_words = words(&line);
    expect_words(&line, &counts_words, &["COUNTS"])?;
    let count = |index: usize, name| -> Result<usize, ParseError> {
        counts_words
            .get(index)
            .ok_or_else(|| malformed(format!("COUNTS line lacks the {name}"), line.position()))?
            .parse(name)
    };
    let counts = V3000Counts {
        atom_count: count(1, "atom count")?,
        bond_count: count(2, "bond count")?,
        chiral: counts_words
            .get(5)
            .map(|field| field.parse_or_default("chiral flag"))
            .transpose()?
            .unwrap_or(0),
    };

    let mut atoms = AtomBlockBuilder::with_capacity(counts.atom_count);
    let begin = read_v30_line(ctx)?;
    expect_words(&begin, &words(&begin), &["BEGIN", "ATOM"])?;
    loop {
        let line = read_v30_line(ctx)?;
        let row = words(&line);
        if row.first().map(Field::as_str) == Some("END") {
            expect_words(&line, &row, &["END", "ATOM"])?;
            break;
        }
        push_atom(&line, &row, &mut atoms, properties)?;
    }
    if atoms.len() != counts.atom_count {
        return Err(malformed(
            format!(
                "COUNTS declares {} atoms, atom block has {}",
                counts.atom_count,
                atoms.len()
            ),
            ctx.position(),
        ));
    }
    Ok((counts, atoms))
}

/// `index type x y z aamap [KEY=VALUE ...]`
fn push_atom(
    line: &Line,
    row: &[Field],
    atoms: &mut AtomBlockBuilder,
    properties: &mut PropertyBlockBuilder,
) -> Result<(), ParseError> {
    let [index, symbol, x, y, z, aamap, ..] = row else {
        return Err(malformed(
            format!("atom line needs 6 fields: '{}'", line.as_str()),
            line.position(),
        ));
    };
    let atom_index: i32 = index.parse("atom index")?;
    let mut ints = [0; 10];
    if let Some(slot) = int_column("atom_atom_mapping") {
        ints[slot] = aamap.parse("atom_atom_mapping")?;
    }
    for word in &row[6..] {
        let Some((key, value)) = keyword(word) else {
            continue;
        };
        match key {
            "CHG" => properties.charges.push(atom_index, value.parse("charge")?)?,
            "RAD" => properties.radicals.push(atom_index, value.parse("radical")?)?,
            "MASS" => properties.isotopes.push(atom_index, value.parse("mass")?)?,
            _ => match ATOM_KEYWORDS.iter().find(|(name, _)| *name == key) {
                Some(&(_, column)) => {
                    if let Some(slot) = int_column(column) {
                        ints[slot] = value.parse(column)?;
                    }
                }
                None => trace!("ignoring atom keyword {key} on line {}", line.number()),
            },
        }
    }
    atoms.push_coordinates(x, y, z)?;
    atoms.push_symbol(symbol)?;
    atoms.push_ints(ints)
}

/// Reads the bond block, if any, and everything else up to `END CTAB`.
pub fn read_bonds<C: LineContext>(
    ctx: &mut C,
    counts: &V3000Counts,
) -> Result<BondBlockBuilder, ParseError> {
    let mut bonds = BondBlockBuilder::with_capacity(counts.bond_count);
    loop {
        let line = read_v30_line(ctx)?;
        let row = words(&line);
        let head: Vec<&str> = row.iter().take(2).map(Field::as_str).collect();
        match head.as_slice() {
            ["END", "CTAB"] => break,
            ["BEGIN", "BOND"] => read_bond_rows(ctx, &mut bonds)?,
            ["BEGIN", block] => skip_block(ctx, block)?,
            _ => trace!("ignoring V3000 line {}: {}", line.number(), line.as_str()),
        }
    }
    if bonds.len() != counts.bond_count {
        return Err(malformed(
            format!(
                "COUNTS declares {} bonds, bond block has {}",
                counts.bond_count,
                bonds.len()
            ),
            ctx.position(),
        ));
    }
    Ok(bonds)
}

/// `index type atom1 atom2 [CFG= TOPO= RXCTR= ...]`
fn read_bond_rows<C: LineContext>(
    ctx: &mut C,
    bonds: &mut BondBlockBuilder,
) -> Result<(), ParseError> {
    loop {
        let line = read_v30_line(ctx)?;
        let row = words(&line);
        if row.first().map(Field::as_str) == Some("END") {
            return expect_words(&line, &row, &["END", "BOND"]);
        }
        let [_, order, a, b, ..] = &row[..] else {
            return Err(malformed(
                format!("bond line needs 4 fields: '{}'", line.as_str()),
                line.position(),
            ));
        };
        let mut values = [
            a.parse("atom_index_a")?,
            b.parse("atom_index_b")?,
            order.parse("order")?,
            0,
            0,
            0,
        ];
        for word in &row[4..] {
            let slot = match keyword(word) {
                Some(("CFG", value)) => (3, value, "stereo"),
                Some(("TOPO", value)) => (4, value, "topology"),
                Some(("RXCTR", value)) => (5, value, "reacting_center"),
                _ => continue,
            };
            values[slot.0] = slot.1.parse(slot.2)?;
        }
        bonds.push_row(values)?;
    }
}

/// Skips a `BEGIN block` ... `END block` section, nested sections included.
fn skip_block<C: LineContext>(ctx: &mut C, block: &str) -> Result<(), ParseError> {
    trace!("skipping V3000 {block} block");
    let mut depth = 1usize;
    while depth > 0 {
        let line = read_v30_line(ctx)?;
        match line.tokens().next().as_ref().map(Field::as_str) {
            Some("BEGIN") => depth += 1,
            Some("END") => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}
