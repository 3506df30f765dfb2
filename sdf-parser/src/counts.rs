use sdf_common::{Field, ParseError};
use sdf_tokenizer::{FieldPolicy, Line};

use crate::model::{CountsLine, CtabVersion};

/// Decodes the `aaabbblllfffcccsssxxxrrrpppiiimmmvvvvvv` counts line.
///
/// Only the atom and bond counts are required. The reserved fields are read
/// for completeness and default to zero when missing or unreadable.
pub fn parse_counts(line: &Line, policy: FieldPolicy) -> Result<CountsLine, ParseError> {
    let malformed = |field: &Field| ParseError::MalformedCountsLine {
        text: line.as_str().to_string(),
        position: field.position(),
    };

    let atoms = line.fixed_field(0, 3, "atom count", FieldPolicy::ZeroFill)?;
    let bonds = line.fixed_field(3, 6, "bond count", FieldPolicy::ZeroFill)?;
    let fixed = atoms
        .parse::<usize>("atom count")
        .map_err(|_| malformed(&atoms))
        .and_then(|a| {
            let b = bonds
                .parse::<usize>("bond count")
                .map_err(|_| malformed(&bonds))?;
            Ok((a, b))
        });
    let (atom_count, bond_count) = match fixed {
        Ok(counts) => counts,
        Err(err) if policy == FieldPolicy::ZeroFill => whitespace_counts(line).ok_or(err)?,
        Err(err) => return Err(err),
    };

    let reserved = |start, end, name| {
        line.fixed_field(start, end, name, FieldPolicy::ZeroFill)
            .and_then(|field| field.parse_or_default::<i32>(name))
            .unwrap_or_default()
    };

    let version = if line.as_str().contains("V3000") {
        Some(CtabVersion::V3000)
    } else if line.as_str().contains("V2000") {
        Some(CtabVersion::V2000)
    } else {
        None
    };

    Ok(CountsLine {
        atom_count,
        bond_count,
        atom_list_count: reserved(6, 9, "atom list count"),
        chiral: reserved(12, 15, "chiral flag"),
        version,
    })
}

/// Counts from a counts line whose fields are not column-aligned.
fn whitespace_counts(line: &Line) -> Option<(usize, usize)> {
    let mut tokens = line.tokens();
    let atoms = tokens.next()?.parse::<usize>("atom count").ok()?;
    let bonds = tokens.next()?.parse::<usize>("bond count").ok()?;
    Some((atoms, bonds))
}
