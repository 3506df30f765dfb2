use sdf_columns::{ColumnRef, FloatColumn, IntColumn, StrColumn};
use sdf_common::TextSlice;
use thiserror::Error;

/// The positional lines in front of the counts line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    pub lines: Vec<TextSlice>,
}

impl Header {
    fn line(&self, index: usize) -> &str {
        self.lines.get(index).map(|line| &**line).unwrap_or("")
    }

    /// Molecule name.
    pub fn title(&self) -> &str {
        self.line(0)
    }

    /// Program / timestamp line.
    pub fn program(&self) -> &str {
        self.line(1)
    }

    pub fn comment(&self) -> &str {
        self.line(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtabVersion {
    V2000,
    V3000,
}

/// The decoded counts line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountsLine {
    pub atom_count: usize,
    pub bond_count: usize,
    pub atom_list_count: i32,
    pub chiral: i32,
    pub version: Option<CtabVersion>,
}

/// Atom block columns. Every column has `count` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Atoms {
    pub count: usize,
    pub x: FloatColumn,
    pub y: FloatColumn,
    pub z: FloatColumn,
    pub type_symbol: StrColumn,
    pub mass_difference: IntColumn,
    pub charge: IntColumn,
    pub stereo_parity: IntColumn,
    pub hydrogen_count: IntColumn,
    pub stereo_care_box: IntColumn,
    pub valence: IntColumn,
    pub h0_designator: IntColumn,
    pub atom_atom_mapping: IntColumn,
    pub inversion_retention: IntColumn,
    pub exact_change: IntColumn,
}

impl Atoms {
    pub const COLUMNS: &'static [&'static str] = &[
        "x",
        "y",
        "z",
        "type_symbol",
        "mass_difference",
        "charge",
        "stereo_parity",
        "hydrogen_count",
        "stereo_care_box",
        "valence",
        "h0_designator",
        "atom_atom_mapping",
        "inversion_retention",
        "exact_change",
    ];

    /// Looks a column up by name.
    pub fn column(&self, name: &str) -> Option<ColumnRef<'_>> {
        Some(match name {
            "x" => ColumnRef::Float(&self.x),
            "y" => ColumnRef::Float(&self.y),
            "z" => ColumnRef::Float(&self.z),
            "type_symbol" => ColumnRef::Str(&self.type_symbol),
            "mass_difference" => ColumnRef::Int(&self.mass_difference),
            "charge" => ColumnRef::Int(&self.charge),
            "stereo_parity" => ColumnRef::Int(&self.stereo_parity),
            "hydrogen_count" => ColumnRef::Int(&self.hydrogen_count),
            "stereo_care_box" => ColumnRef::Int(&self.stereo_care_box),
            "valence" => ColumnRef::Int(&self.valence),
            "h0_designator" => ColumnRef::Int(&self.h0_designator),
            "atom_atom_mapping" => ColumnRef::Int(&self.atom_atom_mapping),
            "inversion_retention" => ColumnRef::Int(&self.inversion_retention),
            "exact_change" => ColumnRef::Int(&self.exact_change),
            _ => return None,
        })
    }

    /// Coordinates of atom `row`.
    pub fn position(&self, row: usize) -> [f64; 3] {
        [self.x.value(row), self.y.value(row), self.z.value(row)]
    }
}

/// Bond block columns. Atom indices are 1-based, as written in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Bonds {
    pub count: usize,
    pub atom_index_a: IntColumn,
    pub atom_index_b: IntColumn,
    pub order: IntColumn,
    pub stereo: IntColumn,
    pub topology: IntColumn,
    pub reacting_center: IntColumn,
}

/// A bond pointing at an atom that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bond {bond} references atom {atom_index}, but the record has {atom_count} atoms")]
pub struct BondIndexError {
    /// 0-based bond row.
    pub bond: usize,
    pub atom_index: i32,
    pub atom_count: usize,
}

impl Bonds {
    pub const COLUMNS: &'static [&'static str] = &[
        "atom_index_a",
        "atom_index_b",
        "order",
        "stereo",
        "topology",
        "reacting_center",
    ];

    pub fn column(&self, name: &str) -> Option<ColumnRef<'_>> {
        Some(ColumnRef::Int(match name {
            "atom_index_a" => &self.atom_index_a,
            "atom_index_b" => &self.atom_index_b,
            "order" => &self.order,
            "stereo" => &self.stereo,
            "topology" => &self.topology,
            "reacting_center" => &self.reacting_center,
            _ => return None,
        }))
    }

    /// Checks that every bond end lies in `1..=atom_count`.
    ///
    /// The reader does not do this itself; callers that need the guarantee
    /// run it once per record.
    pub fn check_indices(&self, atom_count: usize) -> Result<(), BondIndexError> {
        let columns = [&self.atom_index_a, &self.atom_index_b];
        for bond in 0..self.count {
            for column in columns {
                let atom_index = column.value(bond);
                if atom_index < 1 || atom_index as usize > atom_count {
                    return Err(BondIndexError {
                        bond,
                        atom_index,
                        atom_count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// One per-atom property list, e.g. the `M  CHG` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomProperty {
    pub count: usize,
    /// 1-based atom index.
    pub atom_index: IntColumn,
    pub value: IntColumn,
}

impl AtomProperty {
    /// Value recorded for the 1-based `atom_index`, the last one winning.
    pub fn for_atom(&self, atom_index: i32) -> Option<i32> {
        (0..self.count)
            .rev()
            .find(|&row| self.atom_index.value(row) == atom_index)
            .map(|row| self.value.value(row))
    }
}

/// The property block between the bond block and `M  END`.
#[derive(Debug, Clone, PartialEq)]
pub struct Properties {
    /// `M  CHG`: formal charges.
    pub charges: AtomProperty,
    /// `M  ISO`: absolute isotope masses.
    pub isotopes: AtomProperty,
    /// `M  RAD`: radical states.
    pub radicals: AtomProperty,
    /// `M  APO`: attachment points.
    pub attachment_points: AtomProperty,
    /// Number of property lines that were read but not decoded.
    pub skipped: usize,
}

/// Tag / payload pairs following `M  END`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataItems {
    pub count: usize,
    /// Tag line without the marker, e.g. `<DATABASE_ID>`.
    pub data_header: StrColumn,
    /// Payload lines joined with `\n`.
    pub data: StrColumn,
}

impl DataItems {
    /// Payload of the first item whose header contains `<name>`.
    pub fn get(&self, name: &str) -> Option<&str> {
        let tag = format!("<{name}>");
        (0..self.count)
            .find(|&row| self.data_header.value(row).contains(&tag))
            .map(|row| self.data.value(row))
    }
}

/// One connection table: everything up to and including `M  END`.
#[derive(Debug, Clone, PartialEq)]
pub struct MolFile {
    pub header: Header,
    pub counts: CountsLine,
    pub atoms: Atoms,
    pub bonds: Bonds,
    pub properties: Properties,
}

impl MolFile {
    pub fn check_bond_indices(&self) -> Result<(), BondIndexError> {
        self.bonds.check_indices(self.atoms.count)
    }
}

/// One SD record: a connection table plus its data items.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    /// 0-based position of the record in the input.
    pub index: usize,
    pub mol_file: MolFile,
    pub data_items: DataItems,
}
