use nalgebra::Point3;
use std::fmt;

/// Atom names forming the sugar-phosphate backbone of a nucleotide.
const NUCLEIC_BACKBONE_ATOM_NAMES: &[&str] = &[
    "P", "OP1", "OP2", "OP3", "O1P", "O2P", "O3P", "O5'", "C5'", "C4'", "O4'", "C3'", "O3'",
    "C2'", "O2'", "C1'",
];

/// The PDB record type an atom was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    #[default]
    Atom,
    Hetatm,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Atom => "ATOM",
            RecordKind::Hetatm => "HETATM",
        }
    }
}

/// Represents a single atom of a biomolecular structure.
///
/// Besides its position, an atom keeps the identifying fields of the PDB record it
/// came from. When read from a file, the raw record line is kept as well so that
/// the atom can be written back with only its coordinates replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The record type (`ATOM` or `HETATM`).
    pub record: RecordKind,
    /// The atom serial number.
    pub serial: usize,
    /// The trimmed atom name (e.g., "CA", "P", "O5'").
    pub name: String,
    /// The untrimmed four-character atom name field (columns 13-16).
    pub name_field: String,
    /// The alternate location indicator, if any.
    pub alt_loc: Option<char>,
    /// The residue name (e.g., "ALA", "G").
    pub residue_name: String,
    /// The chain identifier.
    pub chain_id: char,
    /// The residue sequence number.
    pub residue_number: isize,
    /// The residue insertion code, if any.
    pub insertion_code: Option<char>,
    /// The occupancy.
    pub occupancy: f64,
    /// The isotropic temperature factor.
    pub temp_factor: f64,
    /// The element symbol, possibly empty.
    pub element: String,
    /// The record line this atom was parsed from.
    pub source_line: Option<String>,
    position: Point3<f64>,
}

impl Atom {
    /// Creates an `ATOM` record with the given name and position.
    ///
    /// Residue information is left at neutral defaults and can be set afterwards.
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            record: RecordKind::Atom,
            serial: 0,
            name: name.to_string(),
            name_field: padded_name_field(name),
            alt_loc: None,
            residue_name: String::from("UNK"),
            chain_id: 'A',
            residue_number: 0,
            insertion_code: None,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: String::new(),
            source_line: None,
            position,
        }
    }

    #[inline]
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Moves the atom to a new position.
    #[inline]
    pub fn update(&mut self, position: Point3<f64>) {
        self.position = position;
    }

    /// Returns `true` for a protein alpha carbon.
    ///
    /// Calcium ions share the name "CA" but are written left-justified in the name
    /// field ("CA  "), which is how the two are told apart.
    pub fn is_calpha(&self) -> bool {
        if self.name_field.len() == 4 {
            self.name_field == " CA "
        } else {
            self.name == "CA" && self.record == RecordKind::Atom
        }
    }

    /// Returns `true` for a nucleotide phosphorus.
    pub fn is_phosphate(&self) -> bool {
        self.name == "P"
    }

    /// Returns `true` for any atom of the nucleic-acid sugar-phosphate backbone.
    ///
    /// Old-style names using `*` in place of `'` are accepted.
    pub fn is_rna_backbone(&self) -> bool {
        let normalized = self.name.replace('*', "'");
        NUCLEIC_BACKBONE_ATOM_NAMES.contains(&normalized.as_str())
    }
}

/// Pads a short atom name the way PDB writers place single-letter elements, starting
/// at column 14.
fn padded_name_field(name: &str) -> String {
    if name.len() >= 4 {
        name.to_string()
    } else {
        format!(" {:<3}", name)
    }
}

/// The atom used as the single representative of each residue in an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackboneKind {
    /// Protein alpha carbons.
    CAlpha,
    /// Nucleic-acid phosphorus atoms.
    Phosphate,
}

impl BackboneKind {
    /// Returns `true` if `atom` represents its residue for this backbone kind.
    pub fn matches(&self, atom: &Atom) -> bool {
        match self {
            BackboneKind::CAlpha => atom.is_calpha(),
            BackboneKind::Phosphate => atom.is_phosphate(),
        }
    }

    /// Picks phosphates if the first atom belongs to a nucleic-acid backbone and alpha
    /// carbons otherwise.
    pub fn detect(first_atom: Option<&Atom>) -> Self {
        match first_atom {
            Some(atom) if atom.is_rna_backbone() => BackboneKind::Phosphate,
            _ => BackboneKind::CAlpha,
        }
    }
}

impl fmt::Display for BackboneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackboneKind::CAlpha => write!(f, "C-alpha"),
            BackboneKind::Phosphate => write!(f, "phosphate"),
        }
    }
}
