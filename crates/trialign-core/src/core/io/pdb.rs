use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::{Atom, RecordKind};
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// Minimum record length covering the coordinate columns.
const MIN_ATOM_RECORD_LEN: usize = 54;
const COORDINATES_START: usize = 30;
const COORDINATES_END: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| *c != ' ')
}

fn parse_coordinate(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Reader and writer for the fixed-column Protein Data Bank format.
///
/// Only `ATOM` and `HETATM` records of the first model are read. Written atoms
/// reuse their source record with the coordinate columns replaced, so everything
/// else on the line survives a read/transform/write cycle.
pub struct PdbFile;

impl PdbFile {
    fn parse_atom_record(
        line: &str,
        line_num: usize,
        record: RecordKind,
        fallback_serial: usize,
    ) -> Result<Atom, PdbError> {
        if line.len() < MIN_ATOM_RECORD_LEN {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let x = parse_coordinate(line, line_num, 30, 38)?;
        let y = parse_coordinate(line, line_num, 38, 46)?;
        let z = parse_coordinate(line, line_num, 46, 54)?;

        let res_seq_str = slice_and_trim(line, 22, 26);
        let residue_number: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26".into(),
                value: res_seq_str.into(),
            },
        })?;

        // Serials overflow to "*****" or hybrid-36 in very large entries.
        let serial = slice_and_trim(line, 6, 11)
            .parse()
            .unwrap_or(fallback_serial);

        let name = slice_and_trim(line, 12, 16);
        let mut atom = Atom::new(name, Point3::new(x, y, z));
        atom.record = record;
        atom.serial = serial;
        atom.name_field = line.get(12..16).unwrap_or(name).to_string();
        atom.alt_loc = column_char(line, 16);
        atom.residue_name = slice_and_trim(line, 17, 20).to_string();
        atom.chain_id = column_char(line, 21).unwrap_or(' ');
        atom.residue_number = residue_number;
        atom.insertion_code = column_char(line, 26);
        atom.occupancy = slice_and_trim(line, 54, 60).parse().unwrap_or(1.0);
        atom.temp_factor = slice_and_trim(line, 60, 66).parse().unwrap_or(0.0);
        atom.element = slice_and_trim(line, 76, 78).to_string();
        atom.source_line = Some(line.to_string());
        Ok(atom)
    }

    fn format_atom(atom: &Atom) -> String {
        let position = atom.position();
        let coordinates = format!("{:8.3}{:8.3}{:8.3}", position.x, position.y, position.z);

        if let Some(source) = &atom.source_line {
            if let (Some(prefix), Some(suffix)) = (
                source.get(..COORDINATES_START),
                source.get(COORDINATES_END..),
            ) {
                return format!("{}{}{}", prefix, coordinates, suffix);
            }
        }

        let name_field = if atom.name_field.len() == 4 {
            atom.name_field.clone()
        } else {
            format!("{:<4.4}", atom.name)
        };
        format!(
            "{:<6}{:>5} {}{}{:>3} {}{:>4}{}   {}{:>6.2}{:>6.2}          {:>2}",
            atom.record.as_str(),
            atom.serial,
            name_field,
            atom.alt_loc.unwrap_or(' '),
            atom.residue_name,
            atom.chain_id,
            atom.residue_number,
            atom.insertion_code.unwrap_or(' '),
            coordinates,
            atom.occupancy,
            atom.temp_factor,
            atom.element
        )
    }
}

impl MolecularFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut molecule = Molecule::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            // Record names are left-justified in columns 1-6; `END` may be the whole line.
            let record_name = line.get(..6).unwrap_or(line.as_str()).trim();
            let record = match record_name {
                "ATOM" => RecordKind::Atom,
                "HETATM" => RecordKind::Hetatm,
                "ENDMDL" | "END" => {
                    debug!("Stopping PDB read at line {} ({}).", line_num, line.trim());
                    break;
                }
                _ => continue,
            };
            let atom = Self::parse_atom_record(&line, line_num, record, molecule.len() + 1)?;
            molecule.push(atom);
        }

        if molecule.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        debug!("Read {} atom record(s).", molecule.len());
        Ok(molecule)
    }

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        for atom in molecule {
            writeln!(writer, "{}", Self::format_atom(atom))?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
