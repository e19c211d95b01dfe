use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular file formats.
///
/// Implementors handle format-specific parsing and serialization; selection of a
/// subset of atoms is expressed as a plain predicate over [`Atom`] and shared by
/// every format.
pub trait MolecularFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every atom of a molecule from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error>;

    /// Writes a molecule to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads the atoms accepted by `selector` from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_selected_from<F>(
        reader: &mut impl BufRead,
        selector: F,
    ) -> Result<Molecule, Self::Error>
    where
        F: Fn(&Atom) -> bool,
    {
        Ok(Self::read_from(reader)?.select(selector))
    }

    /// Reads a molecule from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Molecule, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Reads the atoms accepted by `selector` from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_selected_from_path<P, F>(path: P, selector: F) -> Result<Molecule, Self::Error>
    where
        P: AsRef<Path>,
        F: Fn(&Atom) -> bool,
    {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_selected_from(&mut reader, selector)
    }

    /// Writes a molecule to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(molecule: &Molecule, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecule, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
