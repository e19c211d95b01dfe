use crate::cli::Cli;
use crate::config::PartialAlignConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::path::Path;
use tracing::{info, warn};
use trialign::{
    core::io::{
        pdb::{PdbError, PdbFile},
        traits::MolecularFile,
    },
    core::models::molecule::Molecule,
    engine::progress::ProgressReporter,
    workflows,
};

pub fn run(args: &Cli) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialAlignConfig::from_file(path)?,
        None => PartialAlignConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(args)?;

    println!("Epsilon: {}", settings.alignment.epsilon);

    info!("Loading target structure from {:?}", &args.target);
    let target = read_structure(&args.target)?;
    info!("Loading model structure from {:?}", &args.model);
    let model = read_structure(&args.model)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the alignment workflow...");
    let report = workflows::align::run(&target, &model, &settings.alignment, &reporter)?;

    if report.alignment_size() == 0 {
        warn!("No alignment was found; the model is only moved onto the target centroid.");
    }

    info!("Writing transformed model to {:?}", &settings.output);
    write_structure(&report.transformed_model, &settings.output)?;

    println!("Max Alignment Size: {}", report.alignment_size());
    println!("Best RMSD: {}", report.rmsd());
    println!("Rigid Trans: {}", report.transform);

    Ok(())
}

fn read_structure(path: &Path) -> Result<Molecule> {
    if !path.is_file() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File {} does not exist.", path.display()),
        )));
    }
    PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn write_structure(molecule: &Molecule, path: &Path) -> Result<()> {
    PdbFile::write_to_path(molecule, path).map_err(|e| match e {
        PdbError::Io(io_error) => CliError::Io(io_error),
        other => CliError::Other(
            anyhow::Error::new(other).context(format!("Failed to write '{}'", path.display())),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    const TARGET: &str = "\
ATOM      1  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA  GLY A   2       3.800   0.000   0.000  1.00  0.00           C
ATOM      3  CA  GLY A   3       5.000   3.600   0.000  1.00  0.00           C
ATOM      4  CA  GLY A   4       8.000   4.000   2.000  1.00  0.00           C
ATOM      5  CA  GLY A   5       9.000   7.500   3.000  1.00  0.00           C
END
";

    const MODEL: &str = "\
ATOM      1  CA  GLY A   1      10.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA  GLY A   2      13.800   0.000   0.000  1.00  0.00           C
ATOM      3  CA  GLY A   3      15.000   3.600   0.000  1.00  0.00           C
ATOM      4  CA  GLY A   4      18.000   4.000   2.000  1.00  0.00           C
ATOM      5  CA  GLY A   5      19.000   7.500   3.000  1.00  0.00           C
END
";

    #[test]
    fn align_command_writes_the_transformed_model() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target_path = temp_dir.path().join("target.pdb");
        let model_path = temp_dir.path().join("model.pdb");
        let output_path = temp_dir.path().join("out.pdb");
        fs::write(&target_path, TARGET).unwrap();
        fs::write(&model_path, MODEL).unwrap();

        let cli = Cli::try_parse_from([
            "trialign",
            "-o",
            output_path.to_str().unwrap(),
            "0.5",
            target_path.to_str().unwrap(),
            model_path.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();

        let written = PdbFile::read_from_path(&output_path).unwrap();
        let target = PdbFile::read_from_path(&target_path).unwrap();
        assert_eq!(written.len(), 5);
        for (moved, expected) in written.iter().zip(target.iter()) {
            assert!((moved.position() - expected.position()).norm() < 2e-3);
        }
        assert!(fs::read_to_string(&output_path).unwrap().ends_with("END\n"));
    }

    #[test]
    fn missing_input_file_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.pdb");
        let cli = Cli::try_parse_from([
            "trialign",
            "1.0",
            missing.to_str().unwrap(),
            missing.to_str().unwrap(),
        ])
        .unwrap();

        let err = run(&cli).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn unparsable_input_is_a_file_parsing_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target_path = temp_dir.path().join("target.pdb");
        fs::write(&target_path, "HEADER    NOTHING HERE\n").unwrap();
        let cli = Cli::try_parse_from([
            "trialign",
            "1.0",
            target_path.to_str().unwrap(),
            target_path.to_str().unwrap(),
        ])
        .unwrap();

        let err = run(&cli).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }
}
