use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use trialign::engine::config::{AlignmentConfig, AlignmentConfigBuilder, BackboneSelection};

pub const DEFAULT_OUTPUT_FILE: &str = "transformed.pdb";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    backbone: Option<BackboneSelection>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    path: Option<PathBuf>,
}

/// Settings read from the optional TOML configuration file. Every value is
/// optional; command-line arguments take precedence.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAlignConfig {
    search: Option<PartialSearchConfig>,
    output: Option<PartialOutputConfig>,
}

/// Everything a run of the aligner needs once files and flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignSettings {
    pub alignment: AlignmentConfig,
    pub output: PathBuf,
}

impl PartialAlignConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &Cli) -> Result<AlignSettings> {
        self.apply_set_values(&args.set_values)?;

        let search_config = self.search.take().unwrap_or_default();
        let output_config = self.output.take().unwrap_or_default();

        let backbone = args.backbone.or(search_config.backbone).unwrap_or_default();
        let alignment = AlignmentConfigBuilder::new()
            .epsilon(args.epsilon)
            .backbone(backbone)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let output = args
            .output
            .clone()
            .or(output_config.path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

        debug!(
            "Merged configuration: epsilon = {}, backbone = {}, output = {:?}",
            alignment.epsilon, alignment.backbone, output
        );
        Ok(AlignSettings { alignment, output })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key.trim() {
                "search.backbone" => {
                    let backbone = value_str.parse().map_err(|e| {
                        CliError::Config(format!("Invalid value for {}: {}", key, e))
                    })?;
                    self.search.get_or_insert_with(Default::default).backbone = Some(backbone);
                }
                "output.path" => {
                    if value_str.trim().is_empty() {
                        return Err(CliError::Config(format!("Empty path given for {}", key)));
                    }
                    self.output.get_or_insert_with(Default::default).path =
                        Some(PathBuf::from(value_str.trim()));
                }
                other => {
                    return Err(CliError::Config(format!(
                        "Unknown configuration key '{}'. Supported: search.backbone, output.path.",
                        other
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["trialign"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = PartialAlignConfig::default()
            .merge_with_cli(&cli(&["0.5", "t.pdb", "m.pdb"]))
            .unwrap();

        assert_eq!(settings.alignment.epsilon, 0.5);
        assert_eq!(settings.alignment.backbone, BackboneSelection::Auto);
        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT_FILE));
    }

    #[test]
    fn file_values_are_loaded() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("trialign.toml");
        fs::write(
            &config_path,
            r#"
        [search]
        backbone = "rna"

        [output]
        path = "aligned.pdb"
        "#,
        )
        .unwrap();

        let settings = PartialAlignConfig::from_file(&config_path)
            .unwrap()
            .merge_with_cli(&cli(&["1.5", "t.pdb", "m.pdb"]))
            .unwrap();

        assert_eq!(settings.alignment.backbone, BackboneSelection::Phosphate);
        assert_eq!(settings.output, PathBuf::from("aligned.pdb"));
    }

    #[test]
    fn cli_args_override_file_values() {
        let partial: PartialAlignConfig = toml::from_str(
            r#"
        [search]
        backbone = "p"
        [output]
        path = "from-file.pdb"
        "#,
        )
        .unwrap();

        let settings = partial
            .merge_with_cli(&cli(&["-b", "ca", "-o", "from-cli.pdb", "0.5", "t.pdb", "m.pdb"]))
            .unwrap();

        assert_eq!(settings.alignment.backbone, BackboneSelection::CAlpha);
        assert_eq!(settings.output, PathBuf::from("from-cli.pdb"));
    }

    #[test]
    fn set_values_override_file_values() {
        let partial: PartialAlignConfig = toml::from_str("[search]\nbackbone = \"ca\"\n").unwrap();

        let settings = partial
            .merge_with_cli(&cli(&[
                "-S",
                "search.backbone=phosphate",
                "-S",
                "output.path=set.pdb",
                "0.5",
                "t.pdb",
                "m.pdb",
            ]))
            .unwrap();

        assert_eq!(settings.alignment.backbone, BackboneSelection::Phosphate);
        assert_eq!(settings.output, PathBuf::from("set.pdb"));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for set in ["search.backbone", "search.backbone=dna", "search.epsilon=2", "output.path= "] {
            let args = cli(&["-S", set, "0.5", "t.pdb", "m.pdb"]);
            let result = PartialAlignConfig::default().merge_with_cli(&args);
            assert!(matches!(result, Err(CliError::Config(_))), "'{}' should be rejected", set);
        }
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[search]\nradius = 3.0\n").unwrap();

        let result = PartialAlignConfig::from_file(&config_path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_epsilon_is_a_configuration_error() {
        for epsilon in ["0", "-2.5"] {
            let args = cli(&[epsilon, "t.pdb", "m.pdb"]);
            let result = PartialAlignConfig::default().merge_with_cli(&args);
            assert!(matches!(result, Err(CliError::Config(_))));
        }
    }
}
