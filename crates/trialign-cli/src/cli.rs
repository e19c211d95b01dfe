use clap::Parser;
use std::path::PathBuf;
use trialign::engine::config::BackboneSelection;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "TriAlign Developers",
    version,
    about = "TriAlign CLI - Superimposes a model structure onto a target via backbone triangles.",
    help_template = HELP_TEMPLATE,
    allow_negative_numbers = true,
)]
pub struct Cli {
    /// Largest distance (in Angstrom) between two atoms considered corresponding.
    #[arg(value_name = "EPSILON")]
    pub epsilon: f64,

    /// Path to the target structure in PDB format; it stays fixed.
    #[arg(value_name = "TARGET_PDB")]
    pub target: PathBuf,

    /// Path to the model structure in PDB format; it is moved onto the target.
    #[arg(value_name = "MODEL_PDB")]
    pub model: PathBuf,

    /// Path for the transformed model [default: transformed.pdb].
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Backbone atoms to align: 'auto', 'ca' (alpha carbons) or 'p' (phosphates).
    /// 'auto' picks phosphates when the model starts with a nucleic-acid backbone atom.
    #[arg(short, long, value_name = "KIND")]
    pub backbone: Option<BackboneSelection>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.backbone=p
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}
