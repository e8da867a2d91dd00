use std::path::PathBuf;

use clap::Parser;

use crate::models::Ecosystem;

#[derive(Parser, Debug)]
#[command(
    name = "license-matchr",
    about = "Identify dependency licenses by matching license files against known texts",
    version
)]
pub struct Cli {
    /// Project path to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Directory in which the search index is/should be stored [default: ~/.license-matchr]
    #[arg(short, long, env = "LICENSE_MATCHR_INDEX_DIR", value_name = "DIR")]
    pub index: Option<PathBuf>,

    /// Config file [default: ./.license-matchr/config.toml, fallback ~/.config/license-matchr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Render output as JSON (same as `--report json`)
    #[arg(short, long)]
    pub json: bool,

    /// Maximum number of dependencies classified concurrently
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Record per-dependency failures instead of aborting the run
    #[arg(long)]
    pub keep_going: bool,

    /// Exclude an ecosystem from scanning (repeatable)
    #[arg(long = "exclude-lang", value_name = "LANG")]
    pub exclude_lang: Vec<EcosystemArg>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum EcosystemArg {
    Go,
    Rust,
}

impl From<&EcosystemArg> for Ecosystem {
    fn from(arg: &EcosystemArg) -> Self {
        match arg {
            EcosystemArg::Go => Ecosystem::Go,
            EcosystemArg::Rust => Ecosystem::Rust,
        }
    }
}
