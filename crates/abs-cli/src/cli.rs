//! CLI argument definitions.

use std::path::PathBuf;

use abs_model::{Domain, Wave};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "abs-harmonize",
    version,
    about = "Harmonize multi-wave survey data into one cross-wave dataset",
    long_about = "Harmonize survey waves (W2..W6) against a concept registry.\n\n\
                  Cleans missing-value codes, reverses scales whose polarity differs\n\
                  between waves, and stacks all waves into one long table with\n\
                  concept-named columns."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harmonize every wave in a data folder and write the assembled dataset.
    Harmonize(HarmonizeArgs),

    /// List registry concepts.
    Concepts(ConceptsArgs),

    /// Print the harmonization codebook.
    Codebook(RegistryArgs),

    /// Show per-wave availability of one concept in a data folder.
    Concept(ConceptArgs),
}

/// Registry sources; the built-in tables are used for anything not given.
#[derive(Args, Clone, Default)]
pub struct RegistryArgs {
    /// Concept registry CSV.
    #[arg(long = "registry", value_name = "CSV")]
    pub registry: Option<PathBuf>,

    /// Scale family TOML.
    #[arg(long = "families", value_name = "TOML")]
    pub families: Option<PathBuf>,
}

#[derive(Args)]
pub struct HarmonizeArgs {
    /// Folder with one CSV per wave (file names containing W2..W6).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Output directory (default: <DATA_DIR>/harmonized).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Harmonize waves in parallel.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Harmonize and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ConceptsArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Only concepts of this domain.
    #[arg(long = "domain", value_parser = parse_domain)]
    pub domain: Option<Domain>,

    /// Only concepts mapped in this wave.
    #[arg(long = "wave", value_parser = parse_wave)]
    pub wave: Option<Wave>,
}

#[derive(Args)]
pub struct ConceptArgs {
    /// Concept name, e.g. trust_executive.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Folder with one CSV per wave.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Apply label-based missing-value cleaning before counting.
    #[arg(long = "clean")]
    pub clean: bool,
}

fn parse_domain(value: &str) -> Result<Domain, String> {
    value.parse::<Domain>().map_err(|e| e.to_string())
}

fn parse_wave(value: &str) -> Result<Wave, String> {
    value.parse::<Wave>().map_err(|e| e.to_string())
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
