//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the finished discussion
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full transcript with all turns and references
    Full,
    /// Only the closing summary and references
    Summary,
    /// JSON snapshot of the session
    Json,
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Simulated clinical-research roundtable of five AI personas")]
#[command(long_about = r#"
Roundtable runs a staged discussion among five fixed clinical-research
personas to co-author a study protocol.

The discussion walks a fixed stage sequence (problem presentation,
literature review, study design, statistical plan, execution plan) and
closes with a consensus summary by the clinical director. Each stage is
opened by its leader persona; every other persona responds in turn.

With --interactive you can interject while the discussion runs. Prefix a
line with @<role> to address one persona directly, e.g.:

  @statistician 每组样本量需要多少？

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./roundtable.toml   Project-level config
3. ~/.config/roundtable/config.toml   Global config

Without an API key (ROUNDTABLE_API_KEY) the personas answer with built-in
templated replies, so the flow works fully offline.

Example:
  roundtable --title "Metformin CV outcomes" "二甲双胍对2型糖尿病患者心血管结局的影响"
"#)]
pub struct Cli {
    /// The clinical question to discuss
    pub question: Option<String>,

    /// Session title (defaults to the question)
    #[arg(short, long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Read interventions from stdin while the discussion runs
    #[arg(short, long)]
    pub interactive: bool,

    /// List the fixed personas and exit
    #[arg(long)]
    pub list_personas: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress live message output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
