mod check;
mod route;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use check::{CheckOutput, StderrSink, run_check, run_format};
pub use route::{build_context, read_tokens};

#[derive(Parser)]
#[command(name = "argsig")]
pub struct Cli {
    /// Config file to use instead of ./argsig.yml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum Commands {
    /// Validate arguments against a definition string
    Check(CheckArgs),
    /// Regroup quoted arguments and print them as JSON
    Format(FormatArgs),
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct CheckArgs {
    /// Definition string, e.g. "<role:Role> [target:User|string]"
    #[arg(long, short)]
    pub definition: String,

    /// Number of arguments to validate (defaults to every specification in the definition)
    #[arg(long)]
    pub length: Option<usize>,

    /// Username of the caller, used in messages and self lookups
    #[arg(long, default_value = "user")]
    pub author: String,

    /// Channel id or name the arguments were sent from
    #[arg(long)]
    pub channel: Option<String>,

    /// Treat the arguments as coming from a direct-message channel
    #[arg(long, conflicts_with = "channel")]
    pub direct: bool,

    /// Skip quote regrouping
    #[arg(long)]
    pub raw: bool,

    /// Arguments to validate (read from stdin when omitted)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct FormatArgs {
    /// Quote characters (overrides the config)
    #[arg(long)]
    pub quotes: Option<String>,

    /// Arguments to regroup (read from stdin when omitted)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}
