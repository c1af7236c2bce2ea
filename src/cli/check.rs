use async_trait::async_trait;
use serde::Serialize;

use crate::analyser::lookup::Context;
use crate::analyser::{Definition, Failure, MessageSink, Validator, Value, format_with};
use crate::config::Config;

use super::{CheckArgs, FormatArgs, build_context};

/// Result of `argsig check`, printed as JSON on stdout.
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub usable: bool,
    pub collected: Vec<Value>,
    pub failures: Vec<Failure>,
}

/// Writes failure messages to stderr, one per line.
pub struct StderrSink;

#[async_trait]
impl MessageSink for StderrSink {
    async fn send(&self, _context: &Context, text: &str) {
        eprintln!("{text}");
    }
}

/// Validate `tokens` against the definition in `args`.
///
/// Tokens are regrouped with the configured quotes unless `--raw` is set.
/// Without `--length`, every specification in the definition is checked.
pub async fn run_check(
    args: &CheckArgs,
    tokens: Vec<String>,
    config: &Config,
    sink: impl MessageSink + 'static,
) -> Result<CheckOutput, anyhow::Error> {
    let definition = match args.length {
        Some(length) => Definition::parse(&args.definition, length)?,
        None => Definition::parse_all(&args.definition)?,
    };

    let tokens = if args.raw {
        tokens
    } else {
        format_with(&tokens, &config.quotes())
    };

    let directory = config.directory.clone().unwrap_or_default();
    let context = build_context(args, &directory);

    let mut validator = Validator::new(definition, tokens, context)
        .with_options(config.options())
        .with_lookup(config.lookup())
        .with_sink(sink);
    validator.validate().await;

    Ok(CheckOutput {
        usable: validator.is_usable(),
        collected: validator.collected().to_vec(),
        failures: validator.failures().to_vec(),
    })
}

/// Regroup `tokens`, preferring `--quotes` over the configured quotes.
pub fn run_format(args: &FormatArgs, tokens: Vec<String>, config: &Config) -> Vec<String> {
    let quotes = match &args.quotes {
        Some(q) => q.chars().collect(),
        None => config.quotes(),
    };
    format_with(&tokens, &quotes)
}
