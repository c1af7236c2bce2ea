use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use argsig::cli::{Cli, Commands, StderrSink, read_tokens, run_check, run_format};
use argsig::config::{ConfigLoader, DefaultConfigLoader};

fn init_logging() {
    let filter = EnvFilter::try_from_env("ARGSIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let mut loader = DefaultConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_explicit_path(path);
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match loader.load(&cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("argsig: config error: {e}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::Check(args) => match read_tokens(&args.tokens, std::io::stdin()) {
            Ok(tokens) => run_check(&args, tokens, &config, StderrSink)
                .await
                .and_then(|output| {
                    println!("{}", serde_json::to_string(&output)?);
                    Ok(if output.usable { 0 } else { 1 })
                }),
            Err(e) => Err(e),
        },
        Commands::Format(args) => read_tokens(&args.tokens, std::io::stdin()).and_then(|tokens| {
            let formatted = run_format(&args, tokens, &config);
            println!("{}", serde_json::to_string(&formatted)?);
            Ok(0)
        }),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("argsig: {e}");
            ExitCode::from(2)
        }
    }
}
