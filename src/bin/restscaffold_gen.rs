use clap::Parser;
use restscaffold::cli::{run_cli, Cli};
use restscaffold::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&LogConfig::from_env()) {
        eprintln!("Warning: failed to initialise logging: {e}");
    }
    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
