use clap::Parser;
use std::process::ExitCode;
use tidyname::cli::{Cli, run_cli};
use tidyname::output::OutputFormatter;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `tidyname=debug`.
const LOG_ENV_VAR: &str = "TIDYNAME_LOG";

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("tidyname=info"),
        _ => EnvFilter::new("tidyname=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A missing .env file is fine; anything else is worth a warning.
fn dotenv_warning(error: &dotenvy::Error) -> Option<String> {
    if error.not_found() {
        None
    } else {
        Some(format!("Failed to load .env file: {}", error))
    }
}

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) => {
            if let Some(message) = dotenv_warning(&e) {
                warn!("{}", message);
            }
        }
    }

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.json {
                OutputFormatter::error(&format!("Error: {}", e));
            }
            ExitCode::FAILURE
        }
    }
}
