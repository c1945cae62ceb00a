//! keyref - secret references for layered env files.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keyref::cli::output;
use keyref::cli::{execute, Cli};
use keyref::error::{ConfigError, Error, IdentityError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("KEYREF_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("keyref=debug")
        } else {
            EnvFilter::new("keyref=warn")
        }
    });

    // KEYREF_LOG_FORMAT=json switches to one JSON object per event.
    let json = std::env::var("KEYREF_LOG_FORMAT").is_ok_and(|v| v == "json");
    let (plain, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (
            Some(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .init();

    match execute(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let hint = match &e {
                Error::Config(ConfigError::NotInitialized) => Some("run: keyref init"),
                Error::Config(ConfigError::NoBackends) => {
                    Some("add a [[backends]] entry to .keyref.toml")
                }
                Error::Identity(IdentityError::NotFound(_)) => Some("run: keyref init"),
                _ => None,
            };

            output::error(&e.to_string());
            if let Some(hint) = hint {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}
