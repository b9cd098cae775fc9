mod cli;

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use waypost_core::config::{FileSource, SettingsRegistry};
use waypost_core::{logging, Error, Result};

#[derive(Debug, Serialize)]
struct CheckReport {
    ok: bool,
    error: Option<String>,
}

fn build_registry(config: Option<&str>) -> SettingsRegistry {
    match config {
        Some(path) => {
            SettingsRegistry::with_source(Box::new(FileSource::with_path(PathBuf::from(path))))
        }
        None => SettingsRegistry::new(),
    }
}

fn run(cli: cli::Cli) -> Result<()> {
    let mut registry = build_registry(cli.config.as_deref());

    match cli.command {
        cli::Command::Check { format } => {
            let outcome = registry.load(None);
            match format {
                cli::OutputFormat::Text => {
                    outcome?;
                    println!("configuration OK");
                }
                cli::OutputFormat::Json => {
                    let report = CheckReport {
                        ok: outcome.is_ok(),
                        error: outcome.err().map(|err| err.to_string()),
                    };
                    let rendered = serde_json::to_string_pretty(&report).map_err(|err| {
                        Error::Config(format!("failed to render check report: {err}"))
                    })?;
                    println!("{rendered}");
                    if !report.ok {
                        std::process::exit(1);
                    }
                }
            }
        }
        cli::Command::Show => {
            let snapshot = registry.snapshot()?;
            let rendered = serde_json::to_string_pretty(&Value::Object(snapshot))
                .map_err(|err| Error::Config(format!("failed to render settings: {err}")))?;
            println!("{rendered}");
        }
        cli::Command::Get { key } => match registry.get(&key)? {
            Value::String(text) => println!("{text}"),
            other => println!("{other}"),
        },
    }

    Ok(())
}

fn main() {
    logging::init_tracing("info");

    let cli = cli::Cli::parse_args();
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
