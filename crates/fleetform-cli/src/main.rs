mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fleetform")]
#[command(version, about = "Fleetform CLI - declarative validation for forms and payloads", long_about = None)]
struct Cli {
    /// Path to fleetform.toml
    #[arg(short, long, global = true, default_value = "fleetform.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data bag against a rule specification
    Check {
        /// Rule specification (JSON object of field -> rules)
        #[arg(short, long)]
        rules: PathBuf,

        /// Data bag as JSON (reads stdin when omitted)
        #[arg(short, long, conflicts_with = "form")]
        data: Option<PathBuf>,

        /// Data as an application/x-www-form-urlencoded body
        #[arg(short, long)]
        form: Option<PathBuf>,

        /// Print the error map as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Strip tags and HTML-escape every string in a JSON document
    Sanitize {
        /// Input JSON (reads stdin when omitted)
        input: Option<PathBuf>,
    },

    /// List the rules known to the catalog
    Rules,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let config = fleetform::Config::load(&cli.config)?;

    // Execute command
    match cli.command {
        Commands::Check {
            rules,
            data,
            form,
            json,
        } => {
            let input = match form {
                Some(path) => commands::Input::Form(path),
                None => commands::Input::Json(data),
            };
            if !commands::check::execute(&config, &rules, input, json)? {
                std::process::exit(1);
            }
        }
        Commands::Sanitize { input } => {
            commands::sanitize::execute(input.as_deref())?;
        }
        Commands::Rules => {
            commands::rules::execute(&config);
        }
    }

    Ok(())
}
