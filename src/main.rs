use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use medrelay::adapter::{HttpTableStore, OpenAi};
use medrelay::application::{workflow, ToolRegistry};
use medrelay::config::Config;
use medrelay::error::{Error, Result};

/// Clinical record synchronization and AI workflow orchestration backend.
#[derive(Parser)]
#[command(name = "medrelay", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "medrelay.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered workflow tools.
    Tools,
    /// Dispatch one tool by name with a JSON argument object.
    Run {
        /// Tool name, e.g. `generate_orders_from_latest_diagnosis`.
        name: String,
        /// JSON argument object for the tool.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            return ExitCode::FAILURE;
        }
    };

    config.init_logging();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let registry = build_registry(config)?;

    match command {
        Command::Tools => {
            for name in registry.names() {
                let description = registry.get(name).map(|t| t.description()).unwrap_or("");
                println!("{name}  -  {description}");
            }
            Ok(())
        }
        Command::Run { name, args } => {
            let args: serde_json::Value = serde_json::from_str(&args)
                .map_err(|e| Error::Validation(format!("arguments are not valid JSON: {e}")))?;

            info!(tool = %name, "Dispatching");
            let result = registry.dispatch(&name, args).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

fn build_registry(config: &Config) -> Result<ToolRegistry> {
    let store = Arc::new(HttpTableStore::from_config(&config.store));
    let inference = Arc::new(OpenAi::from_env(&config.inference)?);

    let mut registry = ToolRegistry::new();
    workflow::tools::register_defaults(&mut registry, store, inference);
    Ok(registry)
}
