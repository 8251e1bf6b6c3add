mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use scrupal::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "scrupal")]
#[command(version, about = "Scrupal CLI - inspect and drive the Scrupal view layer", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "scrupal.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG or info otherwise
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List an application's routes in match order
    Routes {
        /// Application (apidoc or admin); defaults to routing.app
        #[arg(short, long)]
        app: Option<String>,
    },

    /// Show which route a path selects, without fetching anything
    Resolve {
        /// Path to resolve, e.g. /GET/modules/core
        path: String,

        #[arg(short, long)]
        app: Option<String>,
    },

    /// Navigate through one or more paths and print each rendered view
    Navigate {
        /// Paths to visit, in order
        #[arg(required = true)]
        paths: Vec<String>,

        #[arg(short, long)]
        app: Option<String>,

        /// API base URL; overrides api.base_url and SCRUPAL_API_URL
        #[arg(long)]
        api: Option<String>,

        /// Answer requests from a JSON fixtures file instead of the network
        #[arg(long, conflicts_with = "api")]
        fixtures: Option<PathBuf>,

        /// Print the view model as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Render a markdown file the way the marked directive does
    Markdown {
        /// Markdown source file
        file: PathBuf,
    },
}

/// Log filter for a verbosity count, falling back to RUST_LOG and then `info`
fn filter_directive(verbose: u8, rust_log: Option<String>) -> String {
    match verbose {
        0 => rust_log
            .filter(|directive| !directive.trim().is_empty())
            .unwrap_or_else(|| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn init_tracing(verbose: u8) {
    let directive = filter_directive(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // .env may carry SCRUPAL_API_URL and RUST_LOG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config)?.with_env_overrides();

    match cli.command {
        Commands::Routes { app } => {
            commands::routes::execute(&config, app.as_deref())?;
        }
        Commands::Resolve { path, app } => {
            commands::resolve::execute(&config, &path, app.as_deref())?;
        }
        Commands::Navigate {
            paths,
            app,
            api,
            fixtures,
            json,
        } => {
            let options = commands::navigate::Options {
                app,
                api,
                fixtures,
                json,
            };
            commands::navigate::execute(config, &paths, options)?;
        }
        Commands::Markdown { file } => {
            commands::markdown::execute(&config, &file)?;
        }
    }

    Ok(())
}
