//! Shopchat server
//!
//! Command-line entry point for the embedded app backend

use clap::{Parser, Subcommand};
use shopchat_server::commands;

#[derive(Debug, Parser)]
#[command(name = "shopchat-server")]
#[command(about = "Shopchat - embedded commerce app backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Validate required configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::CheckConfig => commands::check_config::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
