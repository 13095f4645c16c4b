//! UrlGrid CLI - generate URL sets and run bulk downloads from job specs.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "urlgrid", version, about = "Templated URL set generation and bulk download")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the URL set a job spec generates, without downloading.
    Generate(commands::generate::GenerateArgs),

    /// Download every generated URL and print the results.
    Fetch(commands::fetch::FetchArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => commands::generate::run(args),
        Command::Fetch(args) => commands::fetch::run(args),
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
