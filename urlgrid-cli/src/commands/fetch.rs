//! `urlgrid fetch` - download every generated URL and print the results.

use std::path::PathBuf;

use clap::Args;
use tracing::info;
use urlgrid::client::{Client, DownloadOptions};
use urlgrid::config::JobSpec;

use super::CommandResult;

#[derive(Args)]
pub struct FetchArgs {
    /// Path to a JSON job spec.
    #[arg(long)]
    pub config: PathBuf,

    /// Disable the worker pool and fetch URLs one by one.
    #[arg(long)]
    pub sequential: bool,

    /// Worker bound for parallel runs.
    #[arg(long)]
    pub workers: Option<usize>,
}

pub fn run(args: FetchArgs) -> CommandResult {
    let spec = JobSpec::from_path(&args.config)?;
    let sites = spec.build_sites()?;
    let options = resolve_options(&spec, &args);

    let mut client = Client::with_http(sites)?;
    client.set_options(options);
    if let Some(encoding) = &spec.download.encoding {
        client.set_encoding(encoding);
    }

    let outcome = client.download()?;
    info!(
        results = outcome.results.len(),
        errors = outcome.errors.len(),
        "fetch finished"
    );

    for text in &outcome.results {
        println!("{text}");
    }
    for failure in &outcome.errors {
        eprintln!("failed: {}", failure.error);
    }
    Ok(())
}

/// Spec options with command-line overrides applied.
fn resolve_options(spec: &JobSpec, args: &FetchArgs) -> DownloadOptions {
    let mut options = spec.download_options();
    if args.sequential {
        options.parallel = false;
    }
    if let Some(workers) = args.workers {
        options.max_workers = workers;
    }
    options
}
