//! `urlgrid generate` - print the URL set a job spec produces.

use std::path::PathBuf;

use clap::Args;
use urlgrid::config::JobSpec;
use urlgrid::range::SearchRange;
use urlgrid::site::Site;

use super::CommandResult;

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to a JSON job spec.
    #[arg(long, conflicts_with = "template")]
    pub config: Option<PathBuf>,

    /// Ad-hoc template with {0}, {1}, ... placeholders.
    #[arg(long)]
    pub template: Option<String>,

    /// Comma-separated items for one placeholder; repeat per placeholder.
    #[arg(long = "range", value_name = "ITEMS")]
    pub ranges: Vec<String>,
}

pub fn run(args: GenerateArgs) -> CommandResult {
    let sites = build_sites(&args)?;

    for site in &sites {
        for url in site.urls() {
            println!("{url}");
        }
    }
    Ok(())
}

fn build_sites(args: &GenerateArgs) -> Result<Vec<Site>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.config {
        return Ok(JobSpec::from_path(path)?.build_sites()?);
    }

    let Some(template) = &args.template else {
        return Err("pass --config or --template".into());
    };
    let ranges = args
        .ranges
        .iter()
        .map(|items| SearchRange::from_texts(split_items(items)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(vec![Site::new(template, ranges)?])
}

/// Splits a `--range` argument into its comma-separated items.
fn split_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_items() {
        assert_eq!(split_items("a1, a2,a3"), vec!["a1", "a2", "a3"]);
        assert_eq!(split_items("a1,,a2"), vec!["a1", "a2"]);
    }

    #[test]
    fn test_build_sites_from_template_args() {
        let args = GenerateArgs {
            config: None,
            template: Some("http://example.com/{0}/{1}".to_string()),
            ranges: vec!["a1,a2".to_string(), "b1,b2".to_string()],
        };

        let sites = build_sites(&args).unwrap();
        assert_eq!(sites[0].urls().len(), 4);
        assert_eq!(sites[0].urls()[0], "http://example.com/a1/b1");
    }

    #[test]
    fn test_build_sites_requires_a_source() {
        let args = GenerateArgs {
            config: None,
            template: None,
            ranges: Vec::new(),
        };
        assert!(build_sites(&args).is_err());
    }
}
