//! JSON job specifications.
//!
//! A job spec describes a download job - sites, ranges, extraction
//! patterns, and download options - in a serde-friendly shape that builds
//! the corresponding core types. The CLI loads these from disk; library
//! users can construct the core types directly and skip this module.
//!
//! ```json
//! {
//!   "sites": [
//!     {
//!       "template": "http://example.com/archive/{0}/page/{1}",
//!       "ranges": [
//!         { "type": "dates", "from": "2024-01-01", "to": "2024-03-01" },
//!         { "type": "numbers", "from": 1, "to": 40 }
//!       ],
//!       "extract": "<a href=\"(?P<url>[^\"]*)\">"
//!     }
//!   ],
//!   "download": { "parallel": true, "max_workers": 6 }
//! }
//! ```

use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::DownloadOptions;
use crate::range::{Charset, DateUnit, NumberStyle, RangeError, SearchRange, DEFAULT_DATE_FORMAT};
use crate::site::{Site, SiteError};

/// Errors raised while loading or building a job spec.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read job spec: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse job spec: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid range in job spec: {0}")]
    Range(#[from] RangeError),

    #[error("invalid site in job spec: {0}")]
    Site(#[from] SiteError),

    #[error("invalid pattern in job spec: {0}")]
    Pattern(#[from] regex::Error),
}

/// A whole download job: sites plus download options.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JobSpec {
    pub sites: Vec<SiteSpec>,

    #[serde(default)]
    pub download: DownloadSpec,
}

impl JobSpec {
    /// Loads a job spec from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a job spec from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds every site in the spec.
    pub fn build_sites(&self) -> Result<Vec<Site>, ConfigError> {
        self.sites.iter().map(SiteSpec::build).collect()
    }

    /// Download options described by the spec.
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            parallel: self.download.parallel,
            max_workers: self.download.max_workers,
        }
    }
}

/// Download tuning in spec form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSpec {
    pub parallel: bool,
    pub max_workers: usize,

    /// Fallback decode charset handed to the transport.
    pub encoding: Option<String>,
}

impl Default for DownloadSpec {
    fn default() -> Self {
        let options = DownloadOptions::default();
        Self {
            parallel: options.parallel,
            max_workers: options.max_workers,
            encoding: None,
        }
    }
}

/// One site: a template, its ranges, and optional patterns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteSpec {
    pub template: String,

    #[serde(default)]
    pub ranges: Vec<RangeSpec>,

    /// Extraction pattern; each match becomes one result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,

    /// Early-stop pattern; a match ends the site's remaining URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_on: Option<String>,
}

impl SiteSpec {
    /// Builds the site, compiling patterns and validating the template.
    pub fn build(&self) -> Result<Site, ConfigError> {
        let ranges = self
            .ranges
            .iter()
            .map(RangeSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        let mut site = Site::new(&self.template, ranges)?;

        if let Some(pattern) = &self.extract {
            site.set_extract_pattern(Some(Regex::new(pattern)?));
        }
        if let Some(pattern) = &self.stop_on {
            site.set_stop_pattern(Some(Regex::new(pattern)?));
        }
        Ok(site)
    }
}

/// One search range in spec form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RangeSpec {
    /// Explicit substitution texts.
    Texts { values: Vec<String> },

    /// Numeric span, optionally zero-padded to the width of `to`.
    Numbers {
        from: u64,
        to: u64,
        #[serde(default = "default_step")]
        step: u64,
        #[serde(default)]
        zero_padded: bool,
    },

    /// Calendar date span.
    Dates {
        from: NaiveDate,
        to: NaiveDate,
        #[serde(default = "default_date_step")]
        step: u32,
        #[serde(default)]
        unit: DateUnit,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },

    /// Predefined character set.
    Charset { set: Charset },
}

fn default_step() -> u64 {
    1
}

fn default_date_step() -> u32 {
    1
}

impl RangeSpec {
    /// Builds the search range, validating bounds.
    pub fn build(&self) -> Result<SearchRange, ConfigError> {
        let range = match self {
            Self::Texts { values } => SearchRange::from_texts(values.iter().cloned())?,
            Self::Numbers {
                from,
                to,
                step,
                zero_padded,
            } => {
                let style = if *zero_padded {
                    NumberStyle::ZeroPadded
                } else {
                    NumberStyle::Plain
                };
                SearchRange::numbers_with(*from, *to, *step, style)?
            }
            Self::Dates {
                from,
                to,
                step,
                unit,
                format,
            } => SearchRange::dates_with(
                *from,
                *to,
                *step,
                *unit,
                format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT),
            )?,
            Self::Charset { set } => SearchRange::charset(*set),
        };
        Ok(range)
    }
}
