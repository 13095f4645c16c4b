//! UrlGrid - URL set generation and bulk download
//!
//! This library builds ordered URL sets by crossing a placeholder template
//! (`http://host/{0}/{1}`) with one search range per placeholder, then
//! downloads the resulting set through a pluggable transport with optional
//! bounded parallelism, regex extraction, and early-stop conditions.
//!
//! The generation engine ([`site::Site`] over [`range::SearchRange`]) is the
//! core of the crate; the fetch layer ([`client::Client`] over
//! [`transport::Transport`]) consumes the finished URL lists.

pub mod client;
pub mod config;
pub mod range;
pub mod site;
pub mod transport;

pub use client::{
    CancelToken, Client, ClientError, DownloadHandle, DownloadOptions, DownloadOutcome,
    FetchFailure,
};
pub use config::{ConfigError, JobSpec, RangeSpec, SiteSpec};
pub use range::{Charset, DateUnit, NumberStyle, RangeError, SearchRange};
pub use site::{Site, SiteError};
pub use transport::{HttpTransport, Transport, TransportError};
