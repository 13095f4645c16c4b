//! Error types for the download orchestrator.

use thiserror::Error;

/// Precondition and configuration failures of a
/// [`Client`](crate::client::Client).
///
/// Transport-level failures are not represented here: they are collected
/// per URL in [`DownloadOutcome::errors`](crate::client::DownloadOutcome)
/// so one unreachable URL does not abort a whole run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A download was requested with no sites attached.
    #[error("client has no sites to download")]
    NoSites,

    /// A site's generated URL list is empty.
    #[error("site {site} has an empty URL set; check its template and ranges")]
    EmptyUrlSet { site: usize },

    /// A download is already running on this client.
    #[error("a download is already in progress")]
    DownloadInProgress,

    /// `download_as_site` needs every site to extract the named group.
    #[error("site {site} has no extract pattern with capture group '{group}'")]
    MissingUrlGroup { site: usize, group: String },

    /// An extracted value could not be parsed as an absolute URL.
    #[error("extracted value is not an absolute URL: {value}")]
    UrlConversion { value: String },
}
