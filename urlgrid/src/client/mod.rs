//! Download orchestration over generated URL sets.
//!
//! A [`Client`] owns a list of [`Site`]s and a [`Transport`]. A download
//! visits every generated URL in order, fetches it, and aggregates the
//! texts - whole documents, or per-match extractions when a site carries an
//! extract pattern, stopping a site early when its stop pattern matches.
//!
//! One download runs at a time per client; a second start is rejected with
//! [`ClientError::DownloadInProgress`]. Work fans out across a bounded
//! worker pool once the URL set is large enough (see [`DownloadOptions`]).
//! Site mutation is caller-synchronized: finish configuring sites before
//! starting a download.
//!
//! # Example
//!
//! ```ignore
//! use urlgrid::client::Client;
//! use urlgrid::range::SearchRange;
//! use urlgrid::site::Site;
//!
//! let site = Site::new(
//!     "http://example.com/archive/{0}",
//!     vec![SearchRange::numbers(1, 50)?],
//! )?;
//! let client = Client::with_http(vec![site])?;
//! let outcome = client.download()?;
//! for text in &outcome.results {
//!     println!("{} bytes", text.len());
//! }
//! ```

mod error;
mod extract;
mod pool;

pub use error::ClientError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::info;
use url::Url;

use crate::site::Site;
use crate::transport::{HttpTransport, Transport, TransportError};

use extract::ExtractMode;

/// Progress callback: `(completed_urls, total_urls)` after every fetch.
pub type ProgressHook = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Capture group name `download_as_site` resolves URLs from by default.
pub const DEFAULT_URL_GROUP: &str = "url";

/// Tuning knobs for one client's downloads.
#[derive(Clone, Debug)]
pub struct DownloadOptions {
    /// Fan out across workers when the URL set is large enough.
    pub parallel: bool,

    /// Worker bound for parallel runs. Runs with 8 or fewer URLs stay on
    /// one worker regardless.
    pub max_workers: usize,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_workers: pool::DEFAULT_MAX_WORKERS,
        }
    }
}

/// A fetch that failed at the transport level, kept alongside the results
/// instead of aborting the run.
#[derive(Clone, Debug)]
pub struct FetchFailure {
    pub url: String,
    pub error: TransportError,
}

/// The aggregated payload of one download: ordered results plus any
/// per-URL transport failures.
#[derive(Clone, Debug, Default)]
pub struct DownloadOutcome {
    pub results: Vec<String>,
    pub errors: Vec<FetchFailure>,
}

/// Cooperative cancellation for a running download.
///
/// Cancellation is honored between per-URL fetches: an in-flight request
/// finishes, everything not yet dispatched is skipped. The flag is reset
/// when a new download begins.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a background download started with [`Client::start`].
pub struct DownloadHandle {
    join: thread::JoinHandle<()>,
    cancel: CancelToken,
}

impl DownloadHandle {
    /// Requests cancellation of the running download.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the download (and its completion callback) to finish.
    pub fn join(self) -> thread::Result<()> {
        self.join.join()
    }
}

/// The download orchestrator: sites plus a transport.
pub struct Client<T: Transport> {
    transport: T,
    sites: Vec<Site>,
    options: DownloadOptions,
    busy: AtomicBool,
    cancel: CancelToken,
    progress: Option<ProgressHook>,
}

impl Client<HttpTransport> {
    /// Creates a client over the default HTTP transport.
    pub fn with_http(sites: Vec<Site>) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new()?, sites))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client with an explicit transport.
    pub fn new(transport: T, sites: Vec<Site>) -> Self {
        Self {
            transport,
            sites,
            options: DownloadOptions::default(),
            busy: AtomicBool::new(false),
            cancel: CancelToken::default(),
            progress: None,
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Mutable access to the sites. Exclusive borrow rules make mutation
    /// during a background download impossible without an external lock.
    pub fn sites_mut(&mut self) -> &mut Vec<Site> {
        &mut self.sites
    }

    pub fn push_site(&mut self, site: Site) {
        self.sites.push(site);
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DownloadOptions) {
        self.options = options;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport's fallback decode charset.
    pub fn encoding(&self) -> &str {
        self.transport.encoding()
    }

    /// Replaces the transport's fallback decode charset.
    pub fn set_encoding(&mut self, charset: &str) {
        self.transport.set_encoding(charset);
    }

    /// Installs a progress callback invoked after every fetch.
    pub fn set_progress_hook(&mut self, hook: ProgressHook) {
        self.progress = Some(hook);
    }

    /// A token that cancels the current (or next) download.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// True while a download is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Runs a download to completion on the calling thread.
    ///
    /// Fails with [`ClientError::NoSites`] when no sites are attached,
    /// [`ClientError::EmptyUrlSet`] when any site has an empty URL list,
    /// and [`ClientError::DownloadInProgress`] when another download is
    /// running.
    pub fn download(&self) -> Result<DownloadOutcome, ClientError> {
        self.begin()?;
        let outcome = self.run_locked(ExtractMode::Standard);
        self.finish();
        Ok(outcome)
    }

    /// Starts a download on a background thread.
    ///
    /// Preconditions are checked synchronously; the client stays busy until
    /// the download finishes, after which `on_complete` receives the
    /// outcome. The returned handle cancels and joins the run.
    pub fn start<F>(self: Arc<Self>, on_complete: F) -> Result<DownloadHandle, ClientError>
    where
        T: 'static,
        F: FnOnce(DownloadOutcome) + Send + 'static,
    {
        self.begin()?;
        let cancel = self.cancel.clone();
        let join = thread::spawn(move || {
            let outcome = self.run_locked(ExtractMode::Standard);
            self.finish();
            on_complete(outcome);
        });
        Ok(DownloadHandle { join, cancel })
    }

    /// Downloads and re-aggregates the extracted URLs into one site.
    ///
    /// Every site must carry an extract pattern with the named capture
    /// group `url_group` ([`DEFAULT_URL_GROUP`] by convention); each
    /// match's group value must parse as an absolute URL. Transport
    /// failures are returned alongside the site.
    pub fn download_as_site(
        &self,
        url_group: &str,
    ) -> Result<(Site, Vec<FetchFailure>), ClientError> {
        for (index, site) in self.sites.iter().enumerate() {
            let has_group = site
                .extract_pattern()
                .map(|p| p.capture_names().flatten().any(|name| name == url_group))
                .unwrap_or(false);
            if !has_group {
                return Err(ClientError::MissingUrlGroup {
                    site: index,
                    group: url_group.to_string(),
                });
            }
        }

        self.begin()?;
        let outcome = self.run_locked(ExtractMode::Group(url_group));
        self.finish();

        let mut urls = Vec::with_capacity(outcome.results.len());
        for value in outcome.results {
            if Url::parse(&value).is_err() {
                return Err(ClientError::UrlConversion { value });
            }
            urls.push(value);
        }
        Ok((Site::from_urls(urls), outcome.errors))
    }

    /// Checks preconditions and claims the busy flag.
    fn begin(&self) -> Result<(), ClientError> {
        if self.sites.is_empty() {
            return Err(ClientError::NoSites);
        }
        if let Some(site) = self.sites.iter().position(|s| s.urls().is_empty()) {
            return Err(ClientError::EmptyUrlSet { site });
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClientError::DownloadInProgress);
        }
        self.cancel.reset();
        Ok(())
    }

    fn run_locked(&self, mode: ExtractMode<'_>) -> DownloadOutcome {
        let total_urls: usize = self.sites.iter().map(|s| s.urls().len()).sum();
        info!(
            sites = self.sites.len(),
            urls = total_urls,
            parallel = self.options.parallel,
            "starting download"
        );

        let outcome = pool::run(
            &self.sites,
            &self.transport,
            mode,
            &self.cancel,
            self.progress.as_ref(),
            self.options.parallel,
            self.options.max_workers,
        );

        info!(
            results = outcome.results.len(),
            errors = outcome.errors.len(),
            cancelled = self.cancel.is_cancelled(),
            "download finished"
        );
        outcome
    }

    fn finish(&self) {
        self.busy.store(false, Ordering::Release);
    }
}
