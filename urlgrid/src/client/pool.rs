//! Bounded fan-out execution of one download run.
//!
//! A run visits every `(site, url)` pair, fetches through the transport,
//! and records one output per pair keyed by its position in the overall
//! walk. Fan-out granularity follows the site/URL ratio: when sites
//! outnumber URLs the workers pull whole sites, otherwise each site's URL
//! list is fanned out in turn. Outputs are sorted by key before delivery,
//! so sequential and parallel runs produce identical orderings.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::site::Site;
use crate::transport::Transport;

use super::extract::{self, ExtractMode};
use super::{CancelToken, DownloadOutcome, FetchFailure, ProgressHook};

/// At or below this many total URLs a run stays on one worker.
pub(crate) const SEQUENTIAL_URL_THRESHOLD: usize = 8;

/// Default worker bound for larger runs.
pub(crate) const DEFAULT_MAX_WORKERS: usize = 6;

/// Worker count for a run: 1 for small URL sets, the configured bound
/// otherwise.
pub(crate) fn effective_workers(total_urls: usize, configured: usize) -> usize {
    if total_urls <= SEQUENTIAL_URL_THRESHOLD {
        1
    } else {
        configured.max(1)
    }
}

/// Executes one download run and returns the aggregated outcome.
pub(crate) fn run<T: Transport>(
    sites: &[Site],
    transport: &T,
    mode: ExtractMode<'_>,
    cancel: &CancelToken,
    progress: Option<&ProgressHook>,
    parallel: bool,
    max_workers: usize,
) -> DownloadOutcome {
    let run = Run::new(sites, transport, mode, cancel, progress);
    let workers = if parallel {
        effective_workers(run.total_urls, max_workers)
    } else {
        1
    };

    if workers <= 1 {
        run.run_sequential();
    } else if sites.len() > run.total_urls {
        run.run_over_sites(workers);
    } else {
        run.run_over_urls(workers);
    }

    run.into_outcome()
}

/// One output per visited `(site, url)` pair.
enum UnitOutput {
    Texts(Vec<String>),
    Failed(FetchFailure),
}

/// Shared state of one run, borrowed by every worker.
struct Run<'a, T: Transport> {
    sites: &'a [Site],
    transport: &'a T,
    mode: ExtractMode<'a>,
    cancel: &'a CancelToken,
    progress: Option<&'a ProgressHook>,

    /// Prefix sums of URL counts; `offsets[s] + u` keys pair `(s, u)`.
    offsets: Vec<usize>,
    total_urls: usize,

    /// Per-site early-stop flags set by stop-pattern matches.
    stopped: Vec<AtomicBool>,
    done: AtomicUsize,
    outputs: Mutex<Vec<(usize, UnitOutput)>>,
}

impl<'a, T: Transport> Run<'a, T> {
    fn new(
        sites: &'a [Site],
        transport: &'a T,
        mode: ExtractMode<'a>,
        cancel: &'a CancelToken,
        progress: Option<&'a ProgressHook>,
    ) -> Self {
        let mut offsets = Vec::with_capacity(sites.len());
        let mut total_urls = 0;
        for site in sites {
            offsets.push(total_urls);
            total_urls += site.urls().len();
        }

        Self {
            sites,
            transport,
            mode,
            cancel,
            progress,
            offsets,
            total_urls,
            stopped: sites.iter().map(|_| AtomicBool::new(false)).collect(),
            done: AtomicUsize::new(0),
            outputs: Mutex::new(Vec::with_capacity(total_urls)),
        }
    }

    fn run_sequential(&self) {
        for site_idx in 0..self.sites.len() {
            for url_idx in 0..self.sites[site_idx].urls().len() {
                if self.cancel.is_cancelled() {
                    return;
                }
                if self.stopped[site_idx].load(Ordering::Acquire) {
                    break;
                }
                self.process(site_idx, url_idx);
            }
        }
    }

    /// Workers pull whole sites; each site's URLs stay sequential.
    fn run_over_sites(&self, workers: usize) {
        let cursor = AtomicUsize::new(0);
        thread::scope(|scope| {
            for _ in 0..workers.min(self.sites.len()) {
                scope.spawn(|| loop {
                    let site_idx = cursor.fetch_add(1, Ordering::Relaxed);
                    if site_idx >= self.sites.len() {
                        break;
                    }
                    for url_idx in 0..self.sites[site_idx].urls().len() {
                        if self.cancel.is_cancelled() {
                            return;
                        }
                        if self.stopped[site_idx].load(Ordering::Acquire) {
                            break;
                        }
                        self.process(site_idx, url_idx);
                    }
                });
            }
        });
    }

    /// Sites run in order; workers pull URLs within the current site.
    fn run_over_urls(&self, workers: usize) {
        for site_idx in 0..self.sites.len() {
            if self.cancel.is_cancelled() {
                return;
            }
            let url_count = self.sites[site_idx].urls().len();
            let cursor = AtomicUsize::new(0);
            thread::scope(|scope| {
                for _ in 0..workers.min(url_count) {
                    scope.spawn(|| loop {
                        if self.cancel.is_cancelled()
                            || self.stopped[site_idx].load(Ordering::Acquire)
                        {
                            break;
                        }
                        let url_idx = cursor.fetch_add(1, Ordering::Relaxed);
                        if url_idx >= url_count {
                            break;
                        }
                        self.process(site_idx, url_idx);
                    });
                }
            });
        }
    }

    /// Fetches one URL and records its output.
    fn process(&self, site_idx: usize, url_idx: usize) {
        let site = &self.sites[site_idx];
        let url = &site.urls()[url_idx];
        let key = self.offsets[site_idx] + url_idx;

        match self.transport.fetch(url) {
            Ok(text) => {
                if site.stop_pattern().is_some_and(|p| p.is_match(&text)) {
                    debug!(site = site_idx, url = %url, "stop pattern matched, ending site early");
                    self.stopped[site_idx].store(true, Ordering::Release);
                } else {
                    let texts = extract::apply(self.mode, site.extract_pattern(), &text);
                    self.outputs.lock().push((key, UnitOutput::Texts(texts)));
                }
            }
            Err(error) => {
                warn!(url = %url, %error, "fetch failed");
                self.outputs.lock().push((
                    key,
                    UnitOutput::Failed(FetchFailure {
                        url: url.clone(),
                        error,
                    }),
                ));
            }
        }

        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(hook) = self.progress {
            hook(done, self.total_urls);
        }
    }

    /// Orders outputs by walk position and splits texts from failures.
    fn into_outcome(self) -> DownloadOutcome {
        let mut outputs = self.outputs.into_inner();
        outputs.sort_by_key(|(key, _)| *key);

        let mut outcome = DownloadOutcome::default();
        for (_, output) in outputs {
            match output {
                UnitOutput::Texts(texts) => outcome.results.extend(texts),
                UnitOutput::Failed(failure) => outcome.errors.push(failure),
            }
        }
        outcome
    }
}
