//! Page fetching off the caller's thread.
//!
//! - `PageSource` - Where pages come from (network client, files, fixtures)
//! - `FeedLoader` - Background worker fed through flume channels
//! - `load_all` - Drive a feed to exhaustion synchronously

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use flume::{Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, error, info, trace, warn};

use crate::error::FeedError;
use crate::feed::{decode_page, FeedQuery, MediaFeed};
use crate::models::MediaItem;

/// Maximum number of page requests waiting for the worker.
const MAX_QUEUE_SIZE: usize = 16;

/// How often an idle worker checks for shutdown.
const IDLE_POLL_MS: u64 = 100;

/// Produces one page of items for a query. Pages are numbered from 1.
pub trait PageSource: Send + Sync {
    fn fetch_page(&self, query: &FeedQuery, page: u32) -> Result<Vec<MediaItem>, FeedError>;
}

/// Serves page `n` from the n-th JSON file; pages past the end are empty.
#[derive(Debug, Clone)]
pub struct JsonFilePageSource {
    files: Vec<PathBuf>,
}

impl JsonFilePageSource {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl PageSource for JsonFilePageSource {
    fn fetch_page(&self, query: &FeedQuery, page: u32) -> Result<Vec<MediaItem>, FeedError> {
        let Some(path) = page
            .checked_sub(1)
            .and_then(|i| self.files.get(i as usize))
        else {
            return Ok(Vec::new());
        };

        trace!(?path, page, "Reading feed page");
        let bytes = std::fs::read(path).map_err(|source| FeedError::Io {
            page,
            path: path.clone(),
            source,
        })?;
        decode_page(&bytes, query.tab)
    }
}

/// A request for one page of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub query: FeedQuery,
    pub page: u32,
}

impl PageRequest {
    pub fn new(query: FeedQuery, page: u32) -> Self {
        Self { query, page }
    }
}

/// A fetched page sent back from the worker.
#[derive(Debug)]
pub struct PageResult {
    pub query: FeedQuery,
    pub page: u32,
    pub items: Result<Vec<MediaItem>, FeedError>,
}

impl PageResult {
    /// Appends the page to `feed` if it belongs to the feed's current query
    /// and is the page the feed expects next. Returns the number of items added.
    pub fn apply_to(self, feed: &mut MediaFeed) -> Result<usize, FeedError> {
        if &self.query != feed.query() || feed.next_page() != Some(self.page) {
            debug!(page = self.page, "Discarding stale page result");
            return Ok(0);
        }
        Ok(feed.append_page(self.items?))
    }
}

/// Single background worker fetching pages on request.
pub struct FeedLoader {
    request_tx: Sender<PageRequest>,
    result_rx: Receiver<PageResult>,
    worker: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    pending: Arc<RwLock<HashSet<PageRequest>>>,
}

impl FeedLoader {
    pub fn new(source: Arc<dyn PageSource>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = flume::bounded(MAX_QUEUE_SIZE);
        let (result_tx, result_rx) = flume::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let pending = Arc::new(RwLock::new(HashSet::new()));

        let worker = {
            let shutdown = Arc::clone(&shutdown);
            let pending = Arc::clone(&pending);
            thread::Builder::new()
                .name("feed-loader".into())
                .spawn(move || worker_loop(source, request_rx, result_tx, shutdown, pending))?
        };

        debug!("Started feed loader");

        Ok(Self {
            request_tx,
            result_rx,
            worker: Some(worker),
            shutdown,
            pending,
        })
    }

    /// Queues a page fetch.
    ///
    /// Returns false if the same page is already pending or the queue is full.
    pub fn request(&self, req: PageRequest) -> bool {
        if self.shutdown.load(Ordering::Relaxed) {
            return false;
        }
        if !self.pending.write().insert(req.clone()) {
            trace!(page = req.page, "Page already pending");
            return false;
        }

        match self.request_tx.try_send(req) {
            Ok(()) => true,
            Err(flume::TrySendError::Full(req)) => {
                warn!("Feed loader queue full, dropping request");
                self.pending.write().remove(&req);
                false
            }
            Err(flume::TrySendError::Disconnected(req)) => {
                error!("Feed loader disconnected");
                self.pending.write().remove(&req);
                false
            }
        }
    }

    /// Queues the next page of `feed`, if it has one.
    pub fn request_next(&self, feed: &MediaFeed) -> bool {
        match feed.next_page() {
            Some(page) => self.request(PageRequest::new(feed.query().clone(), page)),
            None => false,
        }
    }

    /// Non-blocking poll for a finished page.
    pub fn try_recv(&self) -> Option<PageResult> {
        self.result_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for a finished page.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PageResult> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.read().len()
    }

    /// Stops the worker; requests already taken are finished first.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
            debug!("Feed loader shutdown complete");
        }
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    source: Arc<dyn PageSource>,
    rx: Receiver<PageRequest>,
    tx: Sender<PageResult>,
    shutdown: Arc<AtomicBool>,
    pending: Arc<RwLock<HashSet<PageRequest>>>,
) {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match rx.recv_timeout(Duration::from_millis(IDLE_POLL_MS)) {
            Ok(req) => {
                let items = source.fetch_page(&req.query, req.page);
                if let Err(e) = &items {
                    warn!(page = req.page, error = %e, "Failed to fetch page");
                }

                pending.write().remove(&req);

                let result = PageResult {
                    query: req.query,
                    page: req.page,
                    items,
                };
                if tx.send(result).is_err() {
                    break;
                }
            }
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Fetches pages into `feed` until it is exhausted or `max_pages` are loaded.
pub fn load_all(
    source: &dyn PageSource,
    feed: &mut MediaFeed,
    max_pages: u32,
) -> Result<usize, FeedError> {
    let mut added = 0;
    while let Some(page) = feed.next_page() {
        if feed.pages_loaded() >= max_pages {
            break;
        }
        let items = source.fetch_page(feed.query(), page)?;
        added += feed.append_page(items);
    }

    info!(
        pages = feed.pages_loaded(),
        items = feed.len(),
        has_more = feed.has_more(),
        "Feed loaded"
    );
    Ok(added)
}
