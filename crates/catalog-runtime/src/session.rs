//! Message-passing dashboard session.
//!
//! The presentation layer owns the interaction loop. It sends a
//! [`FilterSpec`] per interaction and receives one [`DashboardSnapshot`] per
//! spec, in order, from a background tokio task. The catalog is shared
//! read-only; the task owns its own [`ResultCache`], so no state is shared
//! mutably across the channel.

use std::sync::Arc;

use catalog_core::error::Result;
use catalog_data::analysis::DashboardAnalysis;
use catalog_data::catalog::Catalog;
use catalog_data::filter::FilterSpec;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::cache::{CacheStats, ResultCache, DEFAULT_RESULT_CAPACITY};

/// Requests buffered before senders wait. Replies are unbounded so the
/// loop never blocks on a caller that has not started reading yet.
const CHANNEL_CAPACITY: usize = 16;

// ── Public types ──────────────────────────────────────────────────────────────

/// The dashboard state after one interaction.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// The spec this snapshot answers.
    pub spec: FilterSpec,
    /// Rows that passed the filter.
    pub filtered_rows: usize,
    /// Every named result for `spec`.
    pub analysis: Arc<DashboardAnalysis>,
}

/// What the session sends back for each request; invalid specs come back as
/// [`catalog_core::error::CatalogError::InvalidFilter`].
pub type SessionReply = Result<DashboardSnapshot>;

// ── DashboardSession ──────────────────────────────────────────────────────────

/// Background recomputation loop over one catalog.
pub struct DashboardSession {
    catalog: Arc<Catalog>,
    results: ResultCache,
}

impl DashboardSession {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_capacity(catalog, DEFAULT_RESULT_CAPACITY)
    }

    /// A session whose result cache keeps at most `capacity` specs.
    pub fn with_capacity(catalog: Arc<Catalog>, capacity: usize) -> Self {
        Self {
            catalog,
            results: ResultCache::new(capacity),
        }
    }

    /// Spawn the session loop.
    ///
    /// Returns the request sender, the reply receiver and a handle to the
    /// task. The loop ends once every request sender is dropped, or as soon
    /// as the reply receiver is gone.
    pub fn start(
        self,
    ) -> (
        mpsc::Sender<FilterSpec>,
        mpsc::UnboundedReceiver<SessionReply>,
        SessionHandle,
    ) {
        let (request_tx, request_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(self.run(request_rx, reply_tx));

        (request_tx, reply_rx, SessionHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn run(
        mut self,
        mut requests: mpsc::Receiver<FilterSpec>,
        replies: mpsc::UnboundedSender<SessionReply>,
    ) -> CacheStats {
        tracing::debug!(catalog = self.catalog.id().short(), "dashboard session started");

        while let Some(spec) = requests.recv().await {
            let reply = self.respond(spec);
            if let Err(e) = &reply {
                tracing::warn!(error = %e, "rejected filter");
            }
            if replies.send(reply).is_err() {
                tracing::debug!("reply channel closed; ending session");
                break;
            }
        }

        let stats = self.results.stats();
        tracing::debug!(
            hits = stats.hits,
            misses = stats.misses,
            "dashboard session finished"
        );
        stats
    }

    fn respond(&mut self, spec: FilterSpec) -> SessionReply {
        let analysis = self.results.get_or_compute(&self.catalog, &spec)?;
        Ok(DashboardSnapshot {
            filtered_rows: analysis.metadata.rows_after_filter,
            spec,
            analysis,
        })
    }
}

// ── SessionHandle ─────────────────────────────────────────────────────────────

/// Handle to the background session task.
pub struct SessionHandle {
    handle: JoinHandle<CacheStats>,
}

impl SessionHandle {
    /// Wait for the session to end and return its result-cache counters.
    pub async fn join(self) -> std::result::Result<CacheStats, JoinError> {
        self.handle.await
    }

    /// Stop the session immediately.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
