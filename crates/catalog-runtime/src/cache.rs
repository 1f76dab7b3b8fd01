//! Memoization for catalog loads and dashboard results.
//!
//! [`CatalogCache`] keys on the identity of the input bytes so a reload of an
//! unchanged file hands back the same shared [`Catalog`]. [`ResultCache`]
//! keys on `(catalog id, filter spec)`; repeating an interaction skips the
//! recomputation entirely. Both are bounded and evict the least recently used
//! entry first.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use catalog_core::error::Result;
use catalog_data::analysis::{analyze, DashboardAnalysis};
use catalog_data::catalog::{Catalog, CatalogId};
use catalog_data::filter::FilterSpec;
use catalog_data::reader::{catalog_from_bytes, read_input, LoadOptions};
use lru::LruCache;
use serde::Serialize;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default number of distinct inputs kept by [`CatalogCache`].
pub const DEFAULT_CATALOG_CAPACITY: usize = 4;

/// Default number of filter results kept by [`ResultCache`].
pub const DEFAULT_RESULT_CAPACITY: usize = 64;

// ── CacheStats ────────────────────────────────────────────────────────────────

/// Hit/miss counters of one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

fn bounded<K: Hash + Eq, V>(capacity: usize) -> LruCache<K, V> {
    LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN))
}

// ── CatalogCache ──────────────────────────────────────────────────────────────

/// Loaded catalogs keyed by input identity and read options.
///
/// # Example
/// ```no_run
/// use catalog_data::reader::LoadOptions;
/// use catalog_runtime::cache::CatalogCache;
///
/// let mut cache = CatalogCache::default();
/// let catalog = cache.load(std::path::Path::new("titles.csv"), LoadOptions::default())?;
/// println!("{} titles", catalog.len());
/// # Ok::<(), catalog_core::error::CatalogError>(())
/// ```
#[derive(Debug)]
pub struct CatalogCache {
    catalogs: LruCache<(CatalogId, u8), Arc<Catalog>>,
    stats: CacheStats,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_CAPACITY)
    }
}

impl CatalogCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            catalogs: bounded(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Read `path` and return its catalog, parsing only when these bytes
    /// have not been seen before.
    pub fn load(&mut self, path: &Path, options: LoadOptions) -> Result<Arc<Catalog>> {
        let bytes = read_input(path)?;
        let catalog = self.load_bytes(&bytes, options)?;
        tracing::info!(
            path = %path.display(),
            rows = catalog.len(),
            dropped = catalog.report().rows_dropped(),
            "catalog ready"
        );
        Ok(catalog)
    }

    /// Same as [`CatalogCache::load`] for input already in memory.
    pub fn load_bytes(&mut self, bytes: &[u8], options: LoadOptions) -> Result<Arc<Catalog>> {
        let key = (CatalogId::of_bytes(bytes), options.delimiter);
        if let Some(catalog) = self.catalogs.get(&key) {
            self.stats.hits += 1;
            tracing::debug!(catalog = key.0.short(), "catalog cache hit");
            return Ok(Arc::clone(catalog));
        }

        self.stats.misses += 1;
        tracing::debug!(catalog = key.0.short(), "catalog cache miss; parsing input");
        let catalog = Arc::new(catalog_from_bytes(bytes, options)?);
        self.catalogs.put(key, Arc::clone(&catalog));
        Ok(catalog)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every cached catalog. Counters are kept.
    pub fn invalidate(&mut self) {
        self.catalogs.clear();
        tracing::debug!("catalog cache invalidated");
    }
}

// ── ResultCache ───────────────────────────────────────────────────────────────

/// Dashboard results keyed by `(catalog id, filter spec)`.
#[derive(Debug)]
pub struct ResultCache {
    results: LruCache<(CatalogId, FilterSpec), Arc<DashboardAnalysis>>,
    stats: CacheStats,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_CAPACITY)
    }
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            results: bounded(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached analysis of `spec` over `catalog`, computing it on
    /// a miss. Invalid specs are rejected and never cached.
    pub fn get_or_compute(
        &mut self,
        catalog: &Catalog,
        spec: &FilterSpec,
    ) -> Result<Arc<DashboardAnalysis>> {
        let key = (catalog.id().clone(), spec.clone());
        if let Some(analysis) = self.results.get(&key) {
            self.stats.hits += 1;
            tracing::debug!(catalog = catalog.id().short(), "result cache hit");
            return Ok(Arc::clone(analysis));
        }

        self.stats.misses += 1;
        let analysis = Arc::new(analyze(catalog, spec)?);
        tracing::debug!(
            catalog = catalog.id().short(),
            rows = analysis.metadata.rows_after_filter,
            "result cache miss; dashboard recomputed"
        );
        self.results.put(key, Arc::clone(&analysis));
        Ok(analysis)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
