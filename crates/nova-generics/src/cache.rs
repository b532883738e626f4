use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::config::ResolverConfig;
use crate::descriptor::TypeDescriptor;
use crate::env::TypeEnv;
use crate::error::Result;
use crate::hierarchy::HierarchyMap;

/// Append-only cache of [`HierarchyMap`]s keyed by the full starting descriptor.
///
/// `List<String>` and `List<Integer>` are separate entries. Population is double-checked under a
/// write lock, so concurrent callers asking for the same instantiation observe a single build and
/// all receive the same `Arc`.
///
/// Entries are partitioned by [`ResolverConfig::max_shape_depth`], the only setting a build
/// depends on, so resolvers with different limits can share one cache.
///
/// A cache must only ever be used with one [`TypeEnv`] (or environments that agree on every class
/// they share); entries are never invalidated.
#[derive(Debug, Default)]
pub struct HierarchyCache {
    entries: RwLock<HashMap<usize, HashMap<TypeDescriptor, Arc<HierarchyMap>>>>,
    builds: AtomicUsize,
}

impl HierarchyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide default instance.
    pub fn global() -> &'static HierarchyCache {
        static GLOBAL: OnceLock<HierarchyCache> = OnceLock::new();
        GLOBAL.get_or_init(HierarchyCache::default)
    }

    pub fn get_or_build(
        &self,
        env: &dyn TypeEnv,
        start: &TypeDescriptor,
        config: &ResolverConfig,
    ) -> Result<Arc<HierarchyMap>> {
        if let Some(found) = self.get(start, config) {
            tracing::trace!(target: "nova.generics", root = %start, "hierarchy cache hit");
            return Ok(found);
        }

        let mut entries = self.entries.write();
        let partition = entries.entry(config.max_shape_depth).or_default();
        if let Some(found) = partition.get(start) {
            return Ok(Arc::clone(found));
        }

        let built = Arc::new(HierarchyMap::build(env, start, config)?);
        self.builds.fetch_add(1, Ordering::Relaxed);
        partition.insert(start.clone(), Arc::clone(&built));
        Ok(built)
    }

    /// Cached entry for `start` under `config`, without building.
    pub fn get(
        &self,
        start: &TypeDescriptor,
        config: &ResolverConfig,
    ) -> Option<Arc<HierarchyMap>> {
        self.entries
            .read()
            .get(&config.max_shape_depth)
            .and_then(|partition| partition.get(start))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of hierarchy maps actually built (cache misses that completed).
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Drop every entry.
    ///
    /// Maintenance only: this suspends the first-built-entry guarantee, since callers holding an
    /// `Arc` from before the clear will not share it with callers that rebuild afterwards. Only
    /// call it when no resolver is using the cache, e.g. after the environment was replaced.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
