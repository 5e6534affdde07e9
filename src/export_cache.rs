//! Memoised platform exports for the HTTP service

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

use crate::models::PlatformExportSet;
use crate::platform_prompts::{ExportStyle, export_profile};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

struct CacheInner {
    entries: LruCache<u64, Arc<PlatformExportSet>>,
    stats: CacheStats,
}

/// LRU of rendered export sets keyed by (style, profile text).
/// A capacity of zero disables caching; every call renders.
pub struct ExportCache {
    inner: Option<Mutex<CacheInner>>,
}

impl ExportCache {
    pub fn new(capacity: usize) -> Self {
        let inner = NonZeroUsize::new(capacity).map(|cap| {
            Mutex::new(CacheInner {
                entries: LruCache::new(cap),
                stats: CacheStats::default(),
            })
        });
        Self { inner }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Return the cached export set, rendering and storing it on a miss.
    pub fn get_or_render(&self, profile_text: &str, style: ExportStyle) -> Arc<PlatformExportSet> {
        let Some(inner) = &self.inner else {
            return Arc::new(export_profile(profile_text, style));
        };

        let key = cache_key(profile_text, style);
        let cached = {
            let mut guard = inner.lock();
            let hit = guard.entries.get(&key).cloned();
            if hit.is_some() {
                guard.stats.hits += 1;
            }
            hit
        };
        if let Some(hit) = cached {
            debug!("Export cache hit for {:x}", key);
            return hit;
        }

        // Render outside the lock; a concurrent miss on the same key just renders twice
        let rendered = Arc::new(export_profile(profile_text, style));

        let mut guard = inner.lock();
        guard.stats.misses += 1;
        guard.entries.put(key, rendered.clone());
        guard.stats.entries = guard.entries.len();
        rendered
    }

    pub fn stats(&self) -> CacheStats {
        self.inner
            .as_ref()
            .map(|inner| inner.lock().stats)
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Some(inner) = &self.inner {
            let mut guard = inner.lock();
            guard.entries.clear();
            guard.stats.entries = 0;
        }
    }
}

fn cache_key(profile_text: &str, style: ExportStyle) -> u64 {
    let mut hasher = DefaultHasher::new();
    style.hash(&mut hasher);
    profile_text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = "[TONE ANALYSIS]\nDirect and warm.\n[SIGNATURE PHRASES]\n- quick question";

    #[test]
    fn test_second_lookup_hits() {
        let cache = ExportCache::new(4);

        let first = cache.get_or_render(PROFILE, ExportStyle::Sections);
        let second = cache.get_or_render(PROFILE, ExportStyle::Sections);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, entries: 1 });
    }

    #[test]
    fn test_style_is_part_of_the_key() {
        let cache = ExportCache::new(4);

        let sections = cache.get_or_render(PROFILE, ExportStyle::Sections);
        let full = cache.get_or_render(PROFILE, ExportStyle::FullProfile);

        assert_ne!(sections.chatgpt, full.chatgpt);
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn test_least_recent_entry_is_evicted() {
        let cache = ExportCache::new(1);

        cache.get_or_render("one", ExportStyle::Sections);
        cache.get_or_render("two", ExportStyle::Sections);
        cache.get_or_render("one", ExportStyle::Sections);

        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 3, entries: 1 });
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = ExportCache::new(0);
        assert!(!cache.is_enabled());

        let first = cache.get_or_render(PROFILE, ExportStyle::Sections);
        let second = cache.get_or_render(PROFILE, ExportStyle::Sections);

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_clear() {
        let cache = ExportCache::new(2);
        cache.get_or_render(PROFILE, ExportStyle::Sections);
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }
}
