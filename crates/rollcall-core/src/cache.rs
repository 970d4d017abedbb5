// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;

use crate::search::SearchError;
use crate::search::SearchParams;
use crate::search::SearchResult;
use crate::search::search;

type Slot = Arc<OnceLock<Result<Arc<SearchResult>, SearchError>>>;

/// Memoizes [`search`] by its parameters.
///
/// Each key is computed at most once: concurrent callers asking for the same
/// parameters block on the same cell until the first computation finishes.
/// With a capacity, the oldest key is evicted first.
pub struct SearchCache {
    capacity: Option<usize>,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<SearchParams, Slot>,
    order: VecDeque<SearchParams>,
}

impl SearchCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self {
            capacity: None,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Return the cached result for `params`, running the search if needed.
    /// Invalid parameters are rejected without touching the cache.
    pub fn get_or_search(&self, params: SearchParams) -> Result<Arc<SearchResult>, SearchError> {
        params.validate()?;
        let slot: Slot = self.slot(params);
        slot.get_or_init(|| {
            log::debug!("Cache miss for {params:?}");
            search(params).map(Arc::new)
        })
        .clone()
    }

    pub fn contains(&self, params: &SearchParams) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .get(params)
            .is_some_and(|slot| slot.get().is_some())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.order.clear();
    }

    fn slot(&self, params: SearchParams) -> Slot {
        let mut inner = self.inner.lock().unwrap();
        if let Some(slot) = inner.entries.get(&params) {
            return slot.clone();
        }
        if let Some(capacity) = self.capacity {
            while inner.entries.len() >= capacity {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
            }
        }
        let slot: Slot = Arc::new(OnceLock::new());
        inner.entries.insert(params, slot.clone());
        inner.order.push_back(params);
        slot
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_hit_returns_same_result() -> Fallible<()> {
        let cache = SearchCache::new();
        let params = SearchParams::new(1, 1, 1);
        assert!(!cache.contains(&params));
        let a = cache.get_or_search(params)?;
        assert!(cache.contains(&params));
        let b = cache.get_or_search(params)?;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_parameters_are_not_cached() {
        let cache = SearchCache::new();
        let result = cache.get_or_search(SearchParams::new(1, 0, 1));
        assert_eq!(
            result,
            Err(SearchError::InvalidParameter {
                name: "picks_per_session",
                value: 0
            })
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_overflowing_call_count_is_not_cached() {
        let cache = SearchCache::new();
        let params = SearchParams::new(usize::MAX, 2, 3);
        assert_eq!(
            cache.get_or_search(params),
            Err(SearchError::CountOverflow {
                sessions: usize::MAX,
                picks_per_session: 2
            })
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_callers_share_one_result() {
        let cache = SearchCache::new();
        let params = SearchParams::new(2, 1, 2);
        let results: Vec<Arc<SearchResult>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| cache.get_or_search(params)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });
        for result in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], result));
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() -> Fallible<()> {
        let cache = SearchCache::with_capacity(2);
        let first = SearchParams::new(1, 1, 1);
        let second = SearchParams::new(1, 1, 2);
        let third = SearchParams::new(1, 1, 3);
        cache.get_or_search(first)?;
        cache.get_or_search(second)?;
        cache.get_or_search(third)?;
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&first));
        assert!(cache.contains(&second));
        assert!(cache.contains(&third));
        Ok(())
    }

    #[test]
    fn test_clear() -> Fallible<()> {
        let cache = SearchCache::new();
        cache.get_or_search(SearchParams::new(1, 1, 1))?;
        cache.clear();
        assert!(cache.is_empty());
        Ok(())
    }
}
