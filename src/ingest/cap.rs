//! Per-category sample cap
//!
//! Counts admissions per key and refuses once a key reaches the limit. The
//! full scan keys by category folder (one admission per child directory that
//! ingested a capture); the TOC reader keys by the scene's canonical category.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct CategoryCap {
    limit: Option<usize>,
    admitted: FxHashMap<String, usize>,
}

impl CategoryCap {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            admitted: FxHashMap::default(),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.limit.is_some()
    }

    /// Count one more item under `key`, or return false if the key is full
    pub fn admit(&mut self, key: &str) -> bool {
        let Some(limit) = self.limit else {
            return true;
        };
        let count = self.admitted.entry(key.to_string()).or_insert(0);
        if *count >= limit {
            return false;
        }
        *count += 1;
        true
    }

    /// True when `key` cannot take another admission
    pub fn is_full(&self, key: &str) -> bool {
        self.limit.is_some_and(|limit| self.admitted(key) >= limit)
    }

    pub fn admitted(&self, key: &str) -> usize {
        self.admitted.get(key).copied().unwrap_or(0)
    }
}
