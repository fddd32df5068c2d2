//! Read-through memoization of WKB path decoding.
//!
//! Decoding is a pure function of the hex input, so entries are never
//! invalidated. Failures are cached as well; a blob that does not decode
//! will not decode on the next render either.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use urbanview_datatypes::operations::wkb;
use urbanview_datatypes::primitives::Path;

#[derive(Debug, Default)]
pub struct CachingPathDecoder {
    entries: RwLock<HashMap<String, Option<Path>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachingPathDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `wkb_hex`, consulting the cache first. Keyed by the exact
    /// input string.
    pub fn decode(&self, wkb_hex: &str) -> Option<Path> {
        if let Ok(entries) = self.entries.read() {
            if let Some(cached) = entries.get(wkb_hex) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return cached.clone();
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let decoded = wkb::decode_path(wkb_hex);

        if let Ok(mut entries) = self.entries.write() {
            entries.insert(wkb_hex.to_string(), decoded.clone());
        }

        decoded
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn log_statistics(&self) {
        log::debug!(
            "path cache: {} entries, {} hits, {} misses",
            self.len(),
            self.hits(),
            self.misses()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use urbanview_datatypes::primitives::PathAccess;

    fn line_string_hex(coordinates: &[(f64, f64)]) -> String {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&(coordinates.len() as u32).to_le_bytes());
        for &(x, y) in coordinates {
            bytes.extend_from_slice(&x.to_le_bytes());
            bytes.extend_from_slice(&y.to_le_bytes());
        }
        hex::encode(bytes)
    }

    #[test]
    fn caches_successes_and_failures() {
        let decoder = CachingPathDecoder::new();
        let blob = line_string_hex(&[(18.0, 59.3), (18.1, 59.4)]);

        let first = decoder.decode(&blob).unwrap();
        let second = decoder.decode(&blob).unwrap();

        assert_eq!(first.point_count(), 2);
        assert_eq!(first, second);
        assert_eq!(decoder.hits(), 1);
        assert_eq!(decoder.misses(), 1);

        assert!(decoder.decode("garbage").is_none());
        assert!(decoder.decode("garbage").is_none());
        assert_eq!(decoder.len(), 2);
        assert_eq!(decoder.hits(), 2);
    }
}
