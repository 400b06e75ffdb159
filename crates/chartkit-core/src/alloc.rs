//! Hash collections used across chartkit.
//!
//! Re-exports of the AHash-backed maps so that registries and per-index
//! accumulators share one hasher.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("line", 3usize);
        assert_eq!(map.get("line"), Some(&3));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(42);
        assert!(set.contains(&42));
    }
}
