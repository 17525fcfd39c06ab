//! Hash-map aliases shared across the crate.
//!
//! Keeping the alias in one place makes it easy to switch between different
//! hash backends without touching every use site.

use rapidhash::RapidHashMap;

/// Default hash map type.
pub type KeyMap<K, V> = RapidHashMap<K, V>;
