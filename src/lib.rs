//! # Probe Map
//!
//! A Rust implementation of an open-addressing hash table with linear probing.
//!
//! This crate provides `ProbeMap`, a map from owned string keys to `i64`
//! values. Keys are hashed with FNV-1a, collisions are resolved by walking
//! the slot array linearly, and deletions leave tombstones so that probe
//! chains passing through a deleted slot stay intact. The table doubles its
//! capacity whenever an insertion would push the load factor above 80% and
//! never shrinks.
//!
//! The map is single-threaded by design; callers needing concurrent access
//! must add their own exclusion.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probemap::ProbeMap;
//!
//! // Create a new map
//! let mut map = ProbeMap::new();
//!
//! // Insert values
//! map.insert("apple".to_string(), 1);
//! map.insert("banana".to_string(), 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.insert("apple".to_string(), 10);
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Growth
//!
//! ```rust
//! use probemap::ProbeMap;
//!
//! // A two-slot table doubles before the second insert could fill it.
//! let mut map = ProbeMap::with_capacity(2);
//! map.insert("a".to_string(), 1);
//! map.insert("b".to_string(), 2);
//!
//! assert_eq!(map.capacity(), 4);
//! assert_eq!(map.get("a"), Some(&1));
//! assert_eq!(map.get("b"), Some(&2));
//! ```

/// Module implementing FNV-1a hashing over key bytes
mod fnv;
/// Module implementing the open-addressing hash map with linear probing
mod probe_map;
/// Utility functions and traits for the map
mod utils;

pub use fnv::FnvHasher;
pub use probe_map::ProbeMap;
pub use utils::MapExtensions;
