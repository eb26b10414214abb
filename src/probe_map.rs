use std::fmt::Write as _;
use std::mem;

use crate::fnv::fnv1a;

/// Capacity used by [`ProbeMap::new`].
const DEFAULT_CAPACITY: usize = 17;
/// Load percentage above which an insertion grows the table first.
const LOAD_FACTOR_THRESHOLD: usize = 80;
/// Capacity multiplier applied on each growth.
const GROWTH_FACTOR: usize = 2;

/// A slot in the backing array.
#[derive(Debug, Clone)]
enum Slot {
    /// Never occupied since the last rehash.
    Empty,
    /// Previously occupied, logically deleted. Still consumes probe-sequence
    /// space so chains that pass through it stay reachable.
    Tombstone,
    /// A live entry.
    Occupied {
        /// The key, immutable once stored and compared by content.
        key: String,
        /// The value associated with the key.
        value: i64,
    },
}

/// An open-addressing hash map from owned string keys to `i64` values.
///
/// Collisions are resolved by linear probing over a flat slot array, seeded
/// by an FNV-1a hash of the key bytes. Deletions leave tombstones; the table
/// doubles its capacity whenever an insertion would push the load factor
/// above its threshold, and never shrinks.
///
/// Note: This implementation is not thread-safe. Callers needing concurrent
/// access must add external exclusion.
#[derive(Debug, Clone)]
pub struct ProbeMap {
    /// The slot array; its length is the table capacity.
    slots: Vec<Slot>,
    /// Number of live entries. Tombstones are not counted.
    count: usize,
    /// Load percentage above which an insertion triggers growth (0-100).
    load_factor_threshold: usize,
}

impl Default for ProbeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<(String, i64)> for ProbeMap {
    fn extend<T: IntoIterator<Item = (String, i64)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl ProbeMap {
    /// Creates a new `ProbeMap` with the default initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new `ProbeMap` with the specified initial capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. The load-factor bookkeeping divides by
    /// the capacity, so an empty slot array is rejected at construction.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be at least 1");

        Self {
            slots: vec![Slot::Empty; capacity],
            count: 0,
            load_factor_threshold: LOAD_FACTOR_THRESHOLD,
        }
    }

    /// Maps a key onto its starting slot index.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn index_for(&self, key: &str) -> usize {
        let hash = fnv1a(key.as_bytes());
        (hash % self.slots.len() as u64) as usize
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// already present.
    ///
    /// When the key is already present its stored copy is kept and the
    /// caller's `String` is dropped. The table grows (capacity doubles, all
    /// live entries rehash) before probing whenever this insertion would
    /// push the load factor above the threshold.
    ///
    /// # Panics
    ///
    /// Panics if a full probe sweep finds neither a free slot nor the key.
    /// The growth policy keeps free slots available, so this indicates
    /// corrupted bookkeeping rather than caller error.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn insert(&mut self, key: String, value: i64) -> Option<i64> {
        // Capacity is never zero, so the division is well defined.
        if self.count.saturating_add(1).saturating_mul(100) / self.slots.len() >
            self.load_factor_threshold
        {
            self.grow();
        }

        let index = self.index_for(&key);
        self.insert_at(index, key, value)
    }

    /// Inserts a key-value pair starting from the specified slot index.
    #[allow(clippy::arithmetic_side_effects, clippy::panic)]
    fn insert_at(&mut self, start_index: usize, key: String, value: i64) -> Option<i64> {
        let capacity = self.slots.len();
        let mut index = start_index;
        let mut first_tombstone = None;
        let mut empty_slot = None;

        // Walk at most one full cycle of the probe sequence.
        for _ in 0..capacity {
            match self.slots.get(index) {
                None | Some(Slot::Empty) => {
                    empty_slot = Some(index);
                    break;
                }
                Some(Slot::Tombstone) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Slot::Occupied { key: stored_key, .. }) if *stored_key == key => {
                    // Update in place, keeping the stored key.
                    if let Some(Slot::Occupied { value: stored_value, .. }) =
                        self.slots.get_mut(index)
                    {
                        return Some(mem::replace(stored_value, value));
                    }
                    return None;
                }
                Some(Slot::Occupied { .. }) => {}
            }

            index = index.saturating_add(1) % capacity;
        }

        // The key is absent. Reuse the first tombstone seen on the walk, or
        // the empty slot that terminated it.
        let Some(target) = first_tombstone.or(empty_slot) else {
            panic!("probe sequence exhausted after {capacity} slots; table invariants are broken");
        };
        if let Some(slot) = self.slots.get_mut(target) {
            *slot = Slot::Occupied { key, value };
            self.count = self.count.saturating_add(1);
        }
        None
    }

    /// Retrieves the value stored for a key.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn get(&self, key: &str) -> Option<&i64> {
        let capacity = self.slots.len();
        let mut index = self.index_for(key);

        for _ in 0..capacity {
            match self.slots.get(index) {
                // Empty is a hard stop: an entry for this key would have been
                // stored at or before the first empty slot on its probe path.
                None | Some(Slot::Empty) => return None,
                Some(Slot::Tombstone) => {}
                Some(Slot::Occupied { key: stored_key, value }) if stored_key == key => {
                    return Some(value);
                }
                Some(Slot::Occupied { .. }) => {}
            }

            index = index.saturating_add(1) % capacity;
        }

        None
    }

    /// Retrieves a mutable reference to the value stored for a key.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut i64> {
        let capacity = self.slots.len();
        let mut index = self.index_for(key);

        for _ in 0..capacity {
            let matched = match self.slots.get(index) {
                None | Some(Slot::Empty) => return None,
                Some(Slot::Tombstone) => false,
                Some(Slot::Occupied { key: stored_key, .. }) => stored_key == key,
            };

            if matched {
                if let Some(Slot::Occupied { value, .. }) = self.slots.get_mut(index) {
                    return Some(value);
                }
                return None;
            }

            index = index.saturating_add(1) % capacity;
        }

        None
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// The slot is replaced by a tombstone and the owned key is released.
    /// Removing an absent key is a no-op.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn remove(&mut self, key: &str) -> Option<i64> {
        let capacity = self.slots.len();
        let mut index = self.index_for(key);

        for _ in 0..capacity {
            match self.slots.get(index) {
                None | Some(Slot::Empty) => return None,
                Some(Slot::Tombstone) => {}
                Some(Slot::Occupied { key: stored_key, value }) if stored_key == key => {
                    let removed = *value;
                    if let Some(slot) = self.slots.get_mut(index) {
                        *slot = Slot::Tombstone;
                    }
                    self.count = self.count.saturating_sub(1);
                    return Some(removed);
                }
                Some(Slot::Occupied { .. }) => {}
            }

            index = index.saturating_add(1) % capacity;
        }

        None
    }

    /// Returns the number of live entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the map holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots in the backing array.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current load factor of the map.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.slots.len() as f64
    }

    /// Grows the slot array and rehashes every live entry into it.
    ///
    /// The new array is built completely before it replaces the old one, so
    /// no caller ever observes a half-migrated table.
    fn grow(&mut self) {
        let new_capacity = self.slots.len().saturating_mul(GROWTH_FACTOR);
        let mut grown = Self {
            slots: vec![Slot::Empty; new_capacity],
            count: 0,
            load_factor_threshold: self.load_factor_threshold,
        };

        // Reinsert live entries through the ordinary insertion path; keys
        // move, tombstones are left behind.
        for slot in self.slots.drain(..) {
            if let Slot::Occupied { key, value } = slot {
                grown.insert(key, value);
            }
        }

        *self = grown;
    }

    /// Provide a way to configure the load factor threshold
    pub fn set_load_factor_threshold(&mut self, threshold: usize) {
        self.load_factor_threshold = threshold.clamp(1, 95); // Keep within reasonable range
    }

    /// Returns an iterator over the live key-value pairs, in slot order.
    ///
    /// Slot order is a diagnostic artifact of hashing and growth history;
    /// no ordering is guaranteed.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: &self.slots, index: 0 }
    }

    /// Renders the live entries as a `{key: value, ...}` string, in slot
    /// order. Diagnostic only.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::from("{");
        for (key, value) in self.iter() {
            let _ = write!(out, "{key}: {value}, ");
        }
        out.push('}');
        out
    }

    /// Clears the map, removing all entries. Capacity is retained.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.count = 0;
    }
}

/// Iterator over the live key-value pairs of a [`ProbeMap`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// The map's slot array.
    slots: &'a [Slot],
    /// Current position in the scan.
    index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a i64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.slots.len() {
            let slot = self.slots.get(self.index);
            self.index = self.index.saturating_add(1);
            if let Some(Slot::Occupied { key, value }) = slot {
                return Some((key.as_str(), value));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_insert_and_get() {
        let mut map = ProbeMap::new();
        assert_eq!(map.insert("key1".to_string(), 1), None);
        assert_eq!(map.insert("key2".to_string(), 2), None);
        assert_eq!(map.insert("key3".to_string(), 3), None);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_update_returns_previous_value() {
        let mut map = ProbeMap::new();
        assert_eq!(map.insert("key1".to_string(), 1), None);
        assert_eq!(map.insert("key1".to_string(), 10), Some(1));
        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = ProbeMap::new();
        map.insert("key1".to_string(), 1);
        map.insert("key2".to_string(), 2);

        assert_eq!(map.remove("key1"), Some(1));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.remove("key1"), None);
    }

    #[test]
    fn test_reinsert_after_remove() {
        let mut map = ProbeMap::new();
        map.insert("key1".to_string(), 1);
        map.remove("key1");
        map.insert("key1".to_string(), 2);

        assert_eq!(map.get("key1"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_empty_key_is_a_valid_key() {
        let mut map = ProbeMap::new();
        map.insert(String::new(), 7);
        assert_eq!(map.get(""), Some(&7));
        assert_eq!(map.remove(""), Some(7));
        assert_eq!(map.get(""), None);
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn test_zero_capacity_is_rejected() {
        ProbeMap::with_capacity(0);
    }

    #[test]
    fn test_tiny_table_grows_before_filling() {
        let mut map = ProbeMap::with_capacity(2);
        map.insert("a".to_string(), 1);
        assert_eq!(map.capacity(), 2);

        // The second insert would fill the table, so it must double first.
        map.insert("b".to_string(), 2);
        assert_eq!(map.capacity(), 4);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_growth_preserves_entries() {
        let mut map = ProbeMap::with_capacity(17);
        for i in 0..2_000_i64 {
            map.insert(format!("key_{i}"), i);
        }

        assert_eq!(map.len(), 2_000);
        assert!(map.capacity() > 17);
        for i in 0..2_000_i64 {
            assert_eq!(map.get(&format!("key_{i}")), Some(&i));
        }
    }

    #[test]
    fn test_capacity_doubles_monotonically() {
        let mut map = ProbeMap::with_capacity(17);
        let mut last_capacity = map.capacity();

        for i in 0..5_000_i64 {
            map.insert(format!("key_{i}"), i);
            let capacity = map.capacity();
            if capacity != last_capacity {
                assert_eq!(capacity, last_capacity * 2);
                last_capacity = capacity;
            }
        }

        assert!(map.capacity() > 17);
    }

    #[test]
    fn test_load_factor_bounded_after_insert() {
        let mut map = ProbeMap::with_capacity(17);
        for i in 0..2_000_i64 {
            map.insert(format!("key_{i}"), i);
            assert!(map.len() * 100 / map.capacity() <= 80);
        }
    }

    #[test]
    fn test_alternating_insert_remove_reuses_slots() {
        let mut map = ProbeMap::new();
        for i in 0..1_000_i64 {
            map.insert("cycled".to_string(), i);
            assert_eq!(map.len(), 1);
            assert_eq!(map.remove("cycled"), Some(i));
            assert!(map.is_empty());
        }

        // One slot cycles between occupied and tombstone; the table never
        // accumulates enough load to grow.
        assert_eq!(map.capacity(), 17);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let mut map = ProbeMap::with_capacity(8);
        map.set_load_factor_threshold(50);

        map.insert("key1".to_string(), 1);
        map.insert("key2".to_string(), 2);
        map.insert("key3".to_string(), 3);
        map.insert("key4".to_string(), 4);
        assert_eq!(map.capacity(), 8);

        // A fifth entry would land at 62%, over the lowered threshold.
        map.insert("key5".to_string(), 5);
        assert_eq!(map.capacity(), 16);
        for i in 1..=5_i64 {
            assert_eq!(map.get(&format!("key{i}")), Some(&i));
        }
    }

    #[test]
    fn test_extend() {
        let mut map = ProbeMap::new();
        map.extend(vec![("a".to_string(), 1), ("b".to_string(), 2)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut map = ProbeMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);

        map.insert("key1".to_string(), 1);
        assert!(!map.is_empty());
        assert_eq!(map.len(), 1);

        map.insert("key2".to_string(), 2);
        assert_eq!(map.len(), 2);

        map.remove("key1");
        assert_eq!(map.len(), 1);

        map.remove("key2");
        assert!(map.is_empty());
    }

    #[test]
    fn test_len_tracks_live_entries() {
        let mut map = ProbeMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("a".to_string(), 3);
        assert_eq!(map.len(), 2);

        map.remove("missing");
        assert_eq!(map.len(), 2);

        map.remove("a");
        map.remove("b");
        assert_eq!(map.len(), 0);
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn test_iter_skips_tombstones() {
        let mut map = ProbeMap::new();
        map.insert("key1".to_string(), 1);
        map.insert("key2".to_string(), 2);
        map.insert("key3".to_string(), 3);
        map.remove("key2");

        let mut count = 0;
        let mut sum = 0;
        for (_, &value) in map.iter() {
            count += 1;
            sum += value;
        }

        assert_eq!(count, 2);
        assert_eq!(sum, 4);
    }

    #[test]
    fn test_get_mut() {
        let mut map = ProbeMap::new();
        map.insert("key1".to_string(), 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
        assert_eq!(map.get_mut("key2"), None);
    }

    #[test]
    fn test_clear() {
        let mut map = ProbeMap::new();
        map.insert("key1".to_string(), 1);
        map.insert("key2".to_string(), 2);
        let capacity = map.capacity();

        map.clear();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.capacity(), capacity);
    }

    #[test]
    fn test_dump_lists_live_entries() {
        let mut map = ProbeMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.remove("b");

        let dump = map.dump();
        assert!(dump.starts_with('{'));
        assert!(dump.ends_with('}'));
        assert!(dump.contains("a: 1"));
        assert!(!dump.contains("b: 2"));
    }

    #[test]
    fn test_bulk_insert_remove_lookup() {
        const TOTAL: i64 = 50_000;
        const REMOVED: i64 = 10_000;

        let mut map = ProbeMap::with_capacity(17);
        for i in 0..TOTAL {
            map.insert(format!("key_{i}"), i);
        }
        assert_eq!(map.len(), 50_000);

        for i in 0..REMOVED {
            map.remove(&format!("key_{i}"));
        }
        assert_eq!(map.len(), 40_000);

        for i in 0..REMOVED {
            assert_eq!(map.get(&format!("key_{i}")), None);
        }
        for i in REMOVED..TOTAL {
            assert_eq!(map.get(&format!("key_{i}")), Some(&i));
        }
    }

    proptest! {
        #[test]
        fn behaves_like_std_hash_map(
            ops in proptest::collection::vec((0u8..16u8, any::<i64>(), any::<bool>()), 1..200),
        ) {
            // A tiny key alphabet and capacity force collisions, growth, and
            // tombstone reuse within a short operation sequence.
            let mut map = ProbeMap::with_capacity(2);
            let mut model: HashMap<String, i64> = HashMap::new();

            for (k, v, is_insert) in ops {
                let key = format!("key_{k}");
                if is_insert {
                    let mine = map.insert(key.clone(), v);
                    let theirs = model.insert(key, v);
                    prop_assert_eq!(mine, theirs);
                } else {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
            }

            prop_assert_eq!(map.len(), model.len());
            for k in 0..16u8 {
                let key = format!("key_{k}");
                prop_assert_eq!(map.get(&key), model.get(&key));
            }
        }
    }
}
