//! Utility functions and traits for [`ProbeMap`]

use crate::ProbeMap;

/// Extension trait for the map that provides additional utility methods
pub trait MapExtensions {
    /// Returns the keys of the map as a Vec
    fn keys(&self) -> Vec<String>;

    /// Returns the values of the map as a Vec
    fn values(&self) -> Vec<i64>;

    /// Returns true if the map contains the given key
    fn contains_key(&self, key: &str) -> bool;
}

impl MapExtensions for ProbeMap {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    fn values(&self) -> Vec<i64> {
        self.iter().map(|(_, &v)| v).collect()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Creates a [`ProbeMap`] from an iterator of key-value pairs
#[allow(dead_code)]
pub fn from_iter<I>(iter: I) -> ProbeMap
where
    I: IntoIterator<Item = (String, i64)>,
{
    let iter = iter.into_iter();
    let mut map = ProbeMap::new();

    for (key, value) in iter {
        map.insert(key, value);
    }

    map
}
