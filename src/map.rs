//! Ordered map type for KV3 objects.
//!
//! This module provides [`KvMap`], a wrapper around [`IndexMap`] that maintains
//! insertion order for object members. KV3 files are hand-edited and diffed, so
//! both writers emit keys in the order they were read or inserted.
//!
//! A `KvMap` can also carry the comments that preceded each key in text input.
//! Comments never take part in equality.
//!
//! ## Examples
//!
//! ```rust
//! use keyvalues3::{KvMap, Value};
//!
//! let mut map = KvMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::value::Comment;
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to KV3 values.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{KvMap, Value};
///
/// let mut map = KvMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KvMap {
    entries: IndexMap<String, Value>,
    comments: HashMap<String, Vec<Comment>>,
}

impl KvMap {
    #[must_use]
    pub fn new() -> Self {
        KvMap::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        KvMap {
            entries: IndexMap::with_capacity(capacity),
            comments: HashMap::new(),
        }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues3::{KvMap, Value};
    ///
    /// let mut map = KvMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Looks up `key`, failing with [`Error::KeyNotFound`] when absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues3::{Error, KvMap};
    ///
    /// let map = KvMap::new();
    /// assert_eq!(map.try_get("missing"), Err(Error::KeyNotFound("missing".to_string())));
    /// ```
    pub fn try_get(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Looks up `key`, returning `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.entries.get(key).unwrap_or(default)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a key, shifting later keys down to keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.comments.remove(key);
        self.entries.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.entries.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.entries.iter_mut()
    }

    /// Comments that preceded `key` in text input.
    #[must_use]
    pub fn comments(&self, key: &str) -> &[Comment] {
        self.comments.get(key).map_or(&[], Vec::as_slice)
    }

    /// Replaces the comments attached to `key`. An empty list clears them.
    pub fn set_comments(&mut self, key: &str, comments: Vec<Comment>) {
        if comments.is_empty() {
            self.comments.remove(key);
        } else {
            self.comments.insert(key.to_string(), comments);
        }
    }

    /// Strict comparison: same keys in the same order with deep-equal values.
    #[must_use]
    pub fn deep_eq(&self, other: &KvMap) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.deep_eq(vb))
    }
}

/// Order-insensitive; comments are ignored.
impl PartialEq for KvMap {
    fn eq(&self, other: &KvMap) -> bool {
        self.entries == other.entries
    }
}

impl From<HashMap<String, Value>> for KvMap {
    fn from(map: HashMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<KvMap> for HashMap<String, Value> {
    fn from(map: KvMap) -> Self {
        map.entries.into_iter().collect()
    }
}

impl IntoIterator for KvMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a KvMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for KvMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        KvMap {
            entries: IndexMap::from_iter(iter),
            comments: HashMap::new(),
        }
    }
}
