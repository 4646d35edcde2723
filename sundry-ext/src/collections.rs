//! Collection helpers: joins, defaulted lookups, keyed diffs and a map with
//! descriptive key errors.

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{Display, Write};
use std::hash::Hash;

use crate::error::MapError;

// ============================================================================
// Joins
// ============================================================================

/// Join any iterator of displayable items.
pub trait JoinExt {
    /// Join the items with `delimiter`.
    fn join_with(self, delimiter: &str) -> String;

    /// Join the items with `count` newlines between each.
    fn join_lines(self, count: usize) -> String;
}

impl<I> JoinExt for I
where
    I: IntoIterator,
    I::Item: Display,
{
    fn join_with(self, delimiter: &str) -> String {
        let mut out = String::new();
        for (i, item) in self.into_iter().enumerate() {
            if i > 0 {
                out.push_str(delimiter);
            }
            let _ = write!(out, "{item}");
        }
        out
    }

    fn join_lines(self, count: usize) -> String {
        self.join_with(&"\n".repeat(count))
    }
}

/// Safe [`JoinExt::join_with`]: `None` in, `None` out.
pub fn join_opt<I>(items: Option<I>, delimiter: &str) -> Option<String>
where
    I: IntoIterator,
    I::Item: Display,
{
    items.map(|items| items.join_with(delimiter))
}

/// Safe [`JoinExt::join_lines`]: `None` in, `None` out.
pub fn join_lines_opt<I>(items: Option<I>, count: usize) -> Option<String>
where
    I: IntoIterator,
    I::Item: Display,
{
    items.map(|items| items.join_lines(count))
}

// ============================================================================
// Defaulted lookups
// ============================================================================

/// Index lookups that fall back to a default instead of panicking.
pub trait SliceExt<T> {
    /// The item at `index`, or `default` when out of range.
    fn get_or(&self, index: usize, default: T) -> T;
}

impl<T: Clone> SliceExt<T> for [T] {
    fn get_or(&self, index: usize, default: T) -> T {
        self.get(index).cloned().unwrap_or(default)
    }
}

/// Safe [`SliceExt::get_or`]: an absent slice yields `default`.
pub fn get_or_opt<T: Clone>(items: Option<&[T]>, index: usize, default: T) -> T {
    match items {
        Some(items) => items.get_or(index, default),
        None => default,
    }
}

/// False for an absent slice, otherwise whether it contains `item`.
pub fn contains_item_opt<T: PartialEq>(items: Option<&[T]>, item: &T) -> bool {
    items.map_or(false, |items| items.contains(item))
}

/// False for an absent slice, otherwise whether any item matches `predicate`.
pub fn contains_where_opt<T, P>(items: Option<&[T]>, predicate: P) -> bool
where
    P: Fn(&T) -> bool,
{
    items.map_or(false, |items| items.iter().any(predicate))
}

/// Keyed lookups that fall back to a default.
pub trait MapExt<K, V> {
    /// The value for `key` (cloned), or `default` when missing.
    fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Ord + Eq + ?Sized;
}

impl<K: Hash + Eq, V: Clone> MapExt<K, V> for HashMap<K, V> {
    fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Ord + Eq + ?Sized,
    {
        self.get(key).cloned().unwrap_or(default)
    }
}

impl<K: Ord, V: Clone> MapExt<K, V> for BTreeMap<K, V> {
    fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Ord + Eq + ?Sized,
    {
        self.get(key).cloned().unwrap_or(default)
    }
}

/// Safe [`MapExt::get_or`]: an absent map yields `default`.
pub fn map_get_or_opt<M, K, V, Q>(map: Option<&M>, key: &Q, default: V) -> V
where
    M: MapExt<K, V>,
    K: Borrow<Q>,
    Q: Hash + Ord + Eq + ?Sized,
{
    match map {
        Some(map) => map.get_or(key, default),
        None => default,
    }
}

/// A vector holding `count` clones of `value`.
pub fn repeated<T: Clone>(value: T, count: usize) -> Vec<T> {
    vec![value; count]
}

// ============================================================================
// Keyed diff
// ============================================================================

/// A pair of items sharing a key but differing in value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modified<'a, T> {
    /// The item from the left (old) side.
    pub left: &'a T,
    /// The item from the right (new) side.
    pub right: &'a T,
}

/// The result of [`diff_by_key`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedDiff<'a, T> {
    /// Keys only present on the right side (right order).
    pub added: Vec<&'a T>,
    /// Keys only present on the left side (left order).
    pub removed: Vec<&'a T>,
    /// Keys on both sides whose items differ (left order).
    pub modified: Vec<Modified<'a, T>>,
    /// Keys on both sides whose items are equal (left order).
    pub identical: Vec<&'a T>,
}

impl<T> KeyedDiff<'_, T> {
    /// True when nothing was added, removed or modified.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compare two collections by key.
///
/// Items are matched by `key`; matched pairs are classified as modified or
/// identical with `PartialEq`. When a key repeats on one side, the first
/// occurrence wins.
pub fn diff_by_key<'a, T, K, F>(left: &'a [T], right: &'a [T], key: F) -> KeyedDiff<'a, T>
where
    T: PartialEq,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut right_by_key: HashMap<K, &'a T> = HashMap::with_capacity(right.len());
    for item in right {
        right_by_key.entry(key(item)).or_insert(item);
    }

    let mut seen: HashSet<K> = HashSet::with_capacity(left.len());
    let mut diff = KeyedDiff {
        added: Vec::new(),
        removed: Vec::new(),
        modified: Vec::new(),
        identical: Vec::new(),
    };

    for item in left {
        let k = key(item);
        if seen.contains(&k) {
            continue;
        }
        match right_by_key.get(&k) {
            Some(other) if *other == item => diff.identical.push(item),
            Some(other) => diff.modified.push(Modified {
                left: item,
                right: *other,
            }),
            None => diff.removed.push(item),
        }
        seen.insert(k);
    }

    let mut added_keys: HashSet<K> = HashSet::new();
    for item in right {
        let k = key(item);
        if !seen.contains(&k) && !added_keys.contains(&k) {
            diff.added.push(item);
            added_keys.insert(k);
        }
    }

    diff
}

// ============================================================================
// StrictMap
// ============================================================================

/// A `HashMap` whose failing lookups and duplicate inserts report the key.
#[derive(Debug, Clone)]
pub struct StrictMap<K, V> {
    inner: HashMap<K, V>,
}

impl<K, V> Default for StrictMap<K, V> {
    fn default() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Display, V> StrictMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity(capacity),
        }
    }

    /// Build a map, failing on the first duplicate key.
    pub fn try_from_iter<I>(iter: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert_new(k, v)?;
        }
        Ok(map)
    }

    /// The value for `key`, or [`MapError::MissingKey`].
    pub fn get<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.inner
            .get(key)
            .ok_or_else(|| MapError::MissingKey(key.to_string()))
    }

    /// Mutable access to the value for `key`, or [`MapError::MissingKey`].
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.inner
            .get_mut(key)
            .ok_or_else(|| MapError::MissingKey(key.to_string()))
    }

    /// Insert a new entry, or [`MapError::DuplicateKey`] if the key exists.
    pub fn insert_new(&mut self, key: K, value: V) -> Result<(), MapError> {
        match self.inner.entry(key) {
            Entry::Occupied(e) => Err(MapError::DuplicateKey(e.key().to_string())),
            Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }

    /// Insert or overwrite, returning the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    /// Remove an entry, returning its value if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.remove(key)
    }

    /// True when `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.iter()
    }

    /// Unwrap into the underlying `HashMap`.
    pub fn into_inner(self) -> HashMap<K, V> {
        self.inner
    }
}

impl<K: Hash + Eq, V> From<HashMap<K, V>> for StrictMap<K, V> {
    fn from(inner: HashMap<K, V>) -> Self {
        Self { inner }
    }
}
