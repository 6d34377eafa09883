//! Multi-valued maps for headers and query string parameters.
//!
//! API Gateway delivers both as `key -> [values]` objects. Headers match keys
//! without regard to ASCII case, query parameters match them exactly. One
//! container type covers both, parameterized by a [`KeyPolicy`].

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Decides whether two keys name the same entry.
pub trait KeyPolicy {
    fn same_key(stored: &str, candidate: &str) -> bool;
}

/// ASCII case-insensitive keys, as HTTP header names are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaseInsensitive;

impl KeyPolicy for CaseInsensitive {
    fn same_key(stored: &str, candidate: &str) -> bool {
        stored.eq_ignore_ascii_case(candidate)
    }
}

/// Exact key matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaseSensitive;

impl KeyPolicy for CaseSensitive {
    fn same_key(stored: &str, candidate: &str) -> bool {
        stored == candidate
    }
}

/// Insertion-ordered map from a key to an ordered list of values.
///
/// The spelling used the first time a key is inserted is the one kept and
/// serialized; later spellings that match under the policy join that entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValuedMap<P> {
    entries: Vec<(String, Vec<String>)>,
    policy: PhantomData<P>,
}

pub type Headers = MultiValuedMap<CaseInsensitive>;
pub type QueryParameters = MultiValuedMap<CaseSensitive>;

impl<P> MultiValuedMap<P> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            policy: PhantomData,
        }
    }

    /// Number of distinct keys
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl<P: KeyPolicy> MultiValuedMap<P> {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(stored, _)| P::same_key(stored, key))
    }

    /// Appends `value` to the list stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.append(key.into(), vec![value.into()]);
    }

    /// Replaces whatever is stored under `key` with the single `value`.
    pub fn put_single(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, vec![value.into()]);
    }

    /// Replaces whatever is stored under `key` with `values`.
    pub fn put(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.position(&key) {
            Some(index) => self.entries[index].1 = values,
            None => self.entries.push((key, values)),
        }
    }

    /// All values stored under `key`, in the order they were added.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.position(key)
            .map(|index| self.entries[index].1.as_slice())
    }

    /// The first value stored under `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.position(key)
            .map(|index| self.entries.remove(index).1)
    }

    fn append(&mut self, key: String, values: Vec<String>) {
        match self.position(&key) {
            Some(index) => self.entries[index].1.extend(values),
            None => self.entries.push((key, values)),
        }
    }
}

/// Borrowing iterator over `(key, values)` entries.
pub type Iter<'a> = std::iter::Map<
    std::slice::Iter<'a, (String, Vec<String>)>,
    fn(&'a (String, Vec<String>)) -> (&'a str, &'a [String]),
>;

fn entry_view((key, values): &(String, Vec<String>)) -> (&str, &[String]) {
    (key.as_str(), values.as_slice())
}

impl<'a, P> IntoIterator for &'a MultiValuedMap<P> {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(entry_view as fn(&'a (String, Vec<String>)) -> (&'a str, &'a [String]))
    }
}

impl<P> Default for MultiValuedMap<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: KeyPolicy, K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MultiValuedMap<P> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.add(key, value);
        }
        map
    }
}

impl<P> Serialize for MultiValuedMap<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl<'de, P: KeyPolicy> Deserialize<'de> for MultiValuedMap<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` shows up in real gateway events when nothing was sent
        deserializer.deserialize_any(MultiValuedMapVisitor(PhantomData))
    }
}

struct MultiValuedMapVisitor<P>(PhantomData<P>);

impl<'de, P: KeyPolicy> Visitor<'de> for MultiValuedMapVisitor<P> {
    type Value = MultiValuedMap<P>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of strings to lists of strings, or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MultiValuedMap::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MultiValuedMap::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = MultiValuedMap::new();
        while let Some((key, values)) = access.next_entry::<String, Vec<String>>()? {
            map.append(key, values);
        }
        Ok(map)
    }
}

impl<P> JsonSchema for MultiValuedMap<P> {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("MultiValuedMap")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, Vec<String>>>::json_schema(generator)
    }
}
