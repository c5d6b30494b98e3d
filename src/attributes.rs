//! Ordered string attribute maps.
//!
//! An [`AttributeStore`] is the building block of a partner identity: it holds
//! sender IDs, receiver IDs, and free-form partnership configuration. Keys are
//! unique and iteration follows insertion order, so serialized output and
//! `Display` are deterministic.
//!
//! The store never holds an explicit "null": setting a key to `None` removes
//! it. Presence of a key is its value.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Outcome of a mutating attribute operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    /// The store content differs from before the call.
    Changed,
    /// The call left the store as it was.
    Unchanged,
}

impl Change {
    /// Returns true for [`Change::Changed`].
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }

    /// Combines two outcomes: changed if either changed.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        if self.is_changed() || other.is_changed() {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

impl From<bool> for Change {
    fn from(changed: bool) -> Self {
        if changed {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

/// An insertion-ordered map from non-empty string keys to string values.
///
/// Cloning produces a fully independent store; accessors that hand out owned
/// data ([`AttributeStore::get_all`]) return such a clone so callers can
/// never mutate the owner through it. Equality compares the key/value
/// mapping and ignores insertion order.
///
/// # Examples
///
/// ```
/// use as2_partnership::AttributeStore;
///
/// let mut ids = AttributeStore::new();
/// ids.set("as2_id", Some("ACME")).unwrap();
/// assert_eq!(ids.get("as2_id"), Some("ACME"));
///
/// ids.set("as2_id", None::<&str>).unwrap();
/// assert!(!ids.contains("as2_id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    entries: Vec<(String, String)>,
}

impl AttributeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    fn check_key(key: &str) -> Result<(), ValidationError> {
        if key.is_empty() {
            return Err(ValidationError::EmptyKey { store: "attributes" });
        }
        Ok(())
    }

    /// Sets `key` to `value`, or removes it when `value` is `None`.
    ///
    /// Overwriting an existing key keeps its position in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if `key` is empty.
    pub fn set<K, V>(&mut self, key: K, value: Option<V>) -> Result<Change, ValidationError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let key = key.as_ref();
        Self::check_key(key)?;
        Ok(self.apply(key, value.map(Into::into)))
    }

    pub(crate) fn apply(&mut self, key: &str, value: Option<String>) -> Change {
        match (self.position(key), value) {
            (Some(idx), None) => {
                self.entries.remove(idx);
                Change::Changed
            }
            (None, None) => Change::Unchanged,
            (Some(idx), Some(value)) => {
                let slot = &mut self.entries[idx].1;
                if *slot == value {
                    Change::Unchanged
                } else {
                    *slot = value;
                    Change::Changed
                }
            }
            (None, Some(value)) => {
                self.entries.push((key.to_string(), value));
                Change::Changed
            }
        }
    }

    /// Removes `key`. An empty or unknown key is a no-op.
    pub fn remove(&mut self, key: &str) -> Change {
        self.apply(key, None)
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|idx| self.entries[idx].1.as_str())
    }

    /// Returns the value for `key`, or `default` if it is absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Returns an independent copy of all entries.
    #[must_use]
    pub fn get_all(&self) -> Self {
        self.clone()
    }

    /// Applies every entry of `entries` on top of the current content.
    ///
    /// Keys not mentioned in `entries` are left alone. A `None` value removes
    /// the key. All keys are validated before anything is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if any key is empty; the store is
    /// not modified in that case.
    pub fn add_all<I, K, V>(&mut self, entries: I) -> Result<Change, ValidationError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let staged: Vec<(String, Option<String>)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.map(Into::into)))
            .collect();
        for (key, _) in &staged {
            Self::check_key(key)?;
        }

        let mut change = Change::Unchanged;
        for (key, value) in staged {
            change = change.or(self.apply(&key, value));
        }
        Ok(change)
    }

    /// Overwrites the whole content with a copy of `other`.
    pub fn replace_with(&mut self, other: &Self) -> Change {
        if self.entries == other.entries {
            return Change::Unchanged;
        }
        self.entries.clone_from(&other.entries);
        Change::Changed
    }

    /// Subset check used for partner matching.
    ///
    /// Returns true if `self` is non-empty and every entry of `self` is
    /// present in `target` with an identical value. An empty store is never a
    /// subset, so an unconfigured identity cannot match everything.
    #[must_use]
    pub fn is_subset_of(&self, target: &Self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.entries
            .iter()
            .all(|(key, value)| target.get(key) == Some(value.as_str()))
    }
}

impl PartialEq for AttributeStore {
    fn eq(&self, other: &Self) -> bool {
        // Keys are unique, so equal length plus containment is set equality.
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value.as_str()))
    }
}

impl Eq for AttributeStore {}

impl<K, V> FromIterator<(K, V)> for AttributeStore
where
    K: Into<String>,
    V: Into<String>,
{
    /// Collects pairs, later duplicates overwriting earlier ones. Entries with
    /// an empty key are skipped.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            let key = key.into();
            if !key.is_empty() {
                store.apply(&key, Some(value.into()));
            }
        }
        store
    }
}

impl fmt::Display for AttributeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for AttributeStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = AttributeStore;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string attributes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut store = AttributeStore::new();
                while let Some((key, value)) = access.next_entry::<String, Option<String>>()? {
                    if key.is_empty() {
                        return Err(serde::de::Error::custom("attribute key cannot be empty"));
                    }
                    store.apply(&key, value);
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
