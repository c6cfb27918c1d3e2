//! The output mapping: keys with ordered, possibly repeated values.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

/// A multi-valued string mapping, ready for URL query encoding.
///
/// Keys are kept sorted; the values of one key keep insertion order.
///
/// ```rust
/// use qsenc::Values;
///
/// let mut values = Values::new();
/// values.add("tags", "x");
/// values.add("tags", "y");
/// values.set("q", "rust lang");
///
/// assert_eq!(values.get("tags"), Some("x"));
/// assert_eq!(values.get_all("tags"), ["x", "y"]);
/// assert_eq!(values.encode(), "q=rust+lang&tags=x&tags=y");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Values {
    inner: BTreeMap<String, Vec<String>>,
}

impl Values {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces the values of `key` with the single `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of `key`, in order. Empty if the key is missing.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Removes `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    /// Returns `true` if `key` has at least one value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over keys and their values in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Vec<String>> {
        self.inner.keys()
    }

    /// Appends every value of `other`, key by key.
    pub fn merge(&mut self, other: Values) {
        for (key, mut values) in other.inner {
            self.inner.entry(key).or_default().append(&mut values);
        }
    }

    /// Renders the mapping as `application/x-www-form-urlencoded`, sorted by
    /// key.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.inner {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        values.extend(iter);
        values
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Values {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl IntoIterator for Values {
    type Item = (String, Vec<String>);
    type IntoIter = btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl std::fmt::Display for Values {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_add_appends() {
        let mut values = Values::new();
        values.add("a", "1");
        values.add("a", "2");
        assert_eq!(values.get_all("a"), ["1", "2"]);
        values.set("a", "3");
        assert_eq!(values.get_all("a"), ["3"]);
        assert!(values.get_all("missing").is_empty());
        assert_eq!(values.get("missing"), None);
    }

    #[test]
    fn merge_appends_per_key() {
        let mut left: Values = [("a", "1"), ("b", "2")].into_iter().collect();
        let right: Values = [("a", "3"), ("c", "4")].into_iter().collect();
        left.merge(right);
        assert_eq!(left.get_all("a"), ["1", "3"]);
        assert_eq!(left.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn encode_escapes_brackets_and_spaces() {
        let values: Values = [("user[name]", "a b"), ("tags", "x,y")].into_iter().collect();
        assert_eq!(values.encode(), "tags=x%2Cy&user%5Bname%5D=a+b");
    }
}
