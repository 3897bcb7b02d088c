//! The token → original table built by scrub and consumed by restore.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// A flat token → original-value table.
///
/// Built fresh per scrub call and never aliasing caller storage. Token
/// uniqueness is the policy author's responsibility: [`SecretStore::insert`]
/// silently overwrites on collision and hands back the displaced original.
/// Values may repeat — two leaves holding the same original each get their
/// own token.
///
/// The store typically outlives the scrub call that built it: serialize it
/// (with the `json` feature it is a transparent string-to-string map) and
/// feed it to a later restore, possibly in another process. Restore takes a
/// private working copy before mutating anything, so a shared store is read,
/// never written ("copy-then-read"; no locking is provided, so do not mutate
/// a store concurrently with a restore that is copying it).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SecretStore {
    entries: BTreeMap<String, String>,
}

impl SecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `token → original`, returning the displaced original on a
    /// token collision.
    pub fn insert(
        &mut self,
        token: impl Into<String>,
        original: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(token.into(), original.into())
    }

    /// Looks up the original for `token`.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// Removes and returns the original for `token`.
    ///
    /// Restore consumes entries through this method so each token is
    /// substituted at most once per call.
    pub fn take(&mut self, token: &str) -> Option<String> {
        self.entries.remove(token)
    }

    /// Returns `true` when `token` is known.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(token, original)| (token.as_str(), original.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(token, original)| (token.into(), original.into()))
                .collect(),
        }
    }
}

impl IntoIterator for SecretStore {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<(String, String)> for SecretStore {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_displaced_original_on_collision() {
        let mut store = SecretStore::new();
        assert_eq!(store.insert("t", "first"), None);
        assert_eq!(store.insert("t", "second"), Some(String::from("first")));
        assert_eq!(store.get("t"), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn take_consumes_the_entry() {
        let mut store: SecretStore = [("t", "original")].into_iter().collect();
        assert_eq!(store.take("t"), Some(String::from("original")));
        assert_eq!(store.take("t"), None);
        assert!(store.is_empty());
    }

    #[cfg(feature = "json")]
    #[test]
    fn serializes_as_a_flat_table() {
        let store: SecretStore = [("$ref-/a", "x")].into_iter().collect();
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"$ref-/a":"x"}"#);
        let rebuilt: SecretStore = serde_json::from_str(&json).unwrap();
        assert_eq!(rebuilt, store);
    }
}
