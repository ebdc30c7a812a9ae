// ABOUTME: Maps informal filter keys to the canonical field names used in introductions.
// ABOUTME: Immutable table built once at startup and passed explicitly to the engine.

use std::borrow::Cow;
use std::collections::HashMap;

/// Built-in aliases: informal key -> canonical field name.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("name", "Username"),
    ("user", "Username"),
    ("role", "Writer or VA"),
    ("roles", "Writer or VA"),
    ("gender", "Script gender preferences"),
    ("genders", "Script gender preferences"),
    ("genre", "Genres"),
    ("genres", "Genres"),
    ("youtube", "YouTube"),
    ("yt", "YouTube"),
    ("range", "Vocal range"),
    ("vocal range", "Vocal range"),
    ("monetization", "Monetization of scripts allowed"),
    ("monetisation", "Monetization of scripts allowed"),
    ("links", "Monetary/Gift Links"),
    ("gift links", "Monetary/Gift Links"),
    ("pronouns", "Pronouns"),
    ("tz", "Timezone"),
    ("timezone", "Timezone"),
];

/// Case-insensitive alias lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// An empty table: every key resolves to itself.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Build a table from (informal, canonical) pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::empty();
        table.extend(pairs);
        table
    }

    /// Add or replace entries. Informal keys are stored lower-cased.
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (informal, canonical) in pairs {
            self.entries
                .insert(informal.as_ref().trim().to_lowercase(), canonical.into());
        }
    }

    /// Resolve a raw filter key. Unknown keys come back unchanged.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> Cow<'a, str> {
        match self.entries.get(&raw.to_lowercase()) {
            Some(canonical) => Cow::Borrowed(canonical.as_str()),
            None => Cow::Borrowed(raw),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ALIASES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_aliases_case_insensitive() {
        let table = AliasTable::default();
        assert_eq!(table.resolve("role"), "Writer or VA");
        assert_eq!(table.resolve("ROLES"), "Writer or VA");
        assert_eq!(table.resolve("YouTube"), "YouTube");
        assert_eq!(table.resolve("range"), "Vocal range");
    }

    #[test]
    fn test_resolve_unknown_passes_through() {
        let table = AliasTable::default();
        assert_eq!(table.resolve("Favourite Colour"), "Favourite Colour");
        assert_eq!(table.resolve(""), "");
    }

    #[test]
    fn test_resolve_is_idempotent_on_canonical_names() {
        let table = AliasTable::default();
        for (informal, _) in DEFAULT_ALIASES {
            let once = table.resolve(informal).into_owned();
            let twice = table.resolve(&once).into_owned();
            assert_eq!(once, twice, "alias chain through {informal:?}");
        }
    }

    #[test]
    fn test_extend_overrides_and_adds() {
        let mut table = AliasTable::default();
        table.extend([("va", "Writer or VA"), ("Name", "Discord name")]);
        assert_eq!(table.resolve("va"), "Writer or VA");
        assert_eq!(table.resolve("name"), "Discord name");
    }

    #[test]
    fn test_empty_table_is_identity() {
        let table = AliasTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.resolve("role"), "role");
    }
}
