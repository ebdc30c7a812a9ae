// ABOUTME: Parses free-text introduction posts into key-value records.
// ABOUTME: Tolerant line grammar "Key: Value" with optional ** / __ emphasis markers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// `**Key:** value`, `Key: value`, `__Key__: value` ...
static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\*\*|__)?(?P<key>[^:]*):(?:\*\*|__)?\s*(?P<value>.*)$")
        .expect("introduction line pattern is valid")
});

/// Innermost clarifying note in a key, e.g. `Pronouns (optional)`.
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\)").expect("parenthetical pattern is valid"));

/// Structured fields scraped from one introduction post.
///
/// Field names keep the case they were written in; every lookup is
/// case-insensitive. Order follows the first appearance of each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntroductionRecord {
    fields: Vec<(String, String)>,
}

impl IntroductionRecord {
    /// Parse a message body. Lines that are not `Key: Value` are skipped.
    pub fn parse(text: &str) -> Self {
        let mut record = Self::default();

        for line in text.lines() {
            let Some(caps) = LINE.captures(line) else {
                continue;
            };

            let key = clean_key(&caps["key"]);
            if key.is_empty() {
                continue;
            }
            record.insert(key, caps["value"].trim().to_string());
        }

        record
    }

    /// Insert or overwrite a field. A field already present under any casing
    /// keeps its position and takes the new spelling and value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some(slot) => *slot = (key, value),
            None => self.fields.push((key, value)),
        }
    }

    /// Case-insensitive field lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// The field's value as a lower-cased set of comma-separated items.
    /// Missing fields yield an empty set.
    pub fn values_of(&self, key: &str) -> BTreeSet<String> {
        self.get(key).map(split_values).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a comma-separated list into trimmed, lower-cased items.
pub(crate) fn split_values(raw: &str) -> BTreeSet<String> {
    raw.split(',').map(|item| item.trim().to_lowercase()).collect()
}

fn clean_key(raw: &str) -> String {
    // Peel nested notes from the inside out, then drop unmatched closers.
    let mut stripped = raw.to_string();
    while PARENTHETICAL.is_match(&stripped) {
        stripped = PARENTHETICAL.replace_all(&stripped, "").into_owned();
    }
    stripped
        .replace(')', "")
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_emphasized_lines() {
        let record = IntroductionRecord::parse("Username: bob\n**Writer or VA:** Writer, VA");
        assert_eq!(record.get("Username"), Some("bob"));
        assert_eq!(record.get("Writer or VA"), Some("Writer, VA"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_parse_emphasis_before_colon() {
        let record = IntroductionRecord::parse("**Pronouns**: she/her\n__Timezone__: UTC+1");
        assert_eq!(record.get("pronouns"), Some("she/her"));
        assert_eq!(record.get("timezone"), Some("UTC+1"));
    }

    #[test]
    fn test_parse_strips_parentheticals_from_keys() {
        let record =
            IntroductionRecord::parse("**Script gender preferences (F4M, M4F etc):** Female, Male");
        assert_eq!(record.get("Script gender preferences"), Some("Female, Male"));
        assert!(record.iter().all(|(k, _)| !k.contains('(')));
    }

    #[test]
    fn test_parse_strips_nested_and_unbalanced_parentheticals() {
        let record = IntroductionRecord::parse(
            "Links (Ko-fi (optional)): ko-fi.com/dee\nGenres (any)): horror",
        );
        assert_eq!(record.get("Links"), Some("ko-fi.com/dee"));
        assert_eq!(record.get("Genres"), Some("horror"));
        assert!(record.iter().all(|(k, _)| !k.contains(')')));
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let record = IntroductionRecord::parse("Hi everyone!\n\n: orphan value\nUsername: carol");
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("username"), Some("carol"));
    }

    #[test]
    fn test_parse_trims_values_and_allows_empty() {
        let record = IntroductionRecord::parse("Links:   \nUsername:   dave   ");
        assert_eq!(record.get("links"), Some(""));
        assert_eq!(record.get("username"), Some("dave"));
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let record = IntroductionRecord::parse("YouTube: https://youtube.com/@alice");
        assert_eq!(record.get("youtube"), Some("https://youtube.com/@alice"));
    }

    #[test]
    fn test_duplicate_keys_last_wins_first_position() {
        let record = IntroductionRecord::parse("Username: a\nGenres: horror\nusername: b");
        assert_eq!(record.get("USERNAME"), Some("b"));
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["username", "Genres"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "**Username:** alice\nGenres: Fantasy, Slice-of-life";
        assert_eq!(IntroductionRecord::parse(text), IntroductionRecord::parse(text));
    }

    #[test]
    fn test_values_of_splits_and_folds_case() {
        let record = IntroductionRecord::parse("Genres: Fantasy,Slice-of-life ,  Horror");
        let values = record.values_of("GENRES");
        assert_eq!(
            values.into_iter().collect::<Vec<_>>(),
            vec!["fantasy", "horror", "slice-of-life"]
        );
        assert!(record.values_of("missing").is_empty());
    }
}
