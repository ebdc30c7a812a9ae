// ABOUTME: Filter clauses and sets for directory searches.
// ABOUTME: Parses the "key=a, b & key2=c" argument grammar and evaluates clauses against values.

use crate::alias::AliasTable;
use crate::error::{DirectoryError, Result};
use crate::record::split_values;
use std::collections::BTreeSet;
use std::fmt;

/// Filter value meaning "field is set to anything meaningful".
pub const WILDCARD: &str = "?";

/// Values that count as "not set" for the wildcard.
const EMPTY_MARKERS: [&str; 4] = ["", "-", "n/a", "none"];

/// One key with its allowed values (OR within the clause).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    key: String,
    values: BTreeSet<String>,
}

impl FilterClause {
    /// Build a clause. Values are lower-cased and trimmed.
    pub fn new<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            key: key.into(),
            values: values
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// The key as supplied by the caller, before alias resolution.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    pub fn is_wildcard(&self) -> bool {
        self.values.len() == 1 && self.values.contains(WILDCARD)
    }

    /// Whether a record's (lower-cased) values for this clause's field pass.
    pub fn accepts(&self, user_values: &BTreeSet<String>) -> bool {
        if self.is_wildcard() {
            return match user_values.len() {
                0 => false,
                1 => user_values
                    .iter()
                    .all(|v| !EMPTY_MARKERS.contains(&v.as_str())),
                _ => true,
            };
        }
        !user_values.is_disjoint(&self.values)
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        write!(f, "{} = {}", self.key, values.join(" | "))
    }
}

/// All clauses must pass (AND across clauses).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw search argument.
    ///
    /// Grammar: clauses separated by `" & "`; each clause is `key=values`
    /// split on the first `=` with surrounding whitespace trimmed; values are
    /// separated by `,` and optional whitespace. Keys and values are
    /// lower-cased. A blank argument is the empty set.
    pub fn parse(raw: &str, aliases: &AliasTable) -> Result<Self> {
        let mut set = Self::new();
        if raw.trim().is_empty() {
            return Ok(set);
        }

        for clause in raw.split(" & ") {
            let (key, values) = clause
                .split_once('=')
                .ok_or_else(|| DirectoryError::InvalidFilter(clause.trim().to_string()))?;
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                return Err(DirectoryError::InvalidFilter(clause.trim().to_string()));
            }
            set.push(FilterClause::new(key, split_values(values)), aliases);
        }

        Ok(set)
    }

    /// Append a clause. A clause for the same canonical field replaces the
    /// earlier one in place.
    pub fn push(&mut self, clause: FilterClause, aliases: &AliasTable) {
        let canonical = aliases.resolve(clause.key()).to_lowercase();
        match self
            .clauses
            .iter_mut()
            .find(|existing| aliases.resolve(existing.key()).to_lowercase() == canonical)
        {
            Some(slot) => *slot = clause,
            None => self.clauses.push(clause),
        }
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<FilterClause> for FilterSet {
    /// Collect clauses verbatim, without alias-aware replacement.
    fn from_iter<I: IntoIterator<Item = FilterClause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}
