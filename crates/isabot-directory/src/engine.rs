// ABOUTME: Directory query engine over introduction posts.
// ABOUTME: Fetches bounded history once, then parses and filters synchronously.

use crate::alias::AliasTable;
use crate::error::Result;
use crate::filter::FilterSet;
use crate::history::{HistoryEntry, HistoryProvider};
use crate::record::IntroductionRecord;
use tracing::debug;

/// Number of recent messages any query looks at.
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// Field whose value names the person behind an introduction.
pub const DEFAULT_IDENTITY_FIELD: &str = "Username";

/// Matches of a search, in the order their messages were visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub identities: Vec<String>,
    pub filters: FilterSet,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

/// A single user's introduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Introduction {
    pub author: String,
    pub record: IntroductionRecord,
}

/// Query engine configured with an alias table and history window.
#[derive(Debug, Clone)]
pub struct Directory {
    aliases: AliasTable,
    identity_field: String,
    history_limit: usize,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new(AliasTable::default())
    }
}

impl Directory {
    pub fn new(aliases: AliasTable) -> Self {
        Self {
            aliases,
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = field.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Whether a record passes every clause. The empty set matches everything.
    pub fn matches(&self, record: &IntroductionRecord, filters: &FilterSet) -> bool {
        filters.clauses().iter().all(|clause| {
            let field = self.aliases.resolve(clause.key());
            clause.accepts(&record.values_of(&field))
        })
    }

    /// The record's identity, if it has exactly one non-empty value.
    pub fn identity_of(&self, record: &IntroductionRecord) -> Option<String> {
        let raw = record.get(&self.identity_field)?.trim();
        if raw.is_empty() || raw.contains(',') {
            return None;
        }
        Some(raw.to_string())
    }

    /// Fetch history and collect identities of matching introductions.
    pub async fn search(
        &self,
        filters: &FilterSet,
        source: &dyn HistoryProvider,
    ) -> Result<QueryResult> {
        debug!(filters = ?filters, limit = self.history_limit, "Searching introductions");
        let entries = source.fetch_recent(self.history_limit).await?;
        let result = self.search_entries(filters, &entries);
        debug!(found = ?result.identities, "Search finished");
        Ok(result)
    }

    /// Synchronous scan over an already fetched batch.
    pub fn search_entries(&self, filters: &FilterSet, entries: &[HistoryEntry]) -> QueryResult {
        let mut identities = Vec::new();

        for entry in entries.iter().take(self.history_limit) {
            let record = IntroductionRecord::parse(&entry.body);
            if !self.matches(&record, filters) {
                continue;
            }
            match self.identity_of(&record) {
                Some(identity) => identities.push(identity),
                None => debug!(
                    author = %entry.author,
                    field = %self.identity_field,
                    "Matching introduction has no usable identity, skipping"
                ),
            }
        }

        QueryResult {
            identities,
            filters: filters.clone(),
        }
    }

    /// Fetch history and return the first introduction posted by `identity`.
    pub async fn show_one(
        &self,
        identity: &str,
        source: &dyn HistoryProvider,
    ) -> Result<Option<Introduction>> {
        debug!(identity = %identity, limit = self.history_limit, "Looking up introduction");
        let entries = source.fetch_recent(self.history_limit).await?;
        Ok(self.show_one_in(identity, &entries))
    }

    /// Synchronous lookup over an already fetched batch.
    pub fn show_one_in(&self, identity: &str, entries: &[HistoryEntry]) -> Option<Introduction> {
        let wanted = identity.trim().to_lowercase();
        entries
            .iter()
            .take(self.history_limit)
            .find(|entry| entry.author.to_lowercase() == wanted)
            .map(|entry| Introduction {
                author: entry.author.clone(),
                record: IntroductionRecord::parse(&entry.body),
            })
    }
}
