// ABOUTME: Integration tests for isabot-directory.
// ABOUTME: End-to-end searches and lookups through the HistoryProvider seam.

use async_trait::async_trait;
use isabot_directory::{
    AliasTable, Directory, DirectoryError, FilterClause, FilterSet, HistoryEntry, HistoryProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Helpers
// ============================================================================

fn alice_history() -> Vec<HistoryEntry> {
    vec![HistoryEntry::new(
        "Alice",
        "**Username:** alice\n**Writer or VA:** Writer\n**Script gender preferences:** Female, Male",
    )]
}

fn filters(raw: &str) -> FilterSet {
    FilterSet::parse(raw, &AliasTable::default()).unwrap()
}

struct FailingHistory;

#[async_trait]
impl HistoryProvider for FailingHistory {
    async fn fetch_recent(&self, _limit: usize) -> isabot_directory::Result<Vec<HistoryEntry>> {
        Err(DirectoryError::history("channel unavailable"))
    }
}

/// Records the limit it was asked for and how often it was called.
#[derive(Default)]
struct CountingHistory {
    calls: AtomicUsize,
    last_limit: AtomicUsize,
}

#[async_trait]
impl HistoryProvider for CountingHistory {
    async fn fetch_recent(&self, limit: usize) -> isabot_directory::Result<Vec<HistoryEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

// ============================================================================
// Search Scenarios
// ============================================================================

#[tokio::test]
async fn test_search_writer_finds_alice() {
    let directory = Directory::default();
    let result = directory
        .search(&filters("role=writer"), &alice_history())
        .await
        .unwrap();
    assert_eq!(result.identities, vec!["alice"]);
}

#[tokio::test]
async fn test_search_va_finds_nobody() {
    let directory = Directory::default();
    let result = directory
        .search(&filters("role=va"), &alice_history())
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_search_wildcard_treats_na_as_unset() {
    let history = vec![HistoryEntry::new(
        "Bob",
        "Username: bob\nMonetization of scripts allowed: N/A",
    )];
    let result = Directory::default()
        .search(&filters("monetization=?"), &history)
        .await
        .unwrap();
    assert!(result.identities.is_empty());
}

#[tokio::test]
async fn test_search_wildcard_matches_set_field() {
    let history = vec![HistoryEntry::new(
        "Carol",
        "Username: carol\nMonetary/Gift Links: Patreon",
    )];
    let result = Directory::default()
        .search(&filters("links=?"), &history)
        .await
        .unwrap();
    assert_eq!(result.identities, vec!["carol"]);
}

#[tokio::test]
async fn test_search_multi_clause_multi_value() {
    let history = vec![
        HistoryEntry::new("A", "Username: ann\nWriter or VA: Writer\nGenres: Fantasy"),
        HistoryEntry::new("B", "Username: ben\nWriter or VA: Writer\nGenres: Horror"),
        HistoryEntry::new("C", "Username: cat\nWriter or VA: VA\nGenres: Slice-of-life"),
        HistoryEntry::new("D", "Username: dan\nWriter or VA: Writer\nGenres: Slice-of-life, Comedy"),
    ];
    let result = Directory::default()
        .search(&filters("roles=writer & genres=fantasy, slice-of-life"), &history)
        .await
        .unwrap();
    assert_eq!(result.identities, vec!["ann", "dan"]);
    assert_eq!(result.filters.len(), 2);
}

#[tokio::test]
async fn test_search_with_substituted_alias_table() {
    let aliases = AliasTable::from_pairs([("voice", "Writer or VA")]);
    let directory = Directory::new(aliases.clone());
    let set = FilterSet::parse("voice=writer", &aliases).unwrap();
    let result = directory.search(&set, &alice_history()).await.unwrap();
    assert_eq!(result.identities, vec!["alice"]);

    // "role" is not in the substituted table and so never matches.
    let set = FilterSet::from_iter([FilterClause::new("role", ["writer"])]);
    let result = directory.search(&set, &alice_history()).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_search_propagates_history_failure() {
    let err = Directory::default()
        .search(&FilterSet::new(), &FailingHistory)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::History(_)));
    assert!(err.to_string().contains("channel unavailable"));
}

#[tokio::test]
async fn test_each_query_fetches_once_with_window() {
    let history = CountingHistory::default();
    let directory = Directory::default();
    directory.search(&FilterSet::new(), &history).await.unwrap();
    directory.show_one("nobody", &history).await.unwrap();
    assert_eq!(history.calls.load(Ordering::SeqCst), 2);
    assert_eq!(history.last_limit.load(Ordering::SeqCst), 500);
}

#[tokio::test]
async fn test_in_memory_history_is_bounded() {
    let history: Vec<HistoryEntry> = (0..600)
        .map(|i| HistoryEntry::new(format!("u{i}"), format!("Username: u{i}")))
        .collect();
    let result = Directory::default()
        .search(&FilterSet::new(), &history)
        .await
        .unwrap();
    assert_eq!(result.identities.len(), 500);
    assert_eq!(result.identities.first().map(String::as_str), Some("u0"));
}

// ============================================================================
// Single Lookup Scenarios
// ============================================================================

#[tokio::test]
async fn test_show_one_is_case_insensitive() {
    let found = Directory::default()
        .show_one("ALICE", &alice_history())
        .await
        .unwrap()
        .expect("alice should be found");
    assert_eq!(found.author, "Alice");
    assert_eq!(found.record.get("username"), Some("alice"));
    assert_eq!(found.record.get("writer or va"), Some("Writer"));
}

#[tokio::test]
async fn test_show_one_not_found_is_not_an_error() {
    let found = Directory::default()
        .show_one("dave", &alice_history())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_show_one_propagates_history_failure() {
    let result = Directory::default().show_one("alice", &FailingHistory).await;
    assert!(result.is_err());
}
