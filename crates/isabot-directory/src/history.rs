// ABOUTME: HistoryProvider trait, the engine's only external collaborator.
// ABOUTME: Supplies the most recent messages of the introductions channel.

use crate::error::Result;
use async_trait::async_trait;

/// One message from channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Author's account name.
    pub author: String,
    /// Raw message content.
    pub body: String,
}

impl HistoryEntry {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
        }
    }
}

/// Source of channel history.
///
/// Implementations return at most `limit` entries, most recent first. Each
/// call is a fresh fetch; retries and network timeouts are the provider's
/// business.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
}

/// In-memory history, most recent first.
#[async_trait]
impl HistoryProvider for Vec<HistoryEntry> {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Ok(self.iter().take(limit).cloned().collect())
    }
}
