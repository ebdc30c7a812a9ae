// ABOUTME: Library root for isabot-directory.
// ABOUTME: Exports the introduction parser, alias table, filters and query engine.

pub mod alias;
pub mod engine;
pub mod error;
pub mod filter;
pub mod history;
pub mod record;

pub use alias::AliasTable;
pub use engine::{Directory, Introduction, QueryResult, DEFAULT_HISTORY_LIMIT, DEFAULT_IDENTITY_FIELD};
pub use error::{DirectoryError, Result};
pub use filter::{FilterClause, FilterSet, WILDCARD};
pub use history::{HistoryEntry, HistoryProvider};
pub use record::IntroductionRecord;
