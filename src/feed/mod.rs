pub mod betsapi;
pub mod the_odds_api;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::{LiveEventOdds, OddsRecord};

/// Pre-match odds for one sport, bounded to `limit` events.
#[async_trait]
pub trait OddsFeed: Send + Sync {
    async fn fetch_odds(&self, sport: &str, limit: usize) -> Result<Vec<OddsRecord>>;
}

/// In-play odds, bounded to `limit` live events.
#[async_trait]
pub trait LiveFeed: Send + Sync {
    async fn fetch_live(&self, limit: usize) -> Result<Vec<LiveEventOdds>>;
}

/// Result of crossing the fetch boundary. Upstream faults never propagate
/// past it; `Failed` is served as an empty list.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(Vec<T>),
    Failed,
}

impl<T> FetchOutcome<T> {
    pub fn from_result(source: &str, result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => FetchOutcome::Fetched(items),
            Err(e) => {
                tracing::warn!(source, "odds fetch failed: {:#}", e);
                FetchOutcome::Failed
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed)
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            FetchOutcome::Fetched(items) => items,
            FetchOutcome::Failed => Vec::new(),
        }
    }
}

pub async fn fetch_odds(feed: &dyn OddsFeed, sport: &str, limit: usize) -> FetchOutcome<OddsRecord> {
    FetchOutcome::from_result(sport, feed.fetch_odds(sport, limit).await)
}

pub async fn fetch_live(feed: &dyn LiveFeed, limit: usize) -> FetchOutcome<LiveEventOdds> {
    FetchOutcome::from_result("in-play", feed.fetch_live(limit).await)
}
