//! Play-count metrics.
//!
//! Every started game is counted locally. If an external counter service is
//! configured, the same event is also sent there in the background; gameplay
//! never waits on it and its failures are only logged.

mod http;

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use http::HttpCounter;

pub type MetricsResult<T> = Result<T, MetricsError>;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Counter request failed: {0}")]
    RequestFailed(String),

    #[error("Counter request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Counter response parsing failed: {0}")]
    ParseError(String),
}

/// A sink for "a game was started" events
#[async_trait]
pub trait PlayCounter: Send + Sync {
    async fn record_game_started(&self, players: usize) -> MetricsResult<()>;

    /// Total games started, as far as this counter knows
    async fn fetch_total(&self) -> MetricsResult<u64>;

    fn name(&self) -> &str;
}

/// Process-local counter; always available, lost on restart
#[derive(Debug, Default)]
pub struct InMemoryCounter {
    games: AtomicU64,
}

impl InMemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> u64 {
        self.games.load(Ordering::Relaxed)
    }

    fn increment(&self) {
        self.games.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl PlayCounter for InMemoryCounter {
    async fn record_game_started(&self, _players: usize) -> MetricsResult<()> {
        self.increment();
        Ok(())
    }

    async fn fetch_total(&self) -> MetricsResult<u64> {
        Ok(self.games())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// The counters held by `AppState`
#[derive(Clone, Default)]
pub struct PlayStats {
    local: Arc<InMemoryCounter>,
    remote: Option<Arc<dyn PlayCounter>>,
}

impl PlayStats {
    /// Local counting only
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote(remote: Arc<dyn PlayCounter>) -> Self {
        Self {
            local: Arc::new(InMemoryCounter::new()),
            remote: Some(remote),
        }
    }

    /// Count a started game. Returns immediately; the remote write runs on
    /// its own task.
    pub fn record_game_started(&self, players: usize) {
        self.local.increment();

        if let Some(remote) = self.remote.clone() {
            tokio::spawn(async move {
                if let Err(e) = remote.record_game_started(players).await {
                    tracing::warn!("Failed to record game on {}: {}", remote.name(), e);
                }
            });
        }
    }

    /// Games started in this process
    pub fn local_total(&self) -> u64 {
        self.local.games()
    }

    /// Remote total if reachable, otherwise the local count
    pub async fn total(&self) -> u64 {
        let Some(remote) = &self.remote else {
            return self.local_total();
        };
        match remote.fetch_total().await {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch total from {}, using local count: {}",
                    remote.name(),
                    e
                );
                self.local_total()
            }
        }
    }
}
