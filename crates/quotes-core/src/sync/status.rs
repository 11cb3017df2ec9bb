use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Whether a fetch is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Fetching,
}

/// Result of the most recent fetch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Success { fetched: usize, at: DateTime<Utc> },
    Failure { message: String, at: DateTime<Utc> },
}

/// Idle -> Fetching -> (Success | Failure) -> Idle.
/// The outcome survives the return to `Idle` so the UI can keep showing it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    pub last_outcome: Option<SyncOutcome>,
}

impl SyncStatus {
    pub fn fetching(&self) -> Self {
        Self {
            phase: SyncPhase::Fetching,
            last_outcome: self.last_outcome.clone(),
        }
    }

    pub fn finished(outcome: SyncOutcome) -> Self {
        Self {
            phase: SyncPhase::Idle,
            last_outcome: Some(outcome),
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.phase == SyncPhase::Fetching
    }

    /// One-line description for a status readout
    pub fn describe(&self) -> String {
        let last = match &self.last_outcome {
            None => "never synced".to_string(),
            Some(SyncOutcome::Success { fetched, at }) => {
                format!("last sync {} ({} quotes)", at.format("%H:%M:%S"), fetched)
            }
            Some(SyncOutcome::Failure { message, at }) => {
                format!("last sync failed {}: {}", at.format("%H:%M:%S"), message)
            }
        };
        match self.phase {
            SyncPhase::Fetching => format!("syncing... ({})", last),
            SyncPhase::Idle => last,
        }
    }
}

/// Counters for the sync worker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub cycles: u64,
    pub failures: u64,
    pub pushes: u64,
    pub push_failures: u64,
    pub last_success: Option<DateTime<Utc>>,
}

/// Thread-safe wrapper for sync stats
#[derive(Debug, Clone, Default)]
pub struct SharedSyncStats {
    inner: Arc<RwLock<SyncStats>>,
}

impl SharedSyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&self, outcome: &SyncOutcome) {
        let mut stats = self.inner.write();
        stats.cycles += 1;
        match outcome {
            SyncOutcome::Success { at, .. } => stats.last_success = Some(*at),
            SyncOutcome::Failure { .. } => stats.failures += 1,
        }
    }

    pub fn record_push(&self, succeeded: bool) {
        let mut stats = self.inner.write();
        stats.pushes += 1;
        if !succeeded {
            stats.push_failures += 1;
        }
    }

    pub fn snapshot(&self) -> SyncStats {
        self.inner.read().clone()
    }
}
