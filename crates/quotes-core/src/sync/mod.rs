pub mod reconcile;
pub mod status;
pub mod worker;

pub use reconcile::{reconcile, ReconcileReport, Reconciled};
pub use status::{SharedSyncStats, SyncOutcome, SyncPhase, SyncStats, SyncStatus};
pub use worker::{SyncClient, SyncCommand, SyncSettings, SyncUpdate, SyncWorker};
