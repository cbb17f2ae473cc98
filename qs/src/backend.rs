//! Storage backend trait

use crate::error::StoreError;
use crate::types::{CounterRow, LaunchRow, UsageLogEntry};

/// Persistent quota state operations
///
/// Implementations must be safe to share across threads; every method is a
/// single read or write round trip. Callers that need check-then-increment
/// atomicity have to provide it themselves (see the quota governor's notes).
pub trait UsageBackend: Send + Sync {
    /// Fetch a user's usage counter, if one exists
    fn fetch_counter(&self, user_id: &str) -> Result<Option<CounterRow>, StoreError>;

    /// Insert or replace a user's usage counter
    fn save_counter(&self, row: &CounterRow) -> Result<(), StoreError>;

    /// Append a usage log entry
    fn append_usage(&self, entry: &UsageLogEntry) -> Result<(), StoreError>;

    /// Fetch a launch by id, if one exists
    fn fetch_launch(&self, launch_id: &str) -> Result<Option<LaunchRow>, StoreError>;

    /// Mark a launch as having completed an AI generation
    fn mark_launch_generated(&self, launch_id: &str) -> Result<(), StoreError>;
}
