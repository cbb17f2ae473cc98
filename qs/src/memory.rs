//! In-memory quota store for tests and ephemeral use

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::backend::UsageBackend;
use crate::error::StoreError;
use crate::types::{CounterRow, LaunchRow, UsageLogEntry};

#[derive(Default)]
struct Inner {
    counters: HashMap<String, CounterRow>,
    log: Vec<UsageLogEntry>,
    launches: HashMap<String, LaunchRow>,
}

/// HashMap-backed [`UsageBackend`]
///
/// The `fail_log` and `fail_counter_writes` switches let tests exercise the
/// degraded paths: best-effort log appends and non-throwing counter writes.
#[derive(Default)]
pub struct MemoryUsageStore {
    inner: Mutex<Inner>,
    fail_log: AtomicBool,
    fail_counter_writes: AtomicBool,
}

impl MemoryUsageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a counter row
    pub fn with_counter(self, row: CounterRow) -> Self {
        self.lock().counters.insert(row.user_id.clone(), row);
        self
    }

    /// Seed a launch row
    pub fn with_launch(self, row: LaunchRow) -> Self {
        self.lock().launches.insert(row.id.clone(), row);
        self
    }

    /// Make subsequent `append_usage` calls fail
    pub fn fail_log_appends(&self, fail: bool) {
        self.fail_log.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `save_counter` calls fail
    pub fn fail_counter_writes(&self, fail: bool) {
        self.fail_counter_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of log entries recorded for a user
    pub fn usage_log_count(&self, user_id: &str) -> usize {
        self.lock().log.iter().filter(|e| e.user_id == user_id).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl UsageBackend for MemoryUsageStore {
    fn fetch_counter(&self, user_id: &str) -> Result<Option<CounterRow>, StoreError> {
        Ok(self.lock().counters.get(user_id).cloned())
    }

    fn save_counter(&self, row: &CounterRow) -> Result<(), StoreError> {
        if self.fail_counter_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("counter writes disabled".to_string()));
        }
        debug!(user_id = %row.user_id, used = row.ai_calls_used, "saved usage counter");
        self.lock().counters.insert(row.user_id.clone(), row.clone());
        Ok(())
    }

    fn append_usage(&self, entry: &UsageLogEntry) -> Result<(), StoreError> {
        if self.fail_log.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("log appends disabled".to_string()));
        }
        self.lock().log.push(entry.clone());
        Ok(())
    }

    fn fetch_launch(&self, launch_id: &str) -> Result<Option<LaunchRow>, StoreError> {
        Ok(self.lock().launches.get(launch_id).cloned())
    }

    fn mark_launch_generated(&self, launch_id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        match inner.launches.get_mut(launch_id) {
            Some(launch) => {
                launch.initial_ai_generated = true;
                Ok(())
            }
            None => Err(StoreError::Corrupt(format!("no launch row for {launch_id}"))),
        }
    }
}
