//! SQLite-backed quota store

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::DATE_FORMAT;
use crate::backend::UsageBackend;
use crate::error::StoreError;
use crate::types::{CounterRow, LaunchRow, UsageLogEntry};

/// SQLite-backed implementation of [`UsageBackend`]
///
/// A single connection guarded by a mutex; quota traffic is a handful of
/// point reads and writes per request, not a throughput concern.
pub struct SqliteUsageStore {
    conn: Mutex<Connection>,
}

impl SqliteUsageStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened quota store");
        Self::init(conn)
    }

    /// Create an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS usage_counters (
                user_id             TEXT PRIMARY KEY,
                plan                TEXT NOT NULL,
                ai_calls_used       INTEGER NOT NULL,
                ai_calls_reset_date TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS usage_log (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                action     TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_usage_log_user ON usage_log (user_id, created_at);
            CREATE TABLE IF NOT EXISTS launches (
                id                   TEXT PRIMARY KEY,
                owner_id             TEXT NOT NULL,
                title                TEXT NOT NULL,
                initial_ai_generated INTEGER NOT NULL DEFAULT 0
            );",
        )?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Insert a launch row (upsert by id)
    pub fn save_launch(&self, row: &LaunchRow) -> Result<(), StoreError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO launches (id, owner_id, title, initial_ai_generated)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 owner_id = excluded.owner_id,
                 title = excluded.title,
                 initial_ai_generated = excluded.initial_ai_generated",
            params![row.id, row.owner_id, row.title, row.initial_ai_generated as i64],
        )?;
        Ok(())
    }

    /// Count usage log entries for a user
    pub fn usage_log_count(&self, user_id: &str) -> Result<u64, StoreError> {
        let conn = self.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM usage_log WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned mutex means another thread panicked mid-write; the
        // connection itself is still usable for independent statements.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_reset_date(text: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("bad reset date {text:?}: {e}")))
}

impl UsageBackend for SqliteUsageStore {
    fn fetch_counter(&self, user_id: &str) -> Result<Option<CounterRow>, StoreError> {
        let conn = self.lock();
        let row = conn
            .query_row(
                "SELECT user_id, plan, ai_calls_used, ai_calls_reset_date
                 FROM usage_counters WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((user_id, plan, ai_calls_used, reset)) => Ok(Some(CounterRow {
                user_id,
                plan,
                ai_calls_used,
                ai_calls_reset_date: parse_reset_date(&reset)?,
            })),
            None => Ok(None),
        }
    }

    fn save_counter(&self, row: &CounterRow) -> Result<(), StoreError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO usage_counters (user_id, plan, ai_calls_used, ai_calls_reset_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 plan = excluded.plan,
                 ai_calls_used = excluded.ai_calls_used,
                 ai_calls_reset_date = excluded.ai_calls_reset_date",
            params![
                row.user_id,
                row.plan,
                row.ai_calls_used,
                row.ai_calls_reset_date.format(DATE_FORMAT).to_string()
            ],
        )?;
        debug!(user_id = %row.user_id, used = row.ai_calls_used, "saved usage counter");
        Ok(())
    }

    fn append_usage(&self, entry: &UsageLogEntry) -> Result<(), StoreError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO usage_log (id, user_id, action, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![entry.id, entry.user_id, entry.action, entry.created_at],
        )?;
        Ok(())
    }

    fn fetch_launch(&self, launch_id: &str) -> Result<Option<LaunchRow>, StoreError> {
        let conn = self.lock();
        let row = conn
            .query_row(
                "SELECT id, owner_id, title, initial_ai_generated FROM launches WHERE id = ?1",
                params![launch_id],
                |row| {
                    Ok(LaunchRow {
                        id: row.get(0)?,
                        owner_id: row.get(1)?,
                        title: row.get(2)?,
                        initial_ai_generated: row.get::<_, i64>(3)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn mark_launch_generated(&self, launch_id: &str) -> Result<(), StoreError> {
        let conn = self.lock();
        let updated = conn.execute(
            "UPDATE launches SET initial_ai_generated = 1 WHERE id = ?1",
            params![launch_id],
        )?;
        if updated == 0 {
            return Err(StoreError::Corrupt(format!("no launch row for {launch_id}")));
        }
        info!(%launch_id, "launch marked as generated");
        Ok(())
    }
}
