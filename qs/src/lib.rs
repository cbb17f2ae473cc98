//! QuotaStore - persistent quota state for AI generation features
//!
//! Stores the per-user usage counter `{plan, ai_calls_used, ai_calls_reset_date}`,
//! an append-only usage log, and the per-launch flags the free-tier rules
//! depend on. The SQLite backend is the production store; the in-memory
//! backend exists for tests and ephemeral use.
//!
//! # Schema
//!
//! ```text
//! usage_counters (user_id PK, plan, ai_calls_used, ai_calls_reset_date)
//! usage_log      (id PK, user_id, action, created_at)
//! launches       (id PK, owner_id, title, initial_ai_generated)
//! ```

mod backend;
mod error;
mod memory;
mod sqlite;
mod types;

pub use backend::UsageBackend;
pub use error::StoreError;
pub use memory::MemoryUsageStore;
pub use sqlite::SqliteUsageStore;
pub use types::{CounterRow, LaunchRow, UsageLogEntry};

/// Date format used for `ai_calls_reset_date` columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";
