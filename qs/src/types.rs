//! Storage row types
//!
//! Rows are storage-plain: the plan column is free text here, and the quota
//! core is responsible for mapping it onto its tier enum.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user AI usage counter row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRow {
    /// Owning user id
    pub user_id: String,

    /// Plan tier as stored text (e.g. "free", "starter")
    pub plan: String,

    /// AI calls recorded against the current window
    pub ai_calls_used: u32,

    /// Date of the last recorded usage; a row whose reset date falls in a
    /// prior calendar month reads as zero usage until the next write
    pub ai_calls_reset_date: NaiveDate,
}

impl CounterRow {
    /// Create a fresh counter for a user's first recorded usage window
    pub fn new(user_id: impl Into<String>, plan: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            plan: plan.into(),
            ai_calls_used: 0,
            ai_calls_reset_date: today,
        }
    }
}

/// Append-only usage log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLogEntry {
    /// Unique entry id
    pub id: String,

    /// User the usage is attributed to
    pub user_id: String,

    /// Action label (e.g. "ai_generation")
    pub action: String,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl UsageLogEntry {
    /// Create a new entry stamped with the current time
    pub fn new(user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.into(),
            action: action.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Launch row, reduced to the fields quota decisions depend on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRow {
    /// Launch id
    pub id: String,

    /// Owning user id
    pub owner_id: String,

    /// Human-readable launch title
    pub title: String,

    /// Whether this launch has ever completed an AI generation
    pub initial_ai_generated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_row_new() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let row = CounterRow::new("user-1", "free", today);

        assert_eq!(row.user_id, "user-1");
        assert_eq!(row.plan, "free");
        assert_eq!(row.ai_calls_used, 0);
        assert_eq!(row.ai_calls_reset_date, today);
    }

    #[test]
    fn test_usage_log_entry_new() {
        let entry = UsageLogEntry::new("user-1", "ai_generation");

        assert_eq!(entry.user_id, "user-1");
        assert_eq!(entry.action, "ai_generation");
        assert!(!entry.id.is_empty());
        assert!(entry.created_at > 0);
    }
}
