//! Task types across the generation pipeline
//!
//! `RawTaskRecord` is whatever the model gave us; `NormalizedTask` has a
//! concrete day offset; `ScheduledTask` adds the absolute due date and the
//! final display order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Platforms field as the model emits it: a single string or an array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Platforms {
    One(String),
    Many(Vec<String>),
}

impl Platforms {
    /// Collapse into a plain list
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Platforms::One(platform) => vec![platform],
            Platforms::Many(platforms) => platforms,
        }
    }
}

/// Untrusted, loosely-shaped task record recovered from model output
///
/// Every field is optional; the model renames the offset field freely, so
/// all observed spellings are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTaskRecord {
    pub title: Option<String>,

    pub description: Option<String>,

    pub category: Option<String>,

    pub phase: Option<String>,

    #[serde(alias = "platform")]
    pub platforms: Option<Platforms>,

    #[serde(alias = "days_from_launch", alias = "days_offset", alias = "day_offset")]
    pub offset: Option<i32>,
}

impl RawTaskRecord {
    /// A record carrying only a title, used when the model emits a bare
    /// string where a task object was expected
    pub fn title_only(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Task with a resolved integer day offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTask {
    pub title: String,

    pub description: Option<String>,

    pub category: Option<String>,

    pub phase: Option<String>,

    pub platforms: Vec<String>,

    /// Signed days relative to the launch reference date
    pub offset: i32,

    /// Position in the model's original output, used as the sort tie-break
    pub original_index: usize,
}

/// Task with an absolute due date and final display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub title: String,

    pub description: Option<String>,

    pub category: String,

    pub phase: String,

    pub platforms: Vec<String>,

    pub offset: i32,

    /// `reference_date + offset` days
    pub due_date: NaiveDate,

    /// Final position, 0..N-1; persisted as display order by the caller
    pub display_order: usize,
}
