//! Launch context input types
//!
//! A `LaunchContext` is assembled by the caller from its own records and
//! handed to the core for the duration of one generation call. The core
//! never mutates or persists it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Brand identity fields woven into the prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    /// Brand name
    pub name: String,

    /// Short brand description
    pub description: Option<String>,

    /// Voice/tone guidance (e.g. "playful", "premium and understated")
    pub tone: Option<String>,

    /// Primary region or market (e.g. "DACH", "US west coast")
    pub region: Option<String>,
}

/// Facts about the launch itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchDetails {
    /// Launch name
    pub name: String,

    /// What is being launched
    pub description: Option<String>,

    /// Product/launch category (e.g. "mobile app", "cosmetics")
    pub category: Option<String>,

    /// The outcome the launch is driving at
    pub goal: Option<String>,

    /// Target launch date
    pub launch_date: NaiveDate,

    /// Explicit campaign start date, when the caller has one
    pub start_date: Option<NaiveDate>,
}

/// A named template milestone mapped to a phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Milestone name (matched against task titles)
    pub name: String,

    /// Phase this beat belongs to
    pub phase: String,
}

/// An optional launch template supplying beat-to-phase mappings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchTemplate {
    /// Template name
    pub name: String,

    /// Named beats in timeline order
    pub beats: Vec<Beat>,
}

impl LaunchTemplate {
    /// Look up the phase for a beat whose name matches the given task title
    pub fn phase_for(&self, title: &str) -> Option<&str> {
        let title = title.trim();
        self.beats
            .iter()
            .find(|beat| beat.name.eq_ignore_ascii_case(title))
            .map(|beat| beat.phase.as_str())
    }
}

/// Immutable input for one plan generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchContext {
    /// Brand identity
    pub brand: BrandProfile,

    /// Launch facts
    pub launch: LaunchDetails,

    /// Platforms the plan should cover (e.g. "instagram", "email")
    pub platforms: Vec<String>,

    /// Optional template reference
    pub template: Option<LaunchTemplate>,
}

impl LaunchContext {
    /// The date task offsets are anchored to: the explicit start date when
    /// present, otherwise the target launch date
    pub fn reference_date(&self) -> NaiveDate {
        self.launch.start_date.unwrap_or(self.launch.launch_date)
    }

    /// Days between `today` and the target launch date (negative once the
    /// launch date has passed)
    pub fn days_to_launch(&self, today: NaiveDate) -> i64 {
        (self.launch.launch_date - today).num_days()
    }
}
