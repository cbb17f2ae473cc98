//! Runway buckets and prompt rendering

use handlebars::{Handlebars, RenderError};
use serde::Serialize;
use tracing::debug;

use crate::domain::LaunchContext;

use super::embedded;

/// Runway length bucket; drives task-count scaling and phase guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayBucket {
    UltraShort,
    ShortSprint,
    MediumRunway,
    ExtendedRunway,
    FullRunway,
}

impl RunwayBucket {
    /// Bucket for a day count; negative counts (launch date already past)
    /// land in the shortest bucket
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d <= 5 => Self::UltraShort,
            6..=21 => Self::ShortSprint,
            22..=56 => Self::MediumRunway,
            57..=90 => Self::ExtendedRunway,
            _ => Self::FullRunway,
        }
    }

    /// Target task-count range for this bucket
    pub fn task_range(&self) -> (u8, u8) {
        match self {
            Self::UltraShort => (4, 6),
            Self::ShortSprint => (6, 10),
            Self::MediumRunway => (12, 18),
            Self::ExtendedRunway => (18, 25),
            Self::FullRunway => (25, 35),
        }
    }

    /// Human-readable bucket label, used in the prompt
    pub fn label(&self) -> &'static str {
        match self {
            Self::UltraShort => "an ultra-short runway",
            Self::ShortSprint => "a short sprint",
            Self::MediumRunway => "a medium runway",
            Self::ExtendedRunway => "an extended runway",
            Self::FullRunway => "a full runway",
        }
    }

    /// Phase-distribution guidance scaled to the bucket
    pub fn phase_guidance(&self) -> &'static str {
        match self {
            Self::UltraShort => {
                "Compress the timeline: one or two same-week preparation tasks, \
                 a strong launch-day push, and immediate post-launch follow-through."
            }
            Self::ShortSprint => {
                "Keep pre-launch lean: build anticipation over the final two weeks, \
                 concentrate effort on launch day, and follow up in the week after."
            }
            Self::MediumRunway => {
                "Balance the phases: early research and setup, a steady pre-launch \
                 drumbeat, a full launch-day sequence, and structured post-launch follow-up."
            }
            Self::ExtendedRunway => {
                "Use the long runway: a research-and-setup phase, several pre-launch \
                 waves building intensity, a full launch-day sequence, and a multi-week \
                 post-launch program."
            }
            Self::FullRunway => {
                "Plan in arcs: thorough research and setup, multiple distinct pre-launch \
                 pushes, a detailed launch-day schedule, and sustained post-launch \
                 iteration."
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct BeatView {
    name: String,
    phase: String,
}

/// Serializable context handed to the handlebars template
#[derive(Debug, Serialize)]
pub struct PromptContext {
    brand_name: String,
    brand_description: Option<String>,
    tone: Option<String>,
    region: Option<String>,
    launch_name: String,
    launch_description: Option<String>,
    category: Option<String>,
    goal: Option<String>,
    launch_date: String,
    days_to_launch: i64,
    runway_label: &'static str,
    task_min: u8,
    task_max: u8,
    phase_guidance: &'static str,
    has_platforms: bool,
    platforms_list: String,
    has_template: bool,
    beats: Vec<BeatView>,
}

impl PromptContext {
    fn build(context: &LaunchContext, days_to_launch: i64) -> Self {
        let bucket = RunwayBucket::from_days(days_to_launch);
        let (task_min, task_max) = bucket.task_range();
        debug!(days_to_launch, ?bucket, task_min, task_max, "composed runway bucket");

        let beats: Vec<BeatView> = context
            .template
            .iter()
            .flat_map(|template| &template.beats)
            .map(|beat| BeatView {
                name: beat.name.clone(),
                phase: beat.phase.clone(),
            })
            .collect();

        Self {
            brand_name: context.brand.name.clone(),
            brand_description: context.brand.description.clone(),
            tone: context.brand.tone.clone(),
            region: context.brand.region.clone(),
            launch_name: context.launch.name.clone(),
            launch_description: context.launch.description.clone(),
            category: context.launch.category.clone(),
            goal: context.launch.goal.clone(),
            launch_date: context.launch.launch_date.format("%Y-%m-%d").to_string(),
            days_to_launch,
            runway_label: bucket.label(),
            task_min,
            task_max,
            phase_guidance: bucket.phase_guidance(),
            has_platforms: !context.platforms.is_empty(),
            platforms_list: context.platforms.join(", "),
            has_template: !beats.is_empty(),
            beats,
        }
    }
}

/// The system prompt paired with every composed user prompt
pub fn system_prompt() -> &'static str {
    embedded::LAUNCH_PLAN_SYSTEM
}

/// Render the user prompt for one generation
pub fn compose(context: &LaunchContext, days_to_launch: i64) -> Result<String, RenderError> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    registry.render_template(embedded::LAUNCH_PLAN_TEMPLATE, &PromptContext::build(context, days_to_launch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Beat, BrandProfile, LaunchDetails, LaunchTemplate};
    use chrono::NaiveDate;

    fn context() -> LaunchContext {
        LaunchContext {
            brand: BrandProfile {
                name: "Acme".to_string(),
                description: Some("Small-batch coffee".to_string()),
                tone: None,
                region: None,
            },
            launch: LaunchDetails {
                name: "Summer blend".to_string(),
                description: None,
                category: Some("beverage".to_string()),
                goal: Some("500 preorders".to_string()),
                launch_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                start_date: None,
            },
            platforms: vec![],
            template: None,
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(RunwayBucket::from_days(-3), RunwayBucket::UltraShort);
        assert_eq!(RunwayBucket::from_days(5), RunwayBucket::UltraShort);
        assert_eq!(RunwayBucket::from_days(6), RunwayBucket::ShortSprint);
        assert_eq!(RunwayBucket::from_days(21), RunwayBucket::ShortSprint);
        assert_eq!(RunwayBucket::from_days(22), RunwayBucket::MediumRunway);
        assert_eq!(RunwayBucket::from_days(56), RunwayBucket::MediumRunway);
        assert_eq!(RunwayBucket::from_days(57), RunwayBucket::ExtendedRunway);
        assert_eq!(RunwayBucket::from_days(90), RunwayBucket::ExtendedRunway);
        assert_eq!(RunwayBucket::from_days(91), RunwayBucket::FullRunway);
    }

    #[test]
    fn test_task_ranges_scale_with_bucket() {
        assert_eq!(RunwayBucket::UltraShort.task_range(), (4, 6));
        assert_eq!(RunwayBucket::ShortSprint.task_range(), (6, 10));
        assert_eq!(RunwayBucket::MediumRunway.task_range(), (12, 18));
        assert_eq!(RunwayBucket::ExtendedRunway.task_range(), (18, 25));
        assert_eq!(RunwayBucket::FullRunway.task_range(), (25, 35));
    }

    #[test]
    fn test_compose_includes_task_range_and_date() {
        let prompt = compose(&context(), 30).unwrap();

        assert!(prompt.contains("between 12 and 18 tasks"));
        assert!(prompt.contains("2024-06-01"));
        assert!(prompt.contains("Summer blend"));
        assert!(prompt.contains("500 preorders"));
    }

    #[test]
    fn test_compose_platform_guidance_is_conditional() {
        let without = compose(&context(), 30).unwrap();
        assert!(!without.contains("The campaign runs on"));

        let mut ctx = context();
        ctx.platforms = vec!["instagram".to_string(), "email".to_string()];
        let with = compose(&ctx, 30).unwrap();
        assert!(with.contains("The campaign runs on: instagram, email"));
    }

    #[test]
    fn test_compose_tone_and_region_are_conditional() {
        let plain = compose(&context(), 30).unwrap();
        assert!(!plain.contains("voice"));
        assert!(!plain.contains("audience is in"));

        let mut ctx = context();
        ctx.brand.tone = Some("playful".to_string());
        ctx.brand.region = Some("DACH".to_string());
        let styled = compose(&ctx, 30).unwrap();
        assert!(styled.contains("playful voice"));
        assert!(styled.contains("audience is in DACH"));
    }

    #[test]
    fn test_compose_template_beats_listed() {
        let mut ctx = context();
        ctx.template = Some(LaunchTemplate {
            name: "standard".to_string(),
            beats: vec![Beat {
                name: "Teaser video".to_string(),
                phase: "Pre-launch".to_string(),
            }],
        });

        let prompt = compose(&ctx, 30).unwrap();
        assert!(prompt.contains("Teaser video (Pre-launch)"));
    }

    #[test]
    fn test_compose_negative_days_uses_shortest_bucket() {
        let prompt = compose(&context(), -4).unwrap();
        assert!(prompt.contains("between 4 and 6 tasks"));
        assert!(prompt.contains("-4 days from today"));
    }

    #[test]
    fn test_system_prompt_states_contract_and_prohibitions() {
        let system = system_prompt();
        assert!(system.contains("JSON only"));
        assert!(system.contains("days_from_launch"));
        assert!(system.contains("recurring or operational"));
        assert!(system.contains("hour or minute"));
    }
}
