//! Phase-based offset defaults
//!
//! The model frequently omits per-task day offsets. Missing offsets are
//! derived purely from the task's phase label and its position among
//! same-phase siblings, so the result is deterministic for a given input
//! order.

use tracing::debug;

use crate::domain::{NormalizedTask, RawTaskRecord};

/// Default offset for research/setup tasks
const RESEARCH_OFFSET: i32 = -30;

/// Pre-launch interpolation window: first sibling lands here
const PRE_LAUNCH_FIRST: i32 = -21;

/// Pre-launch interpolation window: last sibling lands here
const PRE_LAUNCH_LAST: i32 = -1;

/// Default offset when the phase label is unrecognized or absent
const UNKNOWN_OFFSET: i32 = -7;

/// Coarse phase classes the heuristics distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PhaseClass {
    Research,
    PreLaunch,
    LaunchDay,
    PostLaunch,
    Unknown,
}

/// Classify a phase label, case-insensitively, treating `_`/`-` as spaces
fn classify_phase(label: Option<&str>) -> PhaseClass {
    let Some(label) = label else {
        return PhaseClass::Unknown;
    };
    let canonical: String = label
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let canonical = canonical.split_whitespace().collect::<Vec<_>>().join(" ");

    if canonical.contains("research") {
        PhaseClass::Research
    } else if canonical.contains("pre launch") || canonical.contains("prelaunch") {
        PhaseClass::PreLaunch
    } else if canonical.contains("post launch") || canonical.contains("postlaunch") {
        PhaseClass::PostLaunch
    } else if canonical.contains("launch day") || canonical == "launch" {
        PhaseClass::LaunchDay
    } else {
        PhaseClass::Unknown
    }
}

/// Resolve every task to a concrete integer offset
///
/// Explicit offsets pass through untouched. Each task keeps its original
/// position index for the scheduler's stable tie-break.
pub fn normalize(records: Vec<RawTaskRecord>) -> Vec<NormalizedTask> {
    // Sibling counts and per-task position within each phase class,
    // in original output order.
    let classes: Vec<PhaseClass> = records.iter().map(|r| classify_phase(r.phase.as_deref())).collect();

    let mut seen = std::collections::HashMap::new();
    let positions: Vec<usize> = classes
        .iter()
        .map(|class| {
            let slot = seen.entry(*class).or_insert(0usize);
            let position = *slot;
            *slot += 1;
            position
        })
        .collect();

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let class = classes[index];
            let offset = record.offset.unwrap_or_else(|| {
                let siblings = seen[&class];
                let derived = default_offset(class, positions[index], siblings);
                debug!(?class, position = positions[index], siblings, derived, "derived task offset");
                derived
            });

            NormalizedTask {
                title: record.title.unwrap_or_default(),
                description: record.description,
                category: record.category,
                phase: record.phase,
                platforms: record.platforms.map(|p| p.into_vec()).unwrap_or_default(),
                offset,
                original_index: index,
            }
        })
        .collect()
}

fn default_offset(class: PhaseClass, position: usize, siblings: usize) -> i32 {
    match class {
        PhaseClass::Research => RESEARCH_OFFSET,
        PhaseClass::PreLaunch => interpolate_pre_launch(position, siblings),
        PhaseClass::LaunchDay => 0,
        PhaseClass::PostLaunch => position as i32 + 1,
        PhaseClass::Unknown => UNKNOWN_OFFSET,
    }
}

/// Spread pre-launch siblings linearly from -21 to -1, later siblings
/// closer to launch. A lone task stays at the start of the window.
fn interpolate_pre_launch(position: usize, siblings: usize) -> i32 {
    if siblings <= 1 {
        return PRE_LAUNCH_FIRST;
    }
    let span = (PRE_LAUNCH_LAST - PRE_LAUNCH_FIRST) as f64;
    let fraction = position as f64 / (siblings - 1) as f64;
    (PRE_LAUNCH_FIRST as f64 + span * fraction).round() as i32
}
