//! Ordered fallback chain for recovering task lists from model output

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{PHASE_LAUNCH_DAY, PHASE_POST_LAUNCH, PHASE_PRE_LAUNCH, RawTaskRecord};

use super::error::ParseError;
use super::repair::{extract_balanced_array, strip_trailing_commas};

/// Recognized phase-bucket keys, snake_case and camelCase
const PRE_KEYS: [&str; 3] = ["pre_launch", "preLaunch", "pre"];
const LAUNCH_KEYS: [&str; 3] = ["launch_day", "launchDay", "launch"];
const POST_KEYS: [&str; 3] = ["post_launch", "postLaunch", "post"];

/// The two container shapes the model is allowed to answer with
#[derive(Debug)]
enum ParsedShape {
    /// Flat array of task values
    Flat(Vec<Value>),
    /// Phase-bucketed object, flattened pre -> launch -> post
    Bucketed {
        pre: Vec<Value>,
        launch: Vec<Value>,
        post: Vec<Value>,
    },
}

/// Which shapes a recovery stage accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accept {
    ArrayOrBuckets,
    BucketsOnly,
}

/// Recover a non-empty task list from raw model output
///
/// Fallback chain, stopping at the first stage that yields a task container:
/// 1. strip an optional fenced code block
/// 2. direct JSON parse (flat array, or phase-bucketed object)
/// 3. first `[...]` substring
/// 4. first `{...}` substring (object form only)
/// 5. repair pass: trailing-comma strip + balanced-bracket extraction
///
/// A container with zero tasks is a failure, never an empty plan.
pub fn recover(raw: &str) -> Result<Vec<RawTaskRecord>, ParseError> {
    let cleaned = strip_code_fence(raw);

    let shape = parse_shape(cleaned, Accept::ArrayOrBuckets)
        .or_else(|| {
            debug!("direct parse failed, extracting first array substring");
            first_match(array_re(), cleaned).and_then(|s| parse_shape(s, Accept::ArrayOrBuckets))
        })
        .or_else(|| {
            debug!("array extraction failed, extracting first object substring");
            first_match(object_re(), cleaned).and_then(|s| parse_shape(s, Accept::BucketsOnly))
        })
        .or_else(|| {
            debug!("object extraction failed, running repair pass");
            repair_parse(cleaned)
        });

    let Some(shape) = shape else {
        warn!(len = raw.len(), "no task list recoverable from model output");
        return Err(ParseError::unrecoverable(raw));
    };

    let records = flatten(shape);
    if records.is_empty() {
        return Err(ParseError::EmptyPlan);
    }

    debug!(task_count = records.len(), "recovered task list");
    Ok(records)
}

/// Strip a markdown code fence (with optional language tag) around the text
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line; a fence with no newline at all is noise,
    // not a wrapped payload.
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = rest[newline + 1..].trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array regex"))
}

fn object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("object regex"))
}

fn first_match<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.find(text).map(|m| m.as_str())
}

/// Parse text as JSON and classify the value into an accepted shape
fn parse_shape(text: &str, accept: Accept) -> Option<ParsedShape> {
    let value: Value = serde_json::from_str(text).ok()?;
    classify(value, accept)
}

fn classify(value: Value, accept: Accept) -> Option<ParsedShape> {
    match value {
        Value::Array(items) if accept == Accept::ArrayOrBuckets => Some(ParsedShape::Flat(items)),
        Value::Object(mut map) => {
            let pre = take_bucket(&mut map, &PRE_KEYS);
            let launch = take_bucket(&mut map, &LAUNCH_KEYS);
            let post = take_bucket(&mut map, &POST_KEYS);

            if pre.is_none() && launch.is_none() && post.is_none() {
                return None;
            }

            Some(ParsedShape::Bucketed {
                pre: pre.unwrap_or_default(),
                launch: launch.unwrap_or_default(),
                post: post.unwrap_or_default(),
            })
        }
        _ => None,
    }
}

/// Remove the first recognized key holding an array value
fn take_bucket(map: &mut serde_json::Map<String, Value>, keys: &[&str]) -> Option<Vec<Value>> {
    for key in keys {
        if let Some(Value::Array(items)) = map.remove(*key) {
            return Some(items);
        }
    }
    None
}

/// Final stage: strip trailing commas, then parse the first balanced array
fn repair_parse(text: &str) -> Option<ParsedShape> {
    let stripped = strip_trailing_commas(text);
    let candidate = extract_balanced_array(&stripped)?;
    let value: Value = serde_json::from_str(candidate).ok()?;
    match value {
        Value::Array(items) => Some(ParsedShape::Flat(items)),
        _ => None,
    }
}

/// Flatten an accepted shape into records, stamping bucket phases
fn flatten(shape: ParsedShape) -> Vec<RawTaskRecord> {
    match shape {
        ParsedShape::Flat(items) => items.into_iter().filter_map(value_to_record).collect(),
        ParsedShape::Bucketed { pre, launch, post } => {
            let buckets = [
                (pre, PHASE_PRE_LAUNCH),
                (launch, PHASE_LAUNCH_DAY),
                (post, PHASE_POST_LAUNCH),
            ];
            buckets
                .into_iter()
                .flat_map(|(items, phase)| {
                    items.into_iter().filter_map(value_to_record).map(move |mut record| {
                        if record.phase.is_none() {
                            record.phase = Some(phase.to_string());
                        }
                        record
                    })
                })
                .collect()
        }
    }
}

/// Convert one array element into a record
///
/// Objects deserialize loosely; bare strings are kept as title-only records.
/// Anything else is structurally unusable and skipped with a warning.
fn value_to_record(value: Value) -> Option<RawTaskRecord> {
    match value {
        Value::Object(_) => match serde_json::from_value::<RawTaskRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping malformed task record");
                None
            }
        },
        Value::String(title) => Some(RawTaskRecord::title_only(title)),
        other => {
            warn!(?other, "skipping non-object task element");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_flat_array() {
        let raw = r#"[{"title":"A","days_from_launch":-3},{"title":"B"}]"#;
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("A"));
        assert_eq!(records[0].offset, Some(-3));
        assert_eq!(records[1].offset, None);
    }

    #[test]
    fn test_fenced_json_block() {
        let raw = "```json\n[{\"title\":\"Build teaser\",\"phase\":\"Pre-launch\",\"days_from_launch\":-10}]\n```";
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Build teaser"));
        assert_eq!(records[0].offset, Some(-10));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let raw = "```\n[{\"title\":\"A\"}]\n```";
        assert_eq!(recover(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_bucketed_object_snake_case() {
        let raw = r#"{"pre_launch":[{"title":"Tease"}],"launch_day":[{"title":"Go live"}],"post_launch":[]}"#;
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phase.as_deref(), Some("Pre-launch"));
        assert_eq!(records[1].phase.as_deref(), Some("Launch Day"));
    }

    #[test]
    fn test_bucketed_object_camel_case() {
        let raw = r#"{"preLaunch":[{"title":"Tease"}],"launchDay":[{"title":"Go"}],"postLaunch":[{"title":"Recap"}]}"#;
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].phase.as_deref(), Some("Post-launch"));
    }

    #[test]
    fn test_bucket_stamp_does_not_override_explicit_phase() {
        let raw = r#"{"pre_launch":[{"title":"T","phase":"Research & Setup"}]}"#;
        let records = recover(raw).unwrap();
        assert_eq!(records[0].phase.as_deref(), Some("Research & Setup"));
    }

    #[test]
    fn test_flattening_equivalence_with_prestamped_flat_array() {
        let bucketed = r#"{"pre_launch":[{"title":"Tease"}],"launch_day":[{"title":"Go"}],"post_launch":[{"title":"Recap"}]}"#;
        let flat = r#"[
            {"title":"Tease","phase":"Pre-launch"},
            {"title":"Go","phase":"Launch Day"},
            {"title":"Recap","phase":"Post-launch"}
        ]"#;

        let a = recover(bucketed).unwrap();
        let b = recover(flat).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.title, y.title);
            assert_eq!(x.phase, y.phase);
        }
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let raw = "Here is your launch plan:\n[{\"title\":\"A\"}]\nLet me know if you need more.";
        assert_eq!(recover(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_bucketed_object_embedded_in_prose() {
        // With two buckets the greedy array extraction spans both and fails
        // to parse, so recovery falls through to the object stage.
        let raw = "Sure! {\"pre_launch\":[{\"title\":\"A\"}],\"launch_day\":[{\"title\":\"Go\"}]} Hope that helps.";
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phase.as_deref(), Some("Pre-launch"));
        assert_eq!(records[1].phase.as_deref(), Some("Launch Day"));
    }

    #[test]
    fn test_plain_object_without_buckets_fails() {
        // An object that is not phase-bucketed is not a task container.
        assert!(matches!(
            recover(r#"{"tasks":"see above"}"#),
            Err(ParseError::Unrecoverable { .. })
        ));
    }

    #[test]
    fn test_trailing_comma_repaired() {
        let raw = r#"[{"title":"A"},{"title":"B"},]"#;
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("A"));
        assert_eq!(records[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn test_prose_only_is_unrecoverable() {
        let result = recover("I'm sorry, I can't produce a plan for that.");
        assert!(matches!(result, Err(ParseError::Unrecoverable { .. })));
    }

    #[test]
    fn test_truncated_array_is_unrecoverable() {
        let raw = r#"[{"title":"A"},{"title":"B","descr"#;
        assert!(matches!(recover(raw), Err(ParseError::Unrecoverable { .. })));
    }

    #[test]
    fn test_empty_array_is_a_failure() {
        assert!(matches!(recover("[]"), Err(ParseError::EmptyPlan)));
    }

    #[test]
    fn test_all_buckets_empty_is_a_failure() {
        let raw = r#"{"pre_launch":[],"launch_day":[],"post_launch":[]}"#;
        assert!(matches!(recover(raw), Err(ParseError::EmptyPlan)));
    }

    #[test]
    fn test_direct_parse_wins_over_later_stages() {
        // The text also contains an embedded array; a successful direct
        // parse must be returned as-is, not overridden by extraction.
        let raw = r#"[{"title":"outer","description":"[{\"title\":\"inner\"}]"}]"#;
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("outer"));
    }

    #[test]
    fn test_bare_string_elements_become_title_only() {
        let raw = r#"["Post teaser","Go live"]"#;
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("Post teaser"));
        assert!(records[0].phase.is_none());
    }

    #[test]
    fn test_unusable_elements_skipped_but_rest_kept() {
        let raw = r#"[42, {"title":"A"}, null]"#;
        let records = recover(raw).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("  [1,2]  "), "[1,2]");
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]"), "[1]");
    }
}
