//! Deterministic ordering and due-date assignment

use chrono::Duration;
use tracing::debug;

use crate::domain::{DEFAULT_CATEGORY, LaunchContext, NormalizedTask, PHASE_PRE_LAUNCH, ScheduledTask};

/// Order tasks and convert offsets to absolute due dates
///
/// Tasks sort by `(offset, original_index)` so same-offset tasks keep the
/// model-authored relative order. Due date is the context's reference date
/// plus the task offset; the final position becomes the display order the
/// caller persists.
pub fn schedule(tasks: Vec<NormalizedTask>, context: &LaunchContext) -> Vec<ScheduledTask> {
    let reference = context.reference_date();
    debug!(%reference, task_count = tasks.len(), "scheduling tasks");

    let mut tasks = tasks;
    tasks.sort_by_key(|task| (task.offset, task.original_index));

    tasks
        .into_iter()
        .enumerate()
        .map(|(display_order, task)| {
            let phase = task
                .phase
                .or_else(|| {
                    context
                        .template
                        .as_ref()
                        .and_then(|template| template.phase_for(&task.title))
                        .map(str::to_string)
                })
                .unwrap_or_else(|| PHASE_PRE_LAUNCH.to_string());

            ScheduledTask {
                due_date: reference + Duration::days(task.offset as i64),
                title: task.title,
                description: task.description,
                category: task.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                phase,
                platforms: task.platforms,
                offset: task.offset,
                display_order,
            }
        })
        .collect()
}
