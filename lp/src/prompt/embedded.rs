//! Embedded prompt templates
//!
//! Compiled into the library; the composer renders the user template with
//! a serialized [`super::PromptContext`].

/// System prompt for launch-plan generation
pub const LAUNCH_PLAN_SYSTEM: &str = r#"You are a launch strategist producing a marketing launch plan as structured data.

Respond with JSON only: a flat array of task objects, no markdown fences, no commentary.
Each task object has these fields:
- "title": short imperative task title
- "description": one or two sentences of concrete instructions
- "category": one of "Content", "Outreach", "Advertising", "Community", "Logistics", or "General"
- "phase": one of "Research & Setup", "Pre-launch", "Launch Day", "Post-launch"
- "platforms": array of platform names this task applies to (may be empty)
- "due_date": the calendar date the task should be done by (YYYY-MM-DD)
- "days_from_launch": signed integer days relative to the launch date (negative = before launch)

Rules:
- Every task must be a one-off action. Do not include recurring or operational tasks
  such as "post daily" or "monitor mentions".
- Schedule by day only. Never plan at hour or minute granularity.
- Order tasks chronologically.
"#;

/// User prompt template (handlebars)
pub const LAUNCH_PLAN_TEMPLATE: &str = r#"Plan the launch "{{launch_name}}" for the brand "{{brand_name}}".
{{#if brand_description}}About the brand: {{brand_description}}
{{/if}}{{#if launch_description}}About the launch: {{launch_description}}
{{/if}}{{#if category}}Launch category: {{category}}
{{/if}}{{#if goal}}Primary goal: {{goal}}
{{/if}}
Launch date: {{launch_date}}. That is {{days_to_launch}} days from today ({{runway_label}}).

Produce between {{task_min}} and {{task_max}} tasks. {{phase_guidance}}
{{#if has_platforms}}
The campaign runs on: {{platforms_list}}. Include platform-specific tasks and set each
task's "platforms" field accordingly.
{{/if}}{{#if tone}}
Write every title and description in a {{tone}} voice.
{{/if}}{{#if region}}
The audience is in {{region}}; account for regional timing and conventions.
{{/if}}{{#if has_template}}
Anchor the plan on these template beats:
{{#each beats}}- {{this.name}} ({{this.phase}})
{{/each}}{{/if}}"#;
