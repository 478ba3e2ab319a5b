//! Deterministic prompt construction from an aggregated brief context

use serde_json::{Map, Value};

use stratos_core::context::StrategyContext;

use crate::format::{block_header, BLOCK_OPEN, SECTION_MARKER};

/// Role and grounding instructions sent ahead of every brief
pub const STRATEGY_SYSTEM_PROMPT: &str = r#"You are a senior marketing strategist. Using the client brief below, write a complete, actionable marketing strategy.

Ground every recommendation in the brief. Do not invent budgets, channels, or markets the client did not mention. Organize the strategy into titled blocks, each made of short, self-contained sections an editor can rework independently. Cover positioning, channel strategy, messaging, and measurement at minimum, adapted to what the brief supports."#;

/// The output-format contract, assembled from the canonical delimiters
pub fn format_instructions() -> String {
    format!(
        "Format your entire response using exactly these delimiters and nothing else:\n\
         - Start each block with {open}<title>{close} where <title> names the block.\n\
         - Inside a block, start each section with {section} followed by the section text.\n\
         - Every block must contain at least one section.\n\
         - Write no text between a block header and its first {section} marker, and do not use the delimiters anywhere else.\n\
         \n\
         Example:\n\
         {example_header}\n\
         {section}\n\
         Lead with the product's strongest differentiator in all paid copy.\n\
         {section}\n\
         Refresh the homepage hero to match that message.",
        open = BLOCK_OPEN,
        close = crate::format::BLOCK_CLOSE,
        section = SECTION_MARKER,
        example_header = block_header("Positioning"),
    )
}

/// Builds the full generation prompt for a context.
///
/// Pure: identical contexts produce byte-identical prompts. Sections follow
/// a fixed order and flattened extras are emitted in sorted key order, so
/// nothing about the output depends on construction history.
pub fn build_prompt(context: &StrategyContext) -> String {
    let mut out = String::new();
    out.push_str(STRATEGY_SYSTEM_PROMPT);
    out.push_str("\n\n# Client Brief\n");

    out.push_str("\n## Business\n");
    push_line(&mut out, "Company", &context.business.company_name);
    push_line(&mut out, "Industry", &context.business.industry);
    push_line(&mut out, "Description", &context.business.description);
    push_line(&mut out, "Products and services", &context.business.products_services);
    push_opt(&mut out, "Unique value", &context.business.unique_value);
    push_opt(&mut out, "Website", &context.business.website);
    push_extra(&mut out, &context.business.extra);

    out.push_str("\n## Goal\n");
    push_line(&mut out, "Primary objective", &context.goal.primary_objective);
    push_list(&mut out, "Secondary objectives", &context.goal.secondary_objectives);
    push_line(&mut out, "Timeframe", &context.goal.timeframe);
    push_list(&mut out, "Success metrics", &context.goal.success_metrics);
    push_budget(&mut out, "Monthly budget for this goal", &context.goal.monthly_budget);
    push_extra(&mut out, &context.goal.extra);

    out.push_str("\n## Audience\n");
    push_line(&mut out, "Description", &context.audience.description);
    push_opt(&mut out, "Age range", &context.audience.age_range);
    push_list(&mut out, "Locations", &context.audience.locations);
    push_list(&mut out, "Interests", &context.audience.interests);
    push_list(&mut out, "Pain points", &context.audience.pain_points);
    push_extra(&mut out, &context.audience.extra);

    out.push_str("\n## Resources\n");
    if let Some(team_size) = context.resources.team_size {
        push_line(&mut out, "Team size", &team_size.to_string());
    }
    push_budget(&mut out, "Monthly marketing budget", &context.resources.monthly_budget);
    push_list(&mut out, "Existing channels", &context.resources.existing_channels);
    push_list(&mut out, "Tools in place", &context.resources.tools);
    push_extra(&mut out, &context.resources.extra);

    out.push_str("\n## Competitors\n");
    if context.competitors.competitors.is_empty() {
        out.push_str("No direct competitors named.\n");
    }
    for competitor in &context.competitors.competitors {
        out.push_str("- ");
        out.push_str(&competitor.name);
        if let Some(strengths) = &competitor.strengths {
            out.push_str(&format!(" (strong: {})", strengths));
        }
        if let Some(weaknesses) = &competitor.weaknesses {
            out.push_str(&format!(" (weak: {})", weaknesses));
        }
        if let Some(website) = &competitor.website {
            out.push_str(&format!(" {}", website));
        }
        out.push('\n');
    }
    push_opt(&mut out, "Differentiation", &context.competitors.differentiation);
    push_extra(&mut out, &context.competitors.extra);

    out.push_str("\n## Adjustments\n");
    push_opt(&mut out, "Tone", &context.adjustments.tone);
    push_list(&mut out, "Emphasize", &context.adjustments.emphasis);
    push_list(&mut out, "Avoid", &context.adjustments.avoid);
    push_opt(&mut out, "Notes", &context.adjustments.notes);
    push_extra(&mut out, &context.adjustments.extra);

    out.push('\n');
    out.push_str(&format_instructions());
    out
}

fn push_line(out: &mut String, label: &str, value: &str) {
    out.push_str(label);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

fn push_opt(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        push_line(out, label, value);
    }
}

fn push_list(out: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        push_line(out, label, &values.join(", "));
    }
}

fn push_budget(out: &mut String, label: &str, value: &Option<f64>) {
    if let Some(amount) = value {
        push_line(out, label, &format!("{}", amount));
    }
}

// serde_json::Map iterates in sorted key order, which keeps this stable.
fn push_extra(out: &mut String, extra: &Map<String, Value>) {
    for (key, value) in extra {
        push_line(out, key, &value_text(value));
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
