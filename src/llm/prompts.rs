//! Prompt construction and response parsing for explanations

use crate::explorer::SliderChangeEvent;
use crate::llm::context::{format_value, IndicatorContext};

/// Facts requested per slider change
pub const FACT_COUNT: usize = 4;

/// System prompt shared by every explanation request
pub const EXPLAIN_SYSTEM_PROMPT: &str = "You are an expert in global development and environmental policy. \
You explain how socioeconomic and environmental indicators of a country relate to each other. \
The numbers you are given come from a fixed linear model; explain them, do not recompute them.";

/// Prompt asking for short facts about one slider change
pub fn slider_facts_prompt(change: &SliderChangeEvent) -> String {
    let ctx = IndicatorContext::new(change.country.clone(), change.resulting);
    format!(
        "A user is adjusting statistical variables for {country}.\n\n\
         The user just changed {label} from {old} to {new}.\n\n\
         {summary}\n\
         Generate exactly {count} distinct, insightful facts about this change. Each fact should be:\n\
         1. 1-2 sentences long\n\
         2. Focused on a different aspect (economic, social, environmental, policy)\n\
         3. Educational and practical\n\
         4. Helpful for understanding how these statistics are interconnected\n\n\
         Format the answer as a numbered list where each item is a separate fact.",
        country = change.country,
        label = change.field.label(),
        old = format_value(change.field, change.old_value),
        new = format_value(change.field, change.new_value),
        summary = ctx.summary(),
        count = FACT_COUNT,
    )
}

/// Prompt asking for a short overview of a country's statistics
pub fn country_insight_prompt(ctx: &IndicatorContext) -> String {
    format!(
        "A user has selected {country}.\n\n{summary}\n\
         Provide a brief, insightful overview (2-3 sentences) about:\n\
         1. What these statistics tell us about {country}'s current development status\n\
         2. Key challenges or opportunities the country faces\n\
         3. How the interconnected nature of these variables affects the country's future\n\n\
         Keep it educational.",
        country = ctx.country,
        summary = ctx.summary(),
    )
}

/// Prompt for a free-form question about the current statistics
pub fn question_prompt(question: &str, ctx: &IndicatorContext) -> String {
    format!(
        "{summary}\nAnswer the user's question about {country} in at most one short paragraph.\n\n\
         QUESTION:\n{question}",
        summary = ctx.summary(),
        country = ctx.country,
        question = question.trim(),
    )
}

/// Keep lines that start with `N.` and strip the numbering
pub fn parse_numbered_facts(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| strip_list_number(line.trim()))
        .map(|fact| fact.trim().to_string())
        .filter(|fact| !fact.is_empty())
        .collect()
}

fn strip_list_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.')
}

/// Facts shown when no model is reachable or the reply has no list
pub fn fallback_facts(change: &SliderChangeEvent) -> Vec<String> {
    vec![
        format!(
            "This change to {} could have significant implications for {}'s development trajectory.",
            change.field.label(),
            change.country
        ),
        "The interconnected nature of these statistics means this adjustment will likely affect other variables as well.".to_string(),
        "Consider the broader policy implications of this change for sustainable development.".to_string(),
    ]
}

pub fn fallback_insight(country: &str) -> String {
    format!(
        "Welcome to {}! This country's development indicators show interesting patterns. \
         Try adjusting the sliders to explore how different variables interact.",
        country
    )
}
