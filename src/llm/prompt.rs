use crate::models::AggregateResult;

/// Build the summary prompt from the raw refresh data. The three structures
/// are passed through whole, not a curated subset.
pub fn build_summary_prompt(result: &AggregateResult) -> String {
    let quote = serde_json::to_string_pretty(&result.quote).unwrap_or_else(|_| "{}".to_string());
    let news = serde_json::to_string_pretty(&result.news).unwrap_or_else(|_| "[]".to_string());
    let calendar = serde_json::to_string_pretty(&result.calendar).unwrap_or_else(|_| "[]".to_string());

    format!(r#"
You are an experienced precious metals analyst.
Write a short market briefing on gold for a private investor.

RULES:
1. ONLY use the data provided below. Do NOT invent numbers.
2. Cover: current price, the main drivers in the news, and which upcoming events could move the price.
3. Keep it under 250 words.

## Current gold price
{quote}

## Latest news
{news}

## Economic calendar (high impact, next 7 days)
{calendar}
"#)
}
