//! Text and JSON rendering of advisor state.

use std::collections::BTreeMap;
use std::fmt::Write;

use nemesis_advisor::advisor::Advisor;
use nemesis_advisor::recommendation::Recommendation;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Serialize)]
struct RecommendationView<'a> {
    #[serde(flatten)]
    recommendation: &'a Recommendation,
    queued: Vec<&'a str>,
}

/// Renders the current recommendation.
pub fn format_recommendation(
    advisor: &Advisor,
    show_counts: bool,
    fmt: OutputFormat,
) -> serde_json::Result<String> {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(&RecommendationView {
            recommendation: advisor.recommendation(),
            queued: advisor.queued(),
        }),
        OutputFormat::Text => Ok(format_recommendation_text(advisor, show_counts)),
    }
}

fn format_recommendation_text(advisor: &Advisor, show_counts: bool) -> String {
    let rec = advisor.recommendation();
    let mut out = String::new();

    let _ = writeln!(out, "{}", rec.guidance);
    for (slot, name) in rec.items.iter().enumerate() {
        let held = advisor.count(name).unwrap_or(0);
        if show_counts {
            let _ = writeln!(out, "  {}. {name} (x{held})", slot + 1);
        } else {
            let _ = writeln!(out, "  {}. {name}", slot + 1);
        }
    }
    if !rec.results.is_empty() {
        let _ = writeln!(out, "Produces: {}", rec.results.join(", "));
    }

    let queued = advisor.queued();
    if !queued.is_empty() {
        let _ = writeln!(out, "Queued drops: {}", queued.join(", "));
    }
    out
}

/// Renders held counts in catalog order.
pub fn format_inventory(advisor: &Advisor, fmt: OutputFormat) -> serde_json::Result<String> {
    let held = advisor.inventory().named(advisor.catalog());
    match fmt {
        OutputFormat::Json => {
            let map: BTreeMap<&str, u32> = held.into_iter().collect();
            serde_json::to_string_pretty(&map)
        },
        OutputFormat::Text => {
            if held.is_empty() {
                return Ok("Inventory is empty.\n".to_string());
            }
            let width = held.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            let mut out = String::new();
            for (name, count) in held {
                let _ = writeln!(out, "{name:<width$}  {count}");
            }
            Ok(out)
        },
    }
}
