//! Follow-up suggestion generation.
//!
//! Three independent sources contribute candidates: a contextual table
//! keyed by response type, behavioral flags derived from history, and a
//! keyword scan of the final enhanced text. Candidates are concatenated
//! in that order, deduplicated keeping the first occurrence, and capped.

use std::collections::HashSet;

use crate::types::{Context, ResponseType};

/// Hard cap on returned suggestions.
pub const MAX_SUGGESTIONS: usize = 3;

/// Generates the follow-up suggestion list.
pub struct FollowUpSuggestions;

impl FollowUpSuggestions {
    /// Up to [`MAX_SUGGESTIONS`] unique suggestions for the enhanced
    /// text and context.
    pub fn generate(&self, text: &str, ctx: &Context) -> Vec<String> {
        let mut candidates: Vec<&str> = Vec::new();
        candidates.extend(contextual_suggestions(ctx.response_type));
        candidates.extend(behavioral_suggestions(ctx));
        candidates.extend(content_suggestions(text));

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|s| seen.insert(*s))
            .take(MAX_SUGGESTIONS)
            .map(str::to_string)
            .collect()
    }
}

/// Canned suggestions per response type, with a generic fallback.
fn contextual_suggestions(response_type: ResponseType) -> [&'static str; 3] {
    match response_type {
        ResponseType::Task => [
            "Pokaż szczegóły zadania",
            "Ustaw przypomnienie",
            "Sprawdź deadline",
        ],
        ResponseType::Client => [
            "Zobacz historię kontaktów",
            "Zaplanuj spotkanie",
            "Sprawdź oferty",
        ],
        ResponseType::Calendar => [
            "Przygotuj agendę",
            "Sprawdź lokalizację",
            "Wyślij przypomnienie",
        ],
        ResponseType::Goal => [
            "Zobacz postęp szczegółowy",
            "Ustaw nowy cel",
            "Sprawdź kamienie milowe",
        ],
        ResponseType::General => ["Sprawdź szczegóły", "Zobacz więcej", "Przejdź dalej"],
    }
}

/// Suggestions gated on derived behavior flags.
fn behavioral_suggestions(ctx: &Context) -> Vec<&'static str> {
    let mut suggestions = Vec::new();
    let Some(behavior) = &ctx.user_behavior else {
        return suggestions;
    };

    if behavior.frequently_checks_calendar {
        suggestions.push("Zobacz kalendarz");
    }
    if behavior.likes_detailed_info {
        suggestions.push("Pokaż szczegóły");
    }
    if behavior.sets_reminders {
        suggestions.push("Ustaw przypomnienie");
    }

    suggestions
}

/// Keyword-driven suggestions from the response content.
fn content_suggestions(text: &str) -> Vec<&'static str> {
    let mut suggestions = Vec::new();

    if text.contains("zadań") || text.contains("zadanie") {
        suggestions.push("Sprawdź wszystkie zadania");
    }
    if text.contains("spotkań") || text.contains("spotkanie") {
        suggestions.push("Zobacz kalendarz");
    }
    if text.contains('%') || text.contains("postęp") {
        suggestions.push("Sprawdź szczegółowy postęp");
    }
    if text.contains("deadline") || text.contains("termin") {
        suggestions.push("Zobacz wszystkie terminy");
    }

    suggestions
}
