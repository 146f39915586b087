//! Static catalogs: context patterns and personalization style rules.
//!
//! Catalogs are built once and injected into the components that use
//! them; they are never mutated at runtime. The built-in catalog carries
//! the Polish-language pattern set of the planner assistant, organized
//! into three pattern families (time of day, productivity, stress) and
//! four communication-style profiles.

use std::collections::HashMap;

use regex::Regex;

use crate::types::{signal, CommunicationStyle, Context, FormalityLevel};

/// Enhancement keys the context enhancer acts on. Patterns may carry
/// additional descriptive keys (`tone`, `advice`, `encouragement`) that
/// are recorded in the catalog but produce no text change.
pub mod enhancement {
    pub const GREETING: &str = "greeting";
    pub const MOTIVATION: &str = "motivation";
    pub const ENERGY: &str = "energy";
    pub const TONE: &str = "tone";
    pub const ADVICE: &str = "advice";
    pub const ENCOURAGEMENT: &str = "encouragement";
}

/// Detection condition of a context pattern.
pub enum PatternMatcher {
    /// Matches when the local hour is in `start..end`.
    HourRange { start: u32, end: u32 },
    /// Matches on a predicate over the context's numeric signals.
    Signals(fn(&Context) -> bool),
    /// Matches when the pattern occurs in the response text
    /// (case-insensitive).
    Text(Regex),
}

impl std::fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HourRange { start, end } => {
                write!(f, "HourRange({}..{})", start, end)
            }
            Self::Signals(_) => write!(f, "Signals(..)"),
            Self::Text(re) => write!(f, "Text({})", re.as_str()),
        }
    }
}

/// A named detection condition paired with text enhancements.
#[derive(Debug)]
pub struct ContextPattern {
    pub id: &'static str,
    matcher: PatternMatcher,
    pub enhancements: HashMap<&'static str, &'static str>,
}

impl ContextPattern {
    pub fn new(
        id: &'static str,
        matcher: PatternMatcher,
        enhancements: &[(&'static str, &'static str)],
    ) -> Self {
        Self {
            id,
            matcher,
            enhancements: enhancements.iter().copied().collect(),
        }
    }

    /// Test the pattern against a context snapshot, the response text,
    /// and the current local hour.
    pub fn matches(&self, ctx: &Context, text: &str, hour: u32) -> bool {
        match &self.matcher {
            PatternMatcher::HourRange { start, end } => hour >= *start && hour < *end,
            PatternMatcher::Signals(predicate) => predicate(ctx),
            PatternMatcher::Text(re) => re.is_match(text),
        }
    }

    /// Look up one enhancement value.
    pub fn enhancement(&self, key: &str) -> Option<&'static str> {
        self.enhancements.get(key).copied()
    }
}

/// Tone a style rule asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Friendly,
    Professional,
    Enthusiastic,
}

/// Style profile keyed by communication style.
#[derive(Debug, Clone)]
pub struct PersonalizationRule {
    pub style: CommunicationStyle,
    pub pronouns: &'static [&'static str],
    pub tone: Option<Tone>,
    pub vocabulary: &'static str,
    pub formality: Option<FormalityLevel>,
}

/// The full static catalog injected into the enhancement components.
#[derive(Debug)]
pub struct PatternCatalog {
    time: Vec<ContextPattern>,
    productivity: Vec<ContextPattern>,
    stress: Vec<ContextPattern>,
    styles: Vec<PersonalizationRule>,
}

impl PatternCatalog {
    /// Build a catalog from explicit pattern families and style rules.
    /// Within a family, patterns are tested in order and the first match
    /// wins.
    pub fn new(
        time: Vec<ContextPattern>,
        productivity: Vec<ContextPattern>,
        stress: Vec<ContextPattern>,
        styles: Vec<PersonalizationRule>,
    ) -> Self {
        Self {
            time,
            productivity,
            stress,
            styles,
        }
    }

    /// The built-in Polish-language catalog.
    pub fn builtin() -> Self {
        let time = vec![
            ContextPattern::new(
                "time_morning",
                PatternMatcher::HourRange { start: 5, end: 12 },
                &[
                    (enhancement::GREETING, "Dzień dobry"),
                    (enhancement::ENERGY, "energii na cały dzień"),
                    (enhancement::MOTIVATION, "Świetny start dnia!"),
                ],
            ),
            ContextPattern::new(
                "time_afternoon",
                PatternMatcher::HourRange { start: 12, end: 18 },
                &[
                    (enhancement::GREETING, "Witaj"),
                    (enhancement::ENERGY, "kontynuuj dobrą pracę"),
                    (enhancement::MOTIVATION, "Połowa dnia za Tobą!"),
                ],
            ),
            ContextPattern::new(
                "time_evening",
                PatternMatcher::HourRange { start: 18, end: 22 },
                &[
                    (enhancement::GREETING, "Dobry wieczór"),
                    (enhancement::ENERGY, "dobij dzień sukcesem"),
                    (enhancement::MOTIVATION, "Końcówka dnia!"),
                ],
            ),
        ];

        // High productivity is tested before low; at most one fires.
        let productivity = vec![
            ContextPattern::new(
                "high_productivity",
                PatternMatcher::Signals(|ctx| {
                    ctx.signal(signal::EFFICIENCY) > 80.0
                        || ctx.signal(signal::TASKS_COMPLETED) > 5.0
                        || ctx.signal(signal::STREAK) > 3.0
                }),
                &[
                    (enhancement::TONE, "celebratory"),
                    (enhancement::ENCOURAGEMENT, "Fantastyczna robota!"),
                    (enhancement::MOTIVATION, "Trzymaj tempo!"),
                ],
            ),
            ContextPattern::new(
                "low_productivity",
                PatternMatcher::Signals(|ctx| {
                    ctx.signal(signal::EFFICIENCY) < 30.0
                        || ctx.signal(signal::TASKS_COMPLETED) == 0.0
                }),
                &[
                    (enhancement::TONE, "supportive"),
                    (
                        enhancement::ENCOURAGEMENT,
                        "Nie martw się, każdy ma gorsze dni.",
                    ),
                    (enhancement::MOTIVATION, "Jutro będzie lepiej!"),
                ],
            ),
        ];

        let stress = vec![ContextPattern::new(
            "high_stress",
            PatternMatcher::Signals(|ctx| {
                ctx.signal(signal::URGENT_TASKS) > 3.0
                    || ctx.signal(signal::OVERDUE_TASKS) > 0.0
                    || ctx.signal(signal::MEETINGS_TODAY) > 5.0
            }),
            &[
                (enhancement::TONE, "calming"),
                (
                    enhancement::ADVICE,
                    "Weź głęboki oddech i podziel zadania na mniejsze części.",
                ),
                (enhancement::MOTIVATION, "Poradzisz sobie!"),
            ],
        )];

        let styles = vec![
            PersonalizationRule {
                style: CommunicationStyle::Formal,
                pronouns: &["Pan", "Pani"],
                tone: Some(Tone::Professional),
                vocabulary: "business",
                formality: Some(FormalityLevel::High),
            },
            PersonalizationRule {
                style: CommunicationStyle::Casual,
                pronouns: &["Ty"],
                tone: Some(Tone::Friendly),
                vocabulary: "everyday",
                formality: Some(FormalityLevel::Low),
            },
            PersonalizationRule {
                style: CommunicationStyle::Motivational,
                pronouns: &["Ty"],
                tone: Some(Tone::Enthusiastic),
                vocabulary: "everyday",
                formality: None,
            },
            PersonalizationRule {
                style: CommunicationStyle::Analytical,
                pronouns: &["Ty"],
                tone: None,
                vocabulary: "technical",
                formality: None,
            },
        ];

        Self::new(time, productivity, stress, styles)
    }

    /// First matching time-of-day pattern, if any.
    pub fn time_pattern(&self, ctx: &Context, text: &str, hour: u32) -> Option<&ContextPattern> {
        self.time.iter().find(|p| p.matches(ctx, text, hour))
    }

    /// First matching productivity pattern, if any.
    pub fn productivity_pattern(
        &self,
        ctx: &Context,
        text: &str,
        hour: u32,
    ) -> Option<&ContextPattern> {
        self.productivity.iter().find(|p| p.matches(ctx, text, hour))
    }

    /// First matching stress pattern, if any.
    pub fn stress_pattern(&self, ctx: &Context, text: &str, hour: u32) -> Option<&ContextPattern> {
        self.stress.iter().find(|p| p.matches(ctx, text, hour))
    }

    /// Style rule for a communication style, if the catalog defines one.
    pub fn style_rule(&self, style: CommunicationStyle) -> Option<&PersonalizationRule> {
        self.styles.iter().find(|r| r.style == style)
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_buckets() {
        let catalog = PatternCatalog::builtin();
        let ctx = Context::default().with_signal(signal::TASKS_COMPLETED, 1.0);

        let id = |hour| catalog.time_pattern(&ctx, "", hour).map(|p| p.id);
        assert_eq!(id(5), Some("time_morning"));
        assert_eq!(id(11), Some("time_morning"));
        assert_eq!(id(12), Some("time_afternoon"));
        assert_eq!(id(17), Some("time_afternoon"));
        assert_eq!(id(18), Some("time_evening"));
        assert_eq!(id(21), Some("time_evening"));
        assert_eq!(id(22), None);
        assert_eq!(id(4), None);
    }

    #[test]
    fn test_productivity_high_checked_before_low() {
        let catalog = PatternCatalog::builtin();

        // tasksCompleted == 0 would match low, but efficiency > 80 wins.
        let ctx = Context::default().with_signal(signal::EFFICIENCY, 95.0);
        assert_eq!(
            catalog.productivity_pattern(&ctx, "", 9).map(|p| p.id),
            Some("high_productivity")
        );

        let ctx = Context::default()
            .with_signal(signal::EFFICIENCY, 10.0)
            .with_signal(signal::TASKS_COMPLETED, 2.0);
        assert_eq!(
            catalog.productivity_pattern(&ctx, "", 9).map(|p| p.id),
            Some("low_productivity")
        );

        // Middle band: neither fires.
        let ctx = Context::default()
            .with_signal(signal::EFFICIENCY, 50.0)
            .with_signal(signal::TASKS_COMPLETED, 2.0);
        assert!(catalog.productivity_pattern(&ctx, "", 9).is_none());
    }

    #[test]
    fn test_empty_context_reads_as_low_productivity() {
        // Absent signals default to 0, and zero completed tasks is the
        // low-productivity condition.
        let catalog = PatternCatalog::builtin();
        let ctx = Context::default();
        assert_eq!(
            catalog.productivity_pattern(&ctx, "", 9).map(|p| p.id),
            Some("low_productivity")
        );
    }

    #[test]
    fn test_stress_boundaries() {
        let catalog = PatternCatalog::builtin();
        let fired = |ctx: &Context| catalog.stress_pattern(ctx, "", 9).is_some();

        assert!(!fired(&Context::default().with_signal(signal::URGENT_TASKS, 3.0)));
        assert!(fired(&Context::default().with_signal(signal::URGENT_TASKS, 4.0)));
        assert!(fired(&Context::default().with_signal(signal::OVERDUE_TASKS, 1.0)));
        assert!(!fired(&Context::default().with_signal(signal::MEETINGS_TODAY, 5.0)));
        assert!(fired(&Context::default().with_signal(signal::MEETINGS_TODAY, 6.0)));
    }

    #[test]
    fn test_text_matcher_is_case_insensitive() {
        let pattern = ContextPattern::new(
            "mentions_morning",
            PatternMatcher::Text(Regex::new(r"(?i)rano|ranek|wczesn").unwrap()),
            &[],
        );
        let ctx = Context::default();
        assert!(pattern.matches(&ctx, "Spotkanie jest RANO.", 15));
        assert!(!pattern.matches(&ctx, "Spotkanie jest wieczorem.", 15));
    }

    #[test]
    fn test_style_rules_cover_all_styles() {
        let catalog = PatternCatalog::builtin();
        for style in [
            CommunicationStyle::Formal,
            CommunicationStyle::Casual,
            CommunicationStyle::Motivational,
            CommunicationStyle::Analytical,
        ] {
            assert!(catalog.style_rule(style).is_some(), "{:?}", style);
        }
        let formal = catalog.style_rule(CommunicationStyle::Formal).unwrap();
        assert_eq!(formal.formality, Some(FormalityLevel::High));
        assert_eq!(formal.tone, Some(Tone::Professional));
    }
}
