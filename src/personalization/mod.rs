//! Personalization: style rules, name insertion, and history references.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::catalog::{PatternCatalog, PersonalizationRule, Tone};
use crate::emotion::add_enthusiasm;
use crate::error::EnhanceError;
use crate::types::{Context, FormalityLevel, PersonalizationApplied, TimeOfDay};

static FORMAL_TY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bty\b").unwrap());
static FORMAL_MASZ: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmasz\b").unwrap());
static FORMAL_JESTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bjesteś\b").unwrap());

/// Casual-to-professional vocabulary swaps, applied word-bounded and
/// case-insensitively.
const PROFESSIONAL_SWAPS: [(&str, &str); 4] = [
    ("super", "doskonale"),
    ("git", "bardzo dobrze"),
    ("spoko", "w porządku"),
    ("mega", "bardzo"),
];

static PROFESSIONAL_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    PROFESSIONAL_SWAPS
        .iter()
        .map(|(casual, professional)| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", casual)).unwrap();
            (re, *professional)
        })
        .collect()
});

/// Name insertion points, tried in order; the first category that
/// matches receives the name, once.
static NAME_INSERTION_POINTS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)^(Dzień dobry|Witaj|Dobry wieczór)").unwrap(),
        Regex::new(r"(?i)(Gratulacje|Świetnie|Doskonale)").unwrap(),
        Regex::new(r"(?i)(Masz|Posiadasz)").unwrap(),
    ]
});

/// Applies communication-style transforms and user-history references.
pub struct PersonalizationEngine {
    catalog: Arc<PatternCatalog>,
}

impl PersonalizationEngine {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    pub fn apply(
        &self,
        text: &str,
        ctx: &Context,
        hour: u32,
    ) -> Result<(String, PersonalizationApplied), EnhanceError> {
        let style = ctx.communication_style();
        let mut personalized = text.to_string();

        if let Some(rule) = self.catalog.style_rule(style) {
            personalized = apply_style_rule(&personalized, rule);
        }

        let mut inserted_name = None;
        if let Some(name) = ctx.preferred_name() {
            if let Some(with_name) = insert_name(&personalized, name) {
                personalized = with_name;
                inserted_name = Some(name.to_string());
            }
        }

        let history_reference = if let Some(achievement) =
            ctx.user_history.recent_achievements.first()
        {
            personalized.push_str(&format!(
                " Pamiętam, że niedawno ukończyłeś \"{}\".",
                achievement
            ));
            true
        } else {
            false
        };

        let time_reference = ctx.user_history.preferred_time_of_day == Some(TimeOfDay::Morning)
            && hour < 12;
        if time_reference {
            personalized.push_str(" Jak zwykle, zaczynasz dzień wcześnie!");
        }

        let applied = PersonalizationApplied {
            style,
            name: inserted_name,
            history_reference,
            time_reference,
        };

        Ok((personalized, applied))
    }
}

/// Formal-address rewrite plus the rule's tone adjustment.
fn apply_style_rule(text: &str, rule: &PersonalizationRule) -> String {
    let mut styled = text.to_string();

    if rule.formality == Some(FormalityLevel::High) {
        styled = FORMAL_TY.replace_all(&styled, "Pan/Pani").into_owned();
        styled = FORMAL_MASZ.replace_all(&styled, "ma Pan/Pani").into_owned();
        styled = FORMAL_JESTES
            .replace_all(&styled, "jest Pan/Pani")
            .into_owned();
    }

    match rule.tone {
        Some(Tone::Enthusiastic) => add_enthusiasm(&styled),
        Some(Tone::Professional) => make_professional(&styled),
        Some(Tone::Friendly) | None => styled,
    }
}

fn make_professional(text: &str) -> String {
    let mut out = text.to_string();
    for (re, professional) in PROFESSIONAL_PATTERNS.iter() {
        out = re.replace_all(&out, *professional).into_owned();
    }
    out
}

/// Insert the name after the first matching insertion point, if any.
fn insert_name(text: &str, name: &str) -> Option<String> {
    for re in NAME_INSERTION_POINTS.iter() {
        if re.is_match(text) {
            let replaced = re.replace(text, |caps: &Captures| {
                format!("{}, {}", &caps[0], name)
            });
            return Some(replaced.into_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{pref, UserHistory};

    fn engine() -> PersonalizationEngine {
        PersonalizationEngine::new(Arc::new(PatternCatalog::builtin()))
    }

    #[test]
    fn test_formal_style_rewrites_second_person() {
        let ctx = Context::default().with_preference(pref::COMMUNICATION_STYLE, "formal");
        let (text, applied) = engine()
            .apply("Masz 3 zadania, a Ty jesteś blisko celu.", &ctx, 14)
            .unwrap();
        assert!(text.contains("ma Pan/Pani 3 zadania"));
        assert!(text.contains("jest Pan/Pani blisko celu"));
        assert!(!text.contains(" Ty "));
        assert_eq!(applied.style, crate::types::CommunicationStyle::Formal);
    }

    #[test]
    fn test_professional_tone_swaps_casual_vocabulary() {
        let ctx = Context::default().with_preference(pref::COMMUNICATION_STYLE, "formal");
        let (text, _) = engine()
            .apply("Wynik jest super, reszta jest spoko.", &ctx, 14)
            .unwrap();
        assert!(text.contains("doskonale"));
        assert!(text.contains("w porządku"));
        assert!(!text.contains("super"));
    }

    #[test]
    fn test_motivational_style_adds_enthusiasm() {
        let ctx = Context::default().with_preference(pref::COMMUNICATION_STYLE, "motivational");
        let (text, _) = engine().apply("Idzie Ci dobrze.", &ctx, 14).unwrap();
        assert_eq!(text, "Idzie Ci świetnie!");
    }

    #[test]
    fn test_name_inserted_after_greeting_only_once() {
        let ctx = Context::default().with_preference(pref::PREFERRED_NAME, "Piotr");
        let (text, applied) = engine()
            .apply("Dzień dobry! Masz 2 spotkania.", &ctx, 9)
            .unwrap();
        // The greeting opener wins; the possession statement is left alone.
        assert!(text.starts_with("Dzień dobry, Piotr!"));
        assert!(text.contains("Masz 2 spotkania."));
        assert_eq!(applied.name.as_deref(), Some("Piotr"));
    }

    #[test]
    fn test_name_falls_through_to_possession_statement() {
        let ctx = Context::default().with_preference(pref::PREFERRED_NAME, "Anna");
        let (text, _) = engine().apply("Masz 2 spotkania.", &ctx, 9).unwrap();
        assert!(text.starts_with("Masz, Anna 2 spotkania."));
    }

    #[test]
    fn test_name_skipped_when_no_insertion_point() {
        let ctx = Context::default().with_preference(pref::PREFERRED_NAME, "Anna");
        let (text, applied) = engine().apply("Kalendarz jest pusty.", &ctx, 9).unwrap();
        assert_eq!(text, "Kalendarz jest pusty.");
        assert_eq!(applied.name, None);
    }

    #[test]
    fn test_recent_achievement_referenced() {
        let ctx = Context {
            user_history: UserHistory {
                recent_achievements: vec!["Raport Q3".to_string(), "Stary cel".to_string()],
                preferred_time_of_day: None,
            },
            ..Context::default()
        };
        let (text, applied) = engine().apply("Masz 1 zadanie.", &ctx, 15).unwrap();
        assert!(text.contains("Pamiętam, że niedawno ukończyłeś \"Raport Q3\"."));
        assert!(!text.contains("Stary cel"));
        assert!(applied.history_reference);
    }

    #[test]
    fn test_morning_preference_referenced_before_noon_only() {
        let ctx = Context {
            user_history: UserHistory {
                recent_achievements: Vec::new(),
                preferred_time_of_day: Some(TimeOfDay::Morning),
            },
            ..Context::default()
        };
        let (text, applied) = engine().apply("Masz 1 zadanie.", &ctx, 7).unwrap();
        assert!(text.ends_with("Jak zwykle, zaczynasz dzień wcześnie!"));
        assert!(applied.time_reference);

        let (text, applied) = engine().apply("Masz 1 zadanie.", &ctx, 13).unwrap();
        assert!(!text.contains("zaczynasz dzień wcześnie"));
        assert!(!applied.time_reference);
    }
}
