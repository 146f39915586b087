//! Formality adjustment driven by the user's formality preference.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EnhanceError;
use crate::polish::PolishStage;
use crate::types::{Context, FormalityLevel};

static INFORMAL_MASZ: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmasz\b").unwrap());
static INFORMAL_ZROB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bzrób\b").unwrap());
static INFORMAL_ZOBACZ: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bzobacz\b").unwrap());

static POLITE_PROSZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bproszę\b").unwrap());
static FORMAL_MOZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)może Pan/Pani").unwrap());

/// Raises or lowers the register of the text; medium is a no-op.
pub struct FormalityAdjustment;

impl PolishStage for FormalityAdjustment {
    fn name(&self) -> &'static str {
        "formality"
    }

    fn apply(&self, text: &str, ctx: &Context) -> Result<String, EnhanceError> {
        let adjusted = match ctx.formality_level() {
            FormalityLevel::High => {
                let t = INFORMAL_MASZ.replace_all(text, "posiada Pan/Pani");
                let t = INFORMAL_ZROB.replace_all(&t, "proszę wykonać");
                INFORMAL_ZOBACZ
                    .replace_all(&t, "proszę sprawdzić")
                    .into_owned()
            }
            FormalityLevel::Low => {
                let t = POLITE_PROSZE.replace_all(text, "");
                FORMAL_MOZE.replace_all(&t, "możesz").into_owned()
            }
            FormalityLevel::Medium => text.to_string(),
        };

        Ok(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pref;

    fn adjust(text: &str, level: &str) -> String {
        let ctx = Context::default().with_preference(pref::FORMALITY_LEVEL, level);
        FormalityAdjustment.apply(text, &ctx).unwrap()
    }

    #[test]
    fn test_high_formality_rewrites_imperatives() {
        let out = adjust("Masz 3 zadania. Zrób przegląd i zobacz kalendarz.", "high");
        assert_eq!(
            out,
            "posiada Pan/Pani 3 zadania. proszę wykonać przegląd i proszę sprawdzić kalendarz."
        );
    }

    #[test]
    fn test_low_formality_strips_polite_markers() {
        let out = adjust("Proszę sprawdzić, czy może Pan/Pani dodać zadanie.", "low");
        assert!(!out.to_lowercase().contains("proszę"));
        assert!(out.contains("możesz dodać zadanie"));
    }

    #[test]
    fn test_medium_is_untouched() {
        let text = "Masz 3 zadania. Zrób przegląd.";
        assert_eq!(adjust(text, "medium"), text);
        // Unset preference defaults to medium as well.
        assert_eq!(
            FormalityAdjustment
                .apply(text, &Context::default())
                .unwrap(),
            text
        );
    }
}
