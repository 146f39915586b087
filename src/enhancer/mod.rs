//! Context-aware text enhancement.
//!
//! Resolves at most one pattern per family (time of day, productivity,
//! stress) and applies each matched pattern's enhancements to the
//! response text, in family order. Absence of a match is a normal,
//! silent no-op.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::{enhancement, ContextPattern, PatternCatalog};
use crate::error::EnhanceError;
use crate::types::{Context, ContextApplied};

/// Greeting substrings that suppress prepending another greeting.
const GREETING_TOKENS: [&str; 2] = ["Dzień dobry", "Witaj"];

static ENERGY_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(energia|siła|moc)\b").unwrap());

/// First stage of the enhancement pipeline.
///
/// The production implementation is [`ContextEnhancer`]; the seam exists
/// so the top-level fallback boundary has a real consumer and alternate
/// context stages can be plugged in.
pub trait ContextStage: Send + Sync {
    fn apply(
        &self,
        text: &str,
        ctx: &Context,
        hour: u32,
    ) -> Result<(String, ContextApplied), EnhanceError>;
}

/// Applies matched context patterns to response text.
pub struct ContextEnhancer {
    catalog: Arc<PatternCatalog>,
}

impl ContextEnhancer {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Apply one pattern's enhancements: greeting prepend (unless the
    /// text already greets), motivation append, energy-word substitution.
    fn apply_pattern(&self, text: &str, pattern: &ContextPattern) -> String {
        let mut enhanced = text.to_string();

        if let Some(greeting) = pattern.enhancement(enhancement::GREETING) {
            let already_greets = GREETING_TOKENS.iter().any(|t| enhanced.contains(t));
            if !already_greets {
                enhanced = format!("{}! {}", greeting, enhanced);
            }
        }

        if let Some(motivation) = pattern.enhancement(enhancement::MOTIVATION) {
            enhanced.push(' ');
            enhanced.push_str(motivation);
        }

        if let Some(energy) = pattern.enhancement(enhancement::ENERGY) {
            enhanced = ENERGY_WORDS.replace_all(&enhanced, energy).into_owned();
        }

        enhanced
    }
}

impl ContextStage for ContextEnhancer {
    fn apply(
        &self,
        text: &str,
        ctx: &Context,
        hour: u32,
    ) -> Result<(String, ContextApplied), EnhanceError> {
        let time = self.catalog.time_pattern(ctx, text, hour);
        let productivity = self.catalog.productivity_pattern(ctx, text, hour);
        let stress = self.catalog.stress_pattern(ctx, text, hour);

        let mut enhanced = text.to_string();
        for pattern in [time, productivity, stress].into_iter().flatten() {
            enhanced = self.apply_pattern(&enhanced, pattern);
        }

        let applied = ContextApplied {
            time: time.map(|p| p.id.to_string()),
            productivity: productivity.map(|p| p.id.to_string()),
            stress: stress.map(|p| p.id.to_string()),
        };

        Ok((enhanced, applied))
    }
}
