//! Final normalization: whitespace, punctuation spacing, capitalization.
//!
//! Running this stage twice yields the same output as running it once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EnhanceError;
use crate::polish::PolishStage;
use crate::types::Context;

static MULTI_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.!?])").unwrap());
static MISSING_SPACE_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])\s*(\p{Lu})").unwrap());
static LOWERCASE_AFTER_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])\s+(\p{Ll})").unwrap());

/// Cleans up whitespace and sentence-boundary casing.
pub struct FinalNormalization;

impl PolishStage for FinalNormalization {
    fn name(&self) -> &'static str {
        "normalization"
    }

    fn apply(&self, text: &str, _ctx: &Context) -> Result<String, EnhanceError> {
        let collapsed = MULTI_WHITESPACE.replace_all(text, " ");
        let tightened = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
        let spaced = MISSING_SPACE_AFTER.replace_all(&tightened, "$1 $2");
        let capitalized =
            LOWERCASE_AFTER_PUNCT.replace_all(&spaced, |caps: &regex::Captures| {
                format!("{} {}", &caps[1], caps[2].to_uppercase())
            });

        Ok(capitalized.trim().to_string())
    }
}
