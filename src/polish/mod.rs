//! Language polishing pipeline.
//!
//! An ordered, fixed sequence of independent text transformers. A stage
//! that fails is logged and skipped, carrying the previous stage's text
//! forward; no stage failure is fatal. Applying the full pipeline twice
//! to already-polished text yields the same result.

pub mod clarity;
pub mod flow;
pub mod formality;
pub mod normalize;
pub mod pluralization;

use crate::error::EnhanceError;
use crate::types::Context;

pub use clarity::ClaritySimplification;
pub use flow::FlowImprovement;
pub use formality::FormalityAdjustment;
pub use normalize::FinalNormalization;
pub use pluralization::{GovernedNoun, Pluralization};

/// One transformer in the polishing pipeline.
pub trait PolishStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, text: &str, ctx: &Context) -> Result<String, EnhanceError>;
}

/// The ordered stage list.
pub struct LanguagePolishing {
    stages: Vec<Box<dyn PolishStage>>,
}

impl LanguagePolishing {
    /// The built-in five-stage pipeline: pluralization agreement,
    /// formality adjustment, flow improvement, clarity simplification,
    /// final normalization.
    pub fn builtin() -> Self {
        Self::with_stages(vec![
            Box::new(Pluralization::builtin()),
            Box::new(FormalityAdjustment),
            Box::new(FlowImprovement),
            Box::new(ClaritySimplification),
            Box::new(FinalNormalization),
        ])
    }

    pub fn with_stages(stages: Vec<Box<dyn PolishStage>>) -> Self {
        Self { stages }
    }

    /// Run every stage in order. Stage errors are logged as warnings and
    /// the failing stage is skipped.
    pub fn apply(&self, text: &str, ctx: &Context) -> String {
        let mut polished = text.to_string();
        for stage in &self.stages {
            match stage.apply(&polished, ctx) {
                Ok(next) => polished = next,
                Err(e) => {
                    log::warn!("language polishing stage '{}' skipped: {}", stage.name(), e);
                }
            }
        }
        polished
    }
}

impl Default for LanguagePolishing {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A sentence body and its terminating punctuation run (empty for a
/// trailing fragment). Rejoining bodies and terminators in order
/// reconstructs the text exactly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment {
    pub body: String,
    pub terminator: String,
}

/// Split text into sentence segments, keeping terminators and all
/// whitespace (leading whitespace stays attached to the following body).
pub(crate) fn split_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut body = String::new();
    let mut terminator = String::new();

    for ch in text.chars() {
        if matches!(ch, '.' | '!' | '?') {
            terminator.push(ch);
        } else {
            if !terminator.is_empty() {
                segments.push(Segment {
                    body: std::mem::take(&mut body),
                    terminator: std::mem::take(&mut terminator),
                });
            }
            body.push(ch);
        }
    }
    if !body.is_empty() || !terminator.is_empty() {
        segments.push(Segment { body, terminator });
    }

    segments
}

/// Rejoin segments produced by [`split_segments`].
pub(crate) fn join_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push_str(&segment.body);
        out.push_str(&segment.terminator);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStage;

    impl PolishStage for FailingStage {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn apply(&self, _text: &str, _ctx: &Context) -> Result<String, EnhanceError> {
            Err(EnhanceError::Stage {
                stage: "failing",
                message: "injected failure".to_string(),
            })
        }
    }

    struct SuffixStage;

    impl PolishStage for SuffixStage {
        fn name(&self) -> &'static str {
            "suffix"
        }

        fn apply(&self, text: &str, _ctx: &Context) -> Result<String, EnhanceError> {
            Ok(format!("{} [polished]", text))
        }
    }

    #[test]
    fn test_failed_stage_is_skipped_not_fatal() {
        let pipeline = LanguagePolishing::with_stages(vec![
            Box::new(FailingStage),
            Box::new(SuffixStage),
        ]);
        let out = pipeline.apply("Masz 2 zadania.", &Context::default());
        assert_eq!(out, "Masz 2 zadania. [polished]");
    }

    #[test]
    fn test_split_and_join_round_trip() {
        let text = "Dzień dobry! Masz 3 zadania. Co dalej?";
        let segments = split_segments(text);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].terminator, "!");
        assert_eq!(segments[1].body, " Masz 3 zadania");
        assert_eq!(join_segments(&segments), text);
    }

    #[test]
    fn test_trailing_fragment_has_empty_terminator() {
        let segments = split_segments("Masz 3 zadania. Bez kropki");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].body, " Bez kropki");
        assert_eq!(segments[1].terminator, "");
    }

    #[test]
    fn test_full_pipeline_is_idempotent() {
        let pipeline = LanguagePolishing::builtin();
        let ctx = Context::default();
        let raw = "Spokojnie, Dzień dobry! Masz 3 zadanie do zrobienia. \
                   Świetny start dnia! Jutro będzie lepiej!";
        let once = pipeline.apply(raw, &ctx);
        let twice = pipeline.apply(&once, &ctx);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pipeline_idempotent_when_clarity_splits() {
        let pipeline = LanguagePolishing::builtin();
        let ctx = Context::default();
        let long = format!(
            "Masz przed sobą bardzo szczegółowy i wyjątkowo rozbudowany plan całego \
             nadchodzącego dnia pracy, ale {}.",
            "najpierw sprawdź wszystkie pilne wiadomości, które przyszły od zespołu projektowego"
        );
        let once = pipeline.apply(&long, &ctx);
        assert!(once.contains(". Najpierw sprawdź"), "split and capitalized: {}", once);
        let twice = pipeline.apply(&once, &ctx);
        assert_eq!(once, twice);
    }
}
