//! Top-level response enhancement.
//!
//! [`NlpProcessor`] pipes a base response through context enhancement,
//! personalization, emotional adjustment, and language polishing, then
//! attaches follow-up suggestions. Any stage error is caught at this
//! boundary: the caller always receives a usable response, falling back
//! to the unmodified base response.

use std::sync::Arc;

use crate::catalog::PatternCatalog;
use crate::chooser::{PhraseChooser, RandomChooser};
use crate::clock::{Clock, SystemClock};
use crate::emotion::{EmotionDetectorSet, EmotionalIntelligence};
use crate::enhancer::{ContextEnhancer, ContextStage};
use crate::error::EnhanceError;
use crate::personalization::PersonalizationEngine;
use crate::polish::LanguagePolishing;
use crate::suggestions::FollowUpSuggestions;
use crate::types::{Context, EnhancedResponse, Response};

/// The response enhancement engine.
///
/// Stateless across calls; all cross-call state lives in the context
/// manager and preference store, which the caller owns.
pub struct NlpProcessor {
    pub(crate) context_stage: Box<dyn ContextStage>,
    personalization: PersonalizationEngine,
    emotional: EmotionalIntelligence,
    pipeline: LanguagePolishing,
    suggestions: FollowUpSuggestions,
    clock: Arc<dyn Clock>,
}

impl NlpProcessor {
    /// Processor with the built-in catalogs, random phrase selection,
    /// and the system clock.
    pub fn new() -> Self {
        Self::with_parts(
            PatternCatalog::builtin(),
            EmotionDetectorSet::builtin(),
            Arc::new(RandomChooser),
            Arc::new(SystemClock),
        )
    }

    /// Processor with explicit catalogs and capabilities.
    pub fn with_parts(
        catalog: PatternCatalog,
        detectors: EmotionDetectorSet,
        chooser: Arc<dyn PhraseChooser>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            context_stage: Box::new(ContextEnhancer::new(catalog.clone())),
            personalization: PersonalizationEngine::new(catalog),
            emotional: EmotionalIntelligence::new(detectors, chooser),
            pipeline: LanguagePolishing::builtin(),
            suggestions: FollowUpSuggestions,
            clock,
        }
    }

    /// Enhance a base response for the given context.
    ///
    /// Never fails: if any stage errors, the error is logged and the
    /// base response is returned unchanged.
    pub async fn enhance(&self, base: &Response, ctx: &Context) -> EnhancedResponse {
        match self.try_enhance(base, ctx) {
            Ok(enhanced) => enhanced,
            Err(e) => {
                log::error!("response enhancement failed, returning base response: {}", e);
                EnhancedResponse::passthrough(base)
            }
        }
    }

    fn try_enhance(
        &self,
        base: &Response,
        ctx: &Context,
    ) -> Result<EnhancedResponse, EnhanceError> {
        let hour = self.clock.hour();

        let (text, context_applied) = self.context_stage.apply(&base.text, ctx, hour)?;
        let (text, personalization_applied) = self.personalization.apply(&text, ctx, hour)?;
        let (text, emotional_context) = self.emotional.apply(&text, ctx)?;
        let text = self.pipeline.apply(&text, ctx);
        let follow_up_suggestions = self.suggestions.generate(&text, ctx);

        Ok(EnhancedResponse {
            text,
            metadata: base.metadata.clone(),
            context_applied: Some(context_applied),
            personalization_applied: Some(personalization_applied),
            emotional_context: Some(emotional_context),
            follow_up_suggestions,
        })
    }
}

impl Default for NlpProcessor {
    fn default() -> Self {
        Self::new()
    }
}
