//! # voice-nlp
//!
//! Context-aware response enhancement engine for the smart day planner
//! voice assistant.
//!
//! Takes an already-generated Polish-language response plus a bundle of
//! situational signals (time of day, productivity metrics, stress
//! indicators, user preferences, rolling conversation history) and
//! produces a polished, personalized response with follow-up
//! suggestions. The pipeline runs context enhancement, personalization,
//! emotional adjustment, and language polishing in sequence; any stage
//! failure degrades to "less enhancement", never to "no response".
//!
//! Cross-call state is limited to [`ContextManager`] and
//! [`UserPreferences`], both backed by an injectable
//! [`storage::StateStore`]. Randomness and wall-clock access go through
//! the [`chooser`] and [`clock`] capabilities so the whole engine is
//! deterministic under test.

pub mod catalog;
pub mod chooser;
pub mod clock;
pub mod emotion;
pub mod enhancer;
pub mod error;
pub mod manager;
pub mod personalization;
pub mod polish;
pub mod preferences;
pub mod processor;
pub mod storage;
pub mod suggestions;
pub mod types;

pub use error::EnhanceError;
pub use manager::{ContextManager, EnrichedContext};
pub use preferences::UserPreferences;
pub use processor::NlpProcessor;
pub use types::{Context, EnhancedResponse, Response};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
