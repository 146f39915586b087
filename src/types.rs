//! Core data model for the response enhancement engine.
//!
//! A caller builds a [`Context`] snapshot (usually through
//! [`crate::manager::ContextManager::update_context`]), hands it to
//! [`crate::processor::NlpProcessor::enhance`] together with a base
//! [`Response`], and receives an [`EnhancedResponse`] back. Everything in
//! this module is plain data: per-call values are discarded after the call,
//! and only the stateful stores hold anything across calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known numeric signal keys read by the built-in catalogs.
pub mod signal {
    pub const EFFICIENCY: &str = "efficiency";
    pub const TASKS_COMPLETED: &str = "tasksCompleted";
    pub const STREAK: &str = "streak";
    pub const URGENT_TASKS: &str = "urgentTasks";
    pub const OVERDUE_TASKS: &str = "overdueTasks";
    pub const MEETINGS_TODAY: &str = "meetingsToday";
    pub const FAILED_TASKS: &str = "failedTasks";
    pub const MISSED_DEADLINES: &str = "missedDeadlines";
    pub const COMPLETION_RATE: &str = "completionRate";
    pub const TIME_LEFT: &str = "timeLeft";
    pub const GOALS_ACHIEVED: &str = "goalsAchieved";
    pub const CONFLICTS: &str = "conflicts";
    pub const NEW_RECORDS: &str = "newRecords";
    pub const MILESTONES: &str = "milestones";
}

/// Preference keys understood by the preference store and the engine.
pub mod pref {
    pub const COMMUNICATION_STYLE: &str = "communicationStyle";
    pub const FORMALITY_LEVEL: &str = "formalityLevel";
    pub const PREFERRED_NAME: &str = "preferredName";
    pub const VOICE_SPEED: &str = "voiceSpeed";
    pub const DETAIL_LEVEL: &str = "detailLevel";
    pub const MOTIVATION_LEVEL: &str = "motivationLevel";
    pub const LANGUAGE_VARIANT: &str = "languageVariant";
}

/// A response produced by an upstream generator, before enhancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The response text.
    pub text: String,
    /// Free-form metadata attached by the generator; carried through
    /// enhancement unchanged.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Response {
    /// Create a response with the given text and no metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }
}

/// Category of the response being enhanced, used to pick contextual
/// follow-up suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseType {
    Task,
    Client,
    Calendar,
    Goal,
    #[default]
    General,
}

/// Time-of-day bucket used for history analysis and time-preference
/// references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
}

/// Communication style the user prefers for generated responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Formal,
    #[default]
    Casual,
    Motivational,
    Analytical,
}

impl CommunicationStyle {
    /// Parse a stored preference value; unknown values yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "formal" => Some(Self::Formal),
            "casual" => Some(Self::Casual),
            "motivational" => Some(Self::Motivational),
            "analytical" => Some(Self::Analytical),
            _ => None,
        }
    }
}

/// Three-step level used for formality and detail preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormalityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl FormalityLevel {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// One notch down, with a floor at `Low`.
    pub fn lower(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

/// Level of detail the user prefers; stepped by feedback adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl DetailLevel {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// One notch down, with a floor at `Low`.
    pub fn lower(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

/// Spoken-response pacing preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl VoiceSpeed {
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }
}

/// Aggregated history the caller already knows about the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    /// Most recent first; only the first entry is referenced in text.
    #[serde(default)]
    pub recent_achievements: Vec<String>,
    #[serde(default)]
    pub preferred_time_of_day: Option<TimeOfDay>,
}

/// How quickly the user typically reacts between interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Responsiveness {
    Fast,
    Medium,
    Thoughtful,
    #[default]
    Unknown,
}

/// Behavioral features derived from conversation history by the context
/// manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBehavior {
    pub total_interactions: usize,
    pub average_session_length_ms: i64,
    /// Top response types by frequency, most frequent first (at most 3).
    pub frequent_queries: Vec<ResponseType>,
    pub preferred_time_of_day: TimeOfDay,
    pub responsiveness: Responsiveness,
    pub frequently_checks_calendar: bool,
    pub likes_detailed_info: bool,
    pub sets_reminders: bool,
    pub motivation_seeking: bool,
}

/// Situational snapshot supplied by the caller for one enhancement call.
///
/// Numeric signals live in an open keyed map so detector tables can look
/// them up by name; absent signals read as 0 and simply fail to match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub signals: HashMap<String, f64>,
    /// Snapshot of the user's preference map (see [`pref`] for keys).
    #[serde(default)]
    pub user_preferences: HashMap<String, String>,
    #[serde(default)]
    pub user_history: UserHistory,
    /// Recent user utterances, oldest first.
    #[serde(default)]
    pub recent_interactions: Vec<String>,
    #[serde(default)]
    pub response_type: ResponseType,
    /// Filled in by the context manager during enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_behavior: Option<UserBehavior>,
}

impl Context {
    /// Read a numeric signal, defaulting to 0 when absent.
    pub fn signal(&self, key: &str) -> f64 {
        self.signals.get(key).copied().unwrap_or(0.0)
    }

    /// Builder-style signal setter.
    pub fn with_signal(mut self, key: &str, value: f64) -> Self {
        self.signals.insert(key.to_string(), value);
        self
    }

    /// Builder-style preference setter.
    pub fn with_preference(mut self, key: &str, value: &str) -> Self {
        self.user_preferences
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Resolved communication style; defaults to casual.
    pub fn communication_style(&self) -> CommunicationStyle {
        self.user_preferences
            .get(pref::COMMUNICATION_STYLE)
            .and_then(|v| CommunicationStyle::from_key(v))
            .unwrap_or_default()
    }

    /// Resolved formality level; defaults to medium.
    pub fn formality_level(&self) -> FormalityLevel {
        self.user_preferences
            .get(pref::FORMALITY_LEVEL)
            .and_then(|v| FormalityLevel::from_key(v))
            .unwrap_or_default()
    }

    /// The user's preferred name, if one is set and non-empty.
    pub fn preferred_name(&self) -> Option<&str> {
        self.user_preferences
            .get(pref::PREFERRED_NAME)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }
}

/// Which context pattern fired per family during context enhancement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextApplied {
    pub time: Option<String>,
    pub productivity: Option<String>,
    pub stress: Option<String>,
}

/// Record of the personalization transforms applied to a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationApplied {
    pub style: CommunicationStyle,
    /// The name that was inserted, when an insertion point matched.
    pub name: Option<String>,
    pub history_reference: bool,
    pub time_reference: bool,
}

/// Emotion categories scored by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Stress,
    Excitement,
    Frustration,
    Achievement,
    #[default]
    Neutral,
}

/// Static response-shaping advice attached to a primary emotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalRecommendation {
    pub tone: String,
    pub pace: String,
    pub focus: String,
    pub suggestions: Vec<String>,
}

/// Result of emotion analysis for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalContext {
    pub primary_emotion: Emotion,
    pub emotion_scores: HashMap<Emotion, f64>,
    /// Normalized to `0..=1`.
    pub confidence: f64,
    pub recommendations: EmotionalRecommendation,
}

/// The fully enhanced response handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedResponse {
    pub text: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub context_applied: Option<ContextApplied>,
    pub personalization_applied: Option<PersonalizationApplied>,
    pub emotional_context: Option<EmotionalContext>,
    #[serde(default)]
    pub follow_up_suggestions: Vec<String>,
}

impl EnhancedResponse {
    /// Wrap a base response unchanged, with no enhancement records. Used
    /// when enhancement fails and the caller must still receive a usable
    /// response.
    pub fn passthrough(base: &Response) -> Self {
        Self {
            text: base.text.clone(),
            metadata: base.metadata.clone(),
            context_applied: None,
            personalization_applied: None,
            emotional_context: None,
            follow_up_suggestions: Vec::new(),
        }
    }
}

/// One entry in the rolling conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistoryEntry {
    pub id: uuid::Uuid,
    pub timestamp_ms: i64,
    pub context: Context,
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

/// Tagged classification of a piece of user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTag {
    TooFormal,
    TooDetailed,
    TooFast,
}

/// User feedback about a spoken response, used to adapt preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub tag: Option<FeedbackTag>,
    /// 1..=5 star rating; ratings below 3 trigger tag-based adaptation.
    pub rating: u8,
    #[serde(default)]
    pub comments: Option<String>,
}
