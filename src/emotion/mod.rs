//! Emotion scoring and emotionally-aware text adjustment.
//!
//! Each detector combines numeric context indicators with keyword hits in
//! the recent interaction log. The highest-scoring emotion drives a text
//! adjustment (calming opener, enthusiasm, empathy, celebration, or a
//! positive-reinforcement closer) and a static recommendation profile.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::chooser::PhraseChooser;
use crate::error::EnhanceError;
use crate::types::{signal, Context, Emotion, EmotionalContext, EmotionalRecommendation};

/// Score at which confidence saturates at 1.0.
const CONFIDENCE_SCALE: f64 = 5.0;

/// Calming openers prepended for a stressed user.
pub const CALMING_PHRASES: [&str; 4] = [
    "Spokojnie,",
    "Weź głęboki oddech.",
    "Krok po kroku.",
    "Wszystko się ułoży.",
];

/// Empathetic openers prepended for a frustrated user.
pub const EMPATHY_STARTERS: [&str; 3] = [
    "Rozumiem, że to może być frustrujące.",
    "Wiem, jak się czujesz.",
    "To naturalne, że się zirytowałeś.",
];

/// Celebratory exclamations prepended on achievement.
pub const CELEBRATIONS: [&str; 4] = [
    "Brawo!",
    "Wspaniale!",
    "Gratulacje!",
    "Fantastyczny wynik!",
];

/// Positive-reinforcement closers appended for a neutral state.
pub const REINFORCEMENTS: [&str; 3] = [
    "Świetnie sobie radzisz.",
    "Jesteś na dobrej drodze.",
    "Trzymaj tempo!",
];

static ENTHUSIASM_GOOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bdobrze\b").unwrap());
static ENTHUSIASM_OK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bok\b").unwrap());

/// Convert periods to exclamation marks and swap a small word set for
/// more enthusiastic synonyms. Shared with the enthusiastic style tone.
pub(crate) fn add_enthusiasm(text: &str) -> String {
    let excited = text.replace('.', "!");
    let excited = ENTHUSIASM_GOOD.replace_all(&excited, "świetnie");
    ENTHUSIASM_OK.replace_all(&excited, "fantastycznie").into_owned()
}

/// One emotion's detection configuration.
#[derive(Debug, Clone)]
pub struct EmotionDetector {
    pub emotion: Emotion,
    /// Signal keys contributing `min(value / threshold, 2)` each.
    pub indicators: &'static [&'static str],
    pub threshold: f64,
    /// Lowercase keywords scanned in the recent interaction log, +1 each.
    pub keywords: &'static [&'static str],
}

/// Ordered detector set. Order matters: on a score tie the earlier
/// detector keeps the primary-emotion slot.
#[derive(Debug, Clone)]
pub struct EmotionDetectorSet {
    detectors: Vec<EmotionDetector>,
}

impl EmotionDetectorSet {
    pub fn new(detectors: Vec<EmotionDetector>) -> Self {
        Self { detectors }
    }

    /// The built-in stress / excitement / frustration / achievement set.
    pub fn builtin() -> Self {
        Self::new(vec![
            EmotionDetector {
                emotion: Emotion::Stress,
                indicators: &[
                    signal::URGENT_TASKS,
                    signal::OVERDUE_TASKS,
                    signal::MEETINGS_TODAY,
                    signal::TIME_LEFT,
                ],
                threshold: 3.0,
                keywords: &["pilne", "termin", "deadline", "stres", "presja"],
            },
            EmotionDetector {
                emotion: Emotion::Excitement,
                indicators: &[
                    signal::TASKS_COMPLETED,
                    signal::GOALS_ACHIEVED,
                    signal::STREAK,
                ],
                threshold: 2.0,
                keywords: &["ukończone", "osiągnięcie", "sukces", "cel"],
            },
            EmotionDetector {
                emotion: Emotion::Frustration,
                indicators: &[
                    signal::FAILED_TASKS,
                    signal::MISSED_DEADLINES,
                    signal::CONFLICTS,
                ],
                threshold: 1.0,
                keywords: &["problem", "błąd", "nie udało", "frustracja"],
            },
            EmotionDetector {
                emotion: Emotion::Achievement,
                indicators: &[
                    signal::COMPLETION_RATE,
                    signal::NEW_RECORDS,
                    signal::MILESTONES,
                ],
                threshold: 1.0,
                keywords: &["gratulacje", "brawo", "świetnie", "doskonale"],
            },
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmotionDetector> {
        self.detectors.iter()
    }
}

impl Default for EmotionDetectorSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Recommendation profile for a primary emotion.
fn recommendation_for(emotion: Emotion) -> EmotionalRecommendation {
    let (tone, pace, focus, suggestions): (&str, &str, &str, &[&str]) = match emotion {
        Emotion::Stress => (
            "calming",
            "slower",
            "prioritization",
            &["Weź głęboki oddech", "Podziel zadania na mniejsze części"],
        ),
        Emotion::Excitement => (
            "enthusiastic",
            "energetic",
            "celebration",
            &["Świętuj sukces", "Ustaw nowy cel"],
        ),
        Emotion::Frustration => (
            "empathetic",
            "patient",
            "problem_solving",
            &["To zrozumiałe", "Spróbuj innego podejścia"],
        ),
        Emotion::Achievement => (
            "celebratory",
            "upbeat",
            "recognition",
            &["Gratulacje!", "Czas na nowe wyzwanie"],
        ),
        Emotion::Neutral => (
            "balanced",
            "normal",
            "information",
            &["Co chcesz sprawdzić?", "Jak mogę pomóc?"],
        ),
    };
    EmotionalRecommendation {
        tone: tone.to_string(),
        pace: pace.to_string(),
        focus: focus.to_string(),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

/// Emotion analyzer and text adjuster.
pub struct EmotionalIntelligence {
    detectors: EmotionDetectorSet,
    chooser: Arc<dyn PhraseChooser>,
}

impl EmotionalIntelligence {
    pub fn new(detectors: EmotionDetectorSet, chooser: Arc<dyn PhraseChooser>) -> Self {
        Self { detectors, chooser }
    }

    fn score(&self, ctx: &Context, detector: &EmotionDetector) -> f64 {
        let mut score = 0.0;

        for key in detector.indicators {
            let value = ctx.signal(key);
            if value > 0.0 {
                score += (value / detector.threshold).min(2.0);
            }
        }

        let recent = ctx.recent_interactions.join(" ").to_lowercase();
        for keyword in detector.keywords {
            if recent.contains(keyword) {
                score += 1.0;
            }
        }

        score
    }

    /// Score all detectors and pick the primary emotion. A later detector
    /// must score strictly higher to displace an earlier one; all-zero
    /// scores resolve to neutral.
    pub fn analyze(&self, ctx: &Context) -> EmotionalContext {
        let mut scores = HashMap::new();
        let mut primary = Emotion::Neutral;
        let mut highest = 0.0_f64;

        for detector in self.detectors.iter() {
            let score = self.score(ctx, detector);
            scores.insert(detector.emotion, score);
            if score > highest {
                highest = score;
                primary = detector.emotion;
            }
        }

        EmotionalContext {
            primary_emotion: primary,
            emotion_scores: scores,
            confidence: (highest / CONFIDENCE_SCALE).min(1.0),
            recommendations: recommendation_for(primary),
        }
    }

    /// Analyze the context and rewrite the text for the primary emotion.
    pub fn apply(
        &self,
        text: &str,
        ctx: &Context,
    ) -> Result<(String, EmotionalContext), EnhanceError> {
        let emotional = self.analyze(ctx);

        let adjusted = match emotional.primary_emotion {
            Emotion::Stress => {
                format!("{} {}", self.chooser.choose(&CALMING_PHRASES), text)
            }
            Emotion::Excitement => add_enthusiasm(text),
            Emotion::Frustration => {
                format!("{} {}", self.chooser.choose(&EMPATHY_STARTERS), text)
            }
            Emotion::Achievement => {
                format!("{} {}", self.chooser.choose(&CELEBRATIONS), text)
            }
            Emotion::Neutral => {
                format!("{} {}", text, self.chooser.choose(&REINFORCEMENTS))
            }
        };

        Ok((adjusted, emotional))
    }
}
