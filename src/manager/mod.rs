//! Conversation context manager.
//!
//! Owns the rolling interaction history, derives behavioral features from
//! it, and enriches caller-supplied context snapshots before enhancement.
//! State is persisted through a [`StateStore`] after every update; a
//! missing or malformed persisted blob falls back to empty state and
//! never surfaces to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::clock::Clock;
use crate::preferences::parse_entries;
use crate::storage::StateStore;
use crate::types::{
    Context, ConversationHistoryEntry, ResponseType, Responsiveness, TimeOfDay, UserBehavior,
};

/// Storage slot holding the manager's state blob.
pub const CONTEXT_MANAGER_SLOT: &str = "context-manager-state";

/// Hard cap on retained history entries; oldest entries are evicted
/// first.
pub const MAX_HISTORY_LEN: usize = 50;

/// Entries older than this are purged by [`ContextManager::cleanup`].
const HISTORY_RETENTION_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// How many trailing history entries enrichment exposes.
const RECENT_WINDOW: usize = 5;

/// Fallback when no per-session measurements exist yet.
const DEFAULT_SESSION_LENGTH_MS: i64 = 5 * 60 * 1000;

/// Mean inter-interaction latency boundaries (milliseconds).
const FAST_RESPONSE_MS: f64 = 30_000.0;
const MEDIUM_RESPONSE_MS: f64 = 120_000.0;

/// Fraction-of-history thresholds for the behavioral flags.
const CALENDAR_THRESHOLD: f64 = 0.3;
const DETAILS_THRESHOLD: f64 = 0.4;
const REMINDER_THRESHOLD: f64 = 0.2;
const MOTIVATION_THRESHOLD: f64 = 0.3;

/// A context snapshot enriched with history-derived features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContext {
    /// The caller's context with `user_behavior` filled in.
    pub context: Context,
    /// The most recent history entries, oldest first (at most 5).
    pub recent_history: Vec<ConversationHistoryEntry>,
    /// Time since session start, in milliseconds.
    pub session_length_ms: i64,
}

/// Maintains bounded conversation history and session state for a single
/// active conversation. Callers must serialize access; separate sessions
/// use separate instances.
pub struct ContextManager {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    history: Vec<ConversationHistoryEntry>,
    user_preferences: HashMap<String, String>,
    session_start_ms: i64,
    interaction_count: u64,
    user_id: Option<String>,
}

impl ContextManager {
    pub fn new(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        let session_start_ms = clock.now_ms();
        Self {
            store,
            clock,
            history: Vec::new(),
            user_preferences: HashMap::new(),
            session_start_ms,
            interaction_count: 0,
            user_id: None,
        }
    }

    /// Restore persisted state. Malformed or missing state falls back to
    /// empty state.
    pub async fn initialize(&mut self) {
        let blob = match self.store.load(CONTEXT_MANAGER_SLOT).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return,
            Err(e) => {
                log::warn!("failed to load context manager state: {}", e);
                return;
            }
        };

        if let Some(prefs) = parse_entries(&blob, "userPreferences") {
            self.user_preferences = prefs;
        }
        if let Some(history) = blob.get("history") {
            match serde_json::from_value::<Vec<ConversationHistoryEntry>>(history.clone()) {
                Ok(entries) => self.history = entries,
                Err(e) => {
                    log::warn!("discarding malformed persisted history: {}", e);
                }
            }
        }
    }

    /// Record an interaction and return the enriched context.
    pub async fn update_context(
        &mut self,
        context: Context,
        data: HashMap<String, Value>,
    ) -> EnrichedContext {
        let now = self.clock.now_ms();

        self.history.push(ConversationHistoryEntry {
            id: Uuid::new_v4(),
            timestamp_ms: now,
            context: context.clone(),
            data,
        });
        if self.history.len() > MAX_HISTORY_LEN {
            let excess = self.history.len() - MAX_HISTORY_LEN;
            self.history.drain(..excess);
        }

        self.interaction_count += 1;

        let behavior = self.analyze_user_behavior();
        let recent_history = self
            .history
            .iter()
            .rev()
            .take(RECENT_WINDOW)
            .rev()
            .cloned()
            .collect();

        let mut enriched = context;
        enriched.user_behavior = Some(behavior);

        self.save_state().await;

        EnrichedContext {
            context: enriched,
            recent_history,
            session_length_ms: now - self.session_start_ms,
        }
    }

    /// Derive the behavioral feature set from the current history.
    pub fn analyze_user_behavior(&self) -> UserBehavior {
        UserBehavior {
            total_interactions: self.history.len(),
            average_session_length_ms: DEFAULT_SESSION_LENGTH_MS,
            frequent_queries: self.frequent_queries(),
            preferred_time_of_day: self.preferred_time_of_day(),
            responsiveness: self.responsiveness(),
            frequently_checks_calendar: self.check_pattern("calendar", CALENDAR_THRESHOLD),
            likes_detailed_info: self.check_pattern("details", DETAILS_THRESHOLD),
            sets_reminders: self.check_pattern("reminder", REMINDER_THRESHOLD),
            motivation_seeking: self.check_pattern("motivation", MOTIVATION_THRESHOLD),
        }
    }

    /// Top response types by frequency, most frequent first.
    fn frequent_queries(&self) -> Vec<ResponseType> {
        let mut counts: Vec<(ResponseType, usize)> = Vec::new();
        for entry in &self.history {
            let rt = entry.context.response_type;
            match counts.iter_mut().find(|(t, _)| *t == rt) {
                Some((_, n)) => *n += 1,
                None => counts.push((rt, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(3).map(|(t, _)| t).collect()
    }

    /// The time bucket with the most historical interactions.
    fn preferred_time_of_day(&self) -> TimeOfDay {
        let mut slots = [(TimeOfDay::Morning, 0u32), (TimeOfDay::Afternoon, 0), (TimeOfDay::Evening, 0)];
        for entry in &self.history {
            let Some(hour) = Local
                .timestamp_millis_opt(entry.timestamp_ms)
                .earliest()
                .map(|t| t.hour())
            else {
                continue;
            };
            let slot = if hour < 12 {
                0
            } else if hour < 18 {
                1
            } else {
                2
            };
            slots[slot].1 += 1;
        }

        let mut best = slots[0];
        for slot in &slots[1..] {
            if slot.1 > best.1 {
                best = *slot;
            }
        }
        best.0
    }

    /// Categorize mean inter-interaction latency.
    fn responsiveness(&self) -> Responsiveness {
        if self.history.len() < 2 {
            return Responsiveness::Unknown;
        }

        let deltas: Vec<i64> = self
            .history
            .windows(2)
            .map(|w| w[1].timestamp_ms - w[0].timestamp_ms)
            .collect();
        let mean = deltas.iter().sum::<i64>() as f64 / deltas.len() as f64;

        if mean < FAST_RESPONSE_MS {
            Responsiveness::Fast
        } else if mean < MEDIUM_RESPONSE_MS {
            Responsiveness::Medium
        } else {
            Responsiveness::Thoughtful
        }
    }

    /// Fraction of history entries whose serialized form contains
    /// `pattern`, compared against `threshold`.
    fn check_pattern(&self, pattern: &str, threshold: f64) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let hits = self
            .history
            .iter()
            .filter(|entry| {
                serde_json::to_string(entry)
                    .map(|s| s.to_lowercase().contains(pattern))
                    .unwrap_or(false)
            })
            .count();
        hits as f64 / self.history.len() as f64 >= threshold
    }

    /// Purge history entries older than the retention window.
    pub async fn cleanup(&mut self) {
        let cutoff = self.clock.now_ms() - HISTORY_RETENTION_MS;
        self.history.retain(|entry| entry.timestamp_ms > cutoff);
        self.save_state().await;
    }

    /// Session-scoped preference override.
    pub async fn set_user_preference(&mut self, key: &str, value: &str) {
        self.user_preferences
            .insert(key.to_string(), value.to_string());
        self.save_state().await;
    }

    /// Read a session-scoped preference override.
    pub fn get_user_preference(&self, key: &str) -> Option<&str> {
        self.user_preferences.get(key).map(String::as_str)
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
    }

    pub fn current_user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or("anonymous")
    }

    /// Number of interactions recorded this session.
    pub fn interaction_count(&self) -> u64 {
        self.interaction_count
    }

    /// The retained history, oldest first.
    pub fn history(&self) -> &[ConversationHistoryEntry] {
        &self.history
    }

    async fn save_state(&self) {
        let prefs: Vec<Value> = self
            .user_preferences
            .iter()
            .map(|(k, v)| json!([k, v]))
            .collect();
        let history = match serde_json::to_value(&self.history) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("failed to serialize history: {}", e);
                Value::Array(Vec::new())
            }
        };
        let blob = json!({
            "userPreferences": prefs,
            "history": history,
            "lastSaved": self.clock.now_ms(),
        });
        if let Err(e) = self.store.save(CONTEXT_MANAGER_SLOT, &blob).await {
            log::warn!("failed to save context manager state: {}", e);
        }
    }
}
