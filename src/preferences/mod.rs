//! Durable user preference store with feedback-driven adaptation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use crate::storage::StateStore;
use crate::types::{pref, DetailLevel, Feedback, FeedbackTag, FormalityLevel, VoiceSpeed};

/// Storage slot holding the preference blob.
pub const PREFERENCES_SLOT: &str = "preferences";

/// Ratings below this trigger tag-based adaptation.
const LOW_RATING: u8 = 3;

/// Default value per known preference key. Keys absent from this table
/// are unknown to the store and ignored on import.
const DEFAULTS: [(&str, &str); 7] = [
    (pref::COMMUNICATION_STYLE, "casual"),
    (pref::FORMALITY_LEVEL, "medium"),
    (pref::PREFERRED_NAME, ""),
    (pref::VOICE_SPEED, "normal"),
    (pref::DETAIL_LEVEL, "medium"),
    (pref::MOTIVATION_LEVEL, "medium"),
    (pref::LANGUAGE_VARIANT, "standard"),
];

fn default_for(key: &str) -> Option<&'static str> {
    DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Key-value preference store backed by a [`StateStore`] slot.
///
/// Persistence failures are logged and degrade to in-memory behavior;
/// they never propagate to the caller.
pub struct UserPreferences {
    store: Arc<dyn StateStore>,
    preferences: HashMap<String, String>,
}

impl UserPreferences {
    /// Create a store seeded with the defaults; call [`load`](Self::load)
    /// to pull persisted values.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            preferences: Self::defaults(),
        }
    }

    /// The full defaults map.
    pub fn defaults() -> HashMap<String, String> {
        DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Load persisted preferences, materializing defaults for any key
    /// the persisted blob is missing. A missing or malformed blob falls
    /// back to pure defaults.
    pub async fn load(&mut self) {
        let loaded = match self.store.load(PREFERENCES_SLOT).await {
            Ok(blob) => blob.and_then(|b| parse_entries(&b, "preferences")),
            Err(e) => {
                log::warn!("failed to load user preferences: {}", e);
                None
            }
        };

        self.preferences = loaded.unwrap_or_default();
        for (key, value) in DEFAULTS {
            self.preferences
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    /// Read a preference, falling back to its default. Unknown keys
    /// yield `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.preferences
            .get(key)
            .map(String::as_str)
            .or_else(|| default_for(key))
    }

    /// Set a preference and persist.
    pub async fn set(&mut self, key: &str, value: &str) {
        self.preferences.insert(key.to_string(), value.to_string());
        self.save().await;
    }

    /// Adapt preferences from one piece of user feedback. Level changes
    /// move a single notch at a time.
    pub async fn update_from_feedback(&mut self, feedback: &Feedback) {
        if feedback.rating < LOW_RATING {
            match feedback.tag {
                Some(FeedbackTag::TooFormal) => {
                    let current = self
                        .get(pref::FORMALITY_LEVEL)
                        .and_then(FormalityLevel::from_key)
                        .unwrap_or_default();
                    self.preferences.insert(
                        pref::FORMALITY_LEVEL.to_string(),
                        current.lower().as_key().to_string(),
                    );
                }
                Some(FeedbackTag::TooDetailed) => {
                    let current = self
                        .get(pref::DETAIL_LEVEL)
                        .and_then(DetailLevel::from_key)
                        .unwrap_or_default();
                    self.preferences.insert(
                        pref::DETAIL_LEVEL.to_string(),
                        current.lower().as_key().to_string(),
                    );
                }
                Some(FeedbackTag::TooFast) => {
                    self.preferences.insert(
                        pref::VOICE_SPEED.to_string(),
                        VoiceSpeed::Slow.as_key().to_string(),
                    );
                }
                None => {}
            }
        }

        if let Some(comments) = &feedback.comments {
            let comments = comments.to_lowercase();
            if comments.contains("wolniej") {
                self.preferences.insert(
                    pref::VOICE_SPEED.to_string(),
                    VoiceSpeed::Slow.as_key().to_string(),
                );
            }
            if comments.contains("krótko") {
                self.preferences.insert(
                    pref::DETAIL_LEVEL.to_string(),
                    DetailLevel::Low.as_key().to_string(),
                );
            }
            if comments.contains("formal") {
                self.preferences.insert(
                    pref::FORMALITY_LEVEL.to_string(),
                    FormalityLevel::High.as_key().to_string(),
                );
            }
        }

        self.save().await;
    }

    /// Snapshot of the full preference map.
    pub fn export(&self) -> HashMap<String, String> {
        self.preferences.clone()
    }

    /// Import a preference map, accepting only keys present in the
    /// defaults table; unknown keys are ignored.
    pub async fn import(&mut self, preferences: &HashMap<String, String>) {
        for (key, value) in preferences {
            if default_for(key).is_some() {
                self.preferences.insert(key.clone(), value.clone());
            }
        }
        self.save().await;
    }

    async fn save(&self) {
        let entries: Vec<Value> = self
            .preferences
            .iter()
            .map(|(k, v)| json!([k, v]))
            .collect();
        let blob = json!({
            "preferences": entries,
            "lastUpdated": Utc::now().timestamp_millis(),
        });
        if let Err(e) = self.store.save(PREFERENCES_SLOT, &blob).await {
            log::warn!("failed to save user preferences: {}", e);
        }
    }
}

/// Extract `[[key, value], ...]` entries from a persisted blob field.
pub(crate) fn parse_entries(blob: &Value, field: &str) -> Option<HashMap<String, String>> {
    let entries = blob.get(field)?.as_array()?;
    let mut map = HashMap::new();
    for entry in entries {
        let pair = entry.as_array()?;
        let key = pair.first()?.as_str()?;
        let value = pair.get(1)?.as_str()?;
        map.insert(key.to_string(), value.to_string());
    }
    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    async fn loaded_store() -> UserPreferences {
        let mut prefs = UserPreferences::new(Arc::new(MemoryStore::new()));
        prefs.load().await;
        prefs
    }

    #[test]
    fn test_defaults_cover_every_known_key() {
        let prefs = UserPreferences::new(Arc::new(MemoryStore::new()));
        assert_eq!(prefs.get(pref::COMMUNICATION_STYLE), Some("casual"));
        assert_eq!(prefs.get(pref::FORMALITY_LEVEL), Some("medium"));
        assert_eq!(prefs.get(pref::PREFERRED_NAME), Some(""));
        assert_eq!(prefs.get(pref::VOICE_SPEED), Some("normal"));
        assert_eq!(prefs.get("unknownKey"), None);
    }

    #[tokio::test]
    async fn test_set_and_reload_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let mut prefs = UserPreferences::new(store.clone());
        prefs.load().await;
        prefs.set(pref::PREFERRED_NAME, "Ola").await;

        let mut reloaded = UserPreferences::new(store);
        reloaded.load().await;
        assert_eq!(reloaded.get(pref::PREFERRED_NAME), Some("Ola"));
        // Untouched keys still resolve to defaults.
        assert_eq!(reloaded.get(pref::VOICE_SPEED), Some("normal"));
    }

    #[tokio::test]
    async fn test_malformed_blob_falls_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .save(PREFERENCES_SLOT, &json!({ "preferences": "corrupt" }))
            .await
            .unwrap();

        let mut prefs = UserPreferences::new(store);
        prefs.load().await;
        assert_eq!(prefs.get(pref::COMMUNICATION_STYLE), Some("casual"));
    }

    #[tokio::test]
    async fn test_low_rating_too_formal_steps_down_one_notch() {
        let mut prefs = loaded_store().await;
        prefs.set(pref::FORMALITY_LEVEL, "high").await;

        let feedback = Feedback {
            tag: Some(FeedbackTag::TooFormal),
            rating: 2,
            comments: None,
        };
        prefs.update_from_feedback(&feedback).await;
        assert_eq!(prefs.get(pref::FORMALITY_LEVEL), Some("medium"));

        prefs.update_from_feedback(&feedback).await;
        assert_eq!(prefs.get(pref::FORMALITY_LEVEL), Some("low"));

        // Floor at low.
        prefs.update_from_feedback(&feedback).await;
        assert_eq!(prefs.get(pref::FORMALITY_LEVEL), Some("low"));
    }

    #[tokio::test]
    async fn test_good_rating_does_not_adapt() {
        let mut prefs = loaded_store().await;
        let feedback = Feedback {
            tag: Some(FeedbackTag::TooDetailed),
            rating: 4,
            comments: None,
        };
        prefs.update_from_feedback(&feedback).await;
        assert_eq!(prefs.get(pref::DETAIL_LEVEL), Some("medium"));
    }

    #[tokio::test]
    async fn test_comment_cues_map_to_discrete_changes() {
        let mut prefs = loaded_store().await;
        let feedback = Feedback {
            tag: None,
            rating: 5,
            comments: Some("Mów wolniej i bardziej FORMALnie, krótko.".to_string()),
        };
        prefs.update_from_feedback(&feedback).await;
        assert_eq!(prefs.get(pref::VOICE_SPEED), Some("slow"));
        assert_eq!(prefs.get(pref::DETAIL_LEVEL), Some("low"));
        assert_eq!(prefs.get(pref::FORMALITY_LEVEL), Some("high"));
    }

    #[tokio::test]
    async fn test_import_ignores_unknown_keys() {
        let mut prefs = loaded_store().await;
        let mut incoming = HashMap::new();
        incoming.insert(pref::DETAIL_LEVEL.to_string(), "high".to_string());
        incoming.insert("favoriteColor".to_string(), "blue".to_string());
        prefs.import(&incoming).await;

        assert_eq!(prefs.get(pref::DETAIL_LEVEL), Some("high"));
        assert_eq!(prefs.get("favoriteColor"), None);
        assert!(!prefs.export().contains_key("favoriteColor"));
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let mut prefs = loaded_store().await;
        prefs.set(pref::PREFERRED_NAME, "Marek").await;
        let exported = prefs.export();

        let mut other = loaded_store().await;
        other.import(&exported).await;
        assert_eq!(other.export(), exported);
    }
}
