use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Sparse weighted-term vector produced by TF-IDF.
///
/// An absent term carries weight 0; all stored weights are non-negative.
pub type DocumentVector = HashMap<String, f64>;

/// Normalized frequency distribution over detected languages.
///
/// Fractions over the present languages sum to 1; empty when built from an
/// empty history.
pub type LanguagePreference = HashMap<Language, f64>;

/// Language detected from a text span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    En,
    Ja,
    Unknown,
}

impl Language {
    /// Deterministic iteration order for tie-breaks and keyword allocation
    pub const RANKED: [Language; 3] = [Language::Ko, Language::En, Language::Ja];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Ja => "ja",
            Language::Unknown => "unknown",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate media item supplied by the caller
///
/// Immutable input: the pipeline reads it, never mutates it. Every field
/// except the identifier defaults permissively when absent from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MediaItem {
    /// Text span used for profiling and language detection
    pub fn profile_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.channel_title)
    }

    /// Profile text plus space-joined tags, used when vectorizing candidates
    pub fn candidate_text(&self) -> String {
        format!("{} {}", self.profile_text(), self.tags.join(" "))
    }
}

/// A played item from the user's listening history
///
/// `played_at` is an ISO-8601 timestamp; lexicographic comparison is
/// correctness-equivalent to chronological order, so it is kept as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub media: MediaItem,
    #[serde(default)]
    pub played_at: String,
    #[serde(default)]
    pub emotion: String,
}

impl HistoryEntry {
    pub fn profile_text(&self) -> String {
        self.media.profile_text()
    }
}

/// A candidate with its relevance score and detected language
///
/// `language` is omitted from the wire format on the zero-score fallback
/// paths, where no detection runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub video_id: String,
    pub score: f64,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ScoredCandidate {
    pub fn new(item: &MediaItem, score: f64, language: Option<Language>) -> Self {
        Self {
            video_id: item.video_id.clone(),
            score,
            title: item.title.clone(),
            description: item.description.clone(),
            channel_title: item.channel_title.clone(),
            thumbnail_url: item.thumbnail_url.clone(),
            duration: item.duration,
            tags: item.tags.clone(),
            language,
        }
    }

    /// Fallback entry used when no profile can be derived
    pub fn unscored(item: &MediaItem) -> Self {
        Self::new(item, 0.0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_item_defaults() {
        let item: MediaItem = serde_json::from_str(r#"{"videoId":"abc123"}"#).unwrap();
        assert_eq!(item.video_id, "abc123");
        assert_eq!(item.title, "");
        assert_eq!(item.description, "");
        assert_eq!(item.channel_title, "");
        assert_eq!(item.thumbnail_url, "");
        assert_eq!(item.duration, 0.0);
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_media_item_requires_video_id() {
        let result: Result<MediaItem, _> = serde_json::from_str(r#"{"title":"no id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_entry_flattens_media_fields() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"videoId":"xyz789","title":"Chill Vibes","playedAt":"2025-12-12T10:00:00Z","emotion":"happy"}"#,
        )
        .unwrap();
        assert_eq!(entry.media.video_id, "xyz789");
        assert_eq!(entry.media.title, "Chill Vibes");
        assert_eq!(entry.played_at, "2025-12-12T10:00:00Z");
        assert_eq!(entry.emotion, "happy");
    }

    #[test]
    fn test_candidate_text_includes_tags() {
        let item = MediaItem {
            video_id: "abc".to_string(),
            title: "Happy Music".to_string(),
            description: "Upbeat".to_string(),
            channel_title: "Channel".to_string(),
            thumbnail_url: String::new(),
            duration: 0.0,
            tags: vec!["pop".to_string(), "dance".to_string()],
        };
        assert_eq!(item.candidate_text(), "Happy Music Upbeat Channel pop dance");
    }

    #[test]
    fn test_language_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Ko).unwrap(), "\"ko\"");
        assert_eq!(serde_json::to_string(&Language::Unknown).unwrap(), "\"unknown\"");
    }

    #[test]
    fn test_language_preference_map_keys() {
        let mut prefs = LanguagePreference::new();
        prefs.insert(Language::Ko, 0.9);
        prefs.insert(Language::En, 0.1);
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["ko"], 0.9);
        assert_eq!(json["en"], 0.1);
    }

    #[test]
    fn test_scored_candidate_omits_language_when_unscored() {
        let item: MediaItem = serde_json::from_str(r#"{"videoId":"abc123"}"#).unwrap();
        let scored = ScoredCandidate::unscored(&item);
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["score"], 0.0);
        assert!(json.get("language").is_none());
    }
}
