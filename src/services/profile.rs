use std::collections::HashMap;

use crate::models::{DocumentVector, HistoryEntry, Language, LanguagePreference};
use crate::services::language::detect_language;
use crate::services::text::tokenize;
use crate::services::tfidf::{inverse_document_frequency, term_frequency, tf_idf};

/// How many of the most recent history items feed the profile
pub const PROFILE_HISTORY_DEPTH: usize = 10;

/// Restricts history to entries played under the given emotion
///
/// An empty emotion tag disables the filter.
pub fn filter_by_emotion(history: &[HistoryEntry], emotion: &str) -> Vec<HistoryEntry> {
    if emotion.is_empty() {
        return history.to_vec();
    }
    history
        .iter()
        .filter(|entry| entry.emotion == emotion)
        .cloned()
        .collect()
}

/// Builds the user's taste vector from recent listening history
///
/// Sorts by played-timestamp descending (lexicographic, which matches
/// chronological order for ISO-8601 strings), takes the `top_n` most recent
/// entries, vectorizes each with TF-IDF over exactly those documents, and
/// averages the vectors elementwise. Empty history yields an empty profile,
/// which callers treat as "no profile available".
pub fn build_user_profile(history: &[HistoryEntry], top_n: usize) -> DocumentVector {
    if history.is_empty() {
        return DocumentVector::new();
    }

    let mut recent: Vec<&HistoryEntry> = history.iter().collect();
    recent.sort_by(|a, b| b.played_at.cmp(&a.played_at));
    recent.truncate(top_n);

    let documents: Vec<Vec<String>> = recent
        .iter()
        .map(|entry| tokenize(&entry.profile_text()))
        .collect();

    let idf = inverse_document_frequency(&documents);

    let mut profile = DocumentVector::new();
    for tokens in &documents {
        let vector = tf_idf(&term_frequency(tokens), &idf);
        for (term, weight) in vector {
            *profile.entry(term).or_insert(0.0) += weight;
        }
    }

    let document_count = documents.len() as f64;
    for weight in profile.values_mut() {
        *weight /= document_count;
    }

    profile
}

/// Normalized frequency distribution of languages across the history
///
/// Classifies the same concatenated text used for profiling; `unknown`
/// counts like any other language. Empty history yields an empty map.
pub fn language_preference(history: &[HistoryEntry]) -> LanguagePreference {
    if history.is_empty() {
        return LanguagePreference::new();
    }

    let mut counts: HashMap<Language, usize> = HashMap::new();
    for entry in history {
        *counts
            .entry(detect_language(&entry.profile_text()))
            .or_insert(0) += 1;
    }

    let total = history.len() as f64;
    counts
        .into_iter()
        .map(|(language, count)| (language, count as f64 / total))
        .collect()
}
