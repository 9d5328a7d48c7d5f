use std::cmp::Ordering;

use crate::models::{DocumentVector, HistoryEntry, MediaItem, ScoredCandidate};
use crate::services::language::detect_language;
use crate::services::profile::{
    build_user_profile, filter_by_emotion, language_preference, PROFILE_HISTORY_DEPTH,
};
use crate::services::text::tokenize;
use crate::services::tfidf::{cosine_similarity, inverse_document_frequency, term_frequency, tf_idf};

/// Multiplier applied to the preferred-language fraction (max 50% uplift)
const LANGUAGE_BOOST_WEIGHT: f64 = 0.5;

/// Outcome of scoring a candidate list against a listening history
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendOutcome {
    /// No usable history after emotion filtering: candidates in input order,
    /// every score 0.0, no profile computed.
    NoHistory(Vec<ScoredCandidate>),
    /// History produced an empty profile: same zero-score fallback, but the
    /// response reports the empty profile explicitly.
    EmptyProfile(Vec<ScoredCandidate>),
    /// Ranked recommendations plus the profile vector they were scored against
    Ranked {
        music: Vec<ScoredCandidate>,
        profile: DocumentVector,
    },
}

/// Scores and ranks candidates against the user's taste profile
///
/// History is optionally restricted to entries matching the supplied emotion
/// tag. Each candidate is TF-IDF-vectorized over the candidate corpus (an
/// independent term space from the profile's), compared to the profile via
/// cosine similarity, and boosted multiplicatively when its detected language
/// matches the user's preference. The result is sorted by score descending;
/// ties keep input order.
pub fn recommend_music(
    emotion: &str,
    candidates: &[MediaItem],
    history: &[HistoryEntry],
) -> RecommendOutcome {
    let history = filter_by_emotion(history, emotion);

    if history.is_empty() {
        return RecommendOutcome::NoHistory(candidates.iter().map(ScoredCandidate::unscored).collect());
    }

    let profile = build_user_profile(&history, PROFILE_HISTORY_DEPTH);
    if profile.is_empty() {
        return RecommendOutcome::EmptyProfile(
            candidates.iter().map(ScoredCandidate::unscored).collect(),
        );
    }

    let preferences = language_preference(&history);

    let documents: Vec<Vec<String>> = candidates
        .iter()
        .map(|music| tokenize(&music.candidate_text()))
        .collect();
    let idf = inverse_document_frequency(&documents);

    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .zip(&documents)
        .map(|(music, tokens)| {
            let vector = tf_idf(&term_frequency(tokens), &idf);
            let similarity = cosine_similarity(&profile, &vector);

            // Language detection runs on the profile text, without tags
            let language = detect_language(&music.profile_text());
            let boost = preferences.get(&language).copied().unwrap_or(0.0) * LANGUAGE_BOOST_WEIGHT;

            ScoredCandidate::new(music, round_score(similarity * (1.0 + boost)), Some(language))
        })
        .collect();

    // Stable sort keeps input order among equal scores
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    RecommendOutcome::Ranked {
        music: scored,
        profile,
    }
}

/// Rounds a final score to 4 decimal places
fn round_score(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
