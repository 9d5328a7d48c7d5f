use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiJson, AppResult},
    middleware::request_id::RequestId,
    models::{DocumentVector, HistoryEntry, MediaItem, ScoredCandidate},
    routes::Envelope,
    services::scoring::{self, RecommendOutcome},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub candidate_music: Vec<MediaItem>,
    #[serde(default)]
    pub played_history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendData {
    pub recommended_music: Vec<ScoredCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<DocumentVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile_size: Option<usize>,
}

/// Handler for the recommendation endpoint
pub async fn recommend(
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<RecommendRequest>,
) -> AppResult<Json<Envelope<RecommendData>>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        emotion = %request.emotion,
        candidate_count = request.candidate_music.len(),
        history_count = request.played_history.len(),
        "Processing recommendation request"
    );

    let outcome = scoring::recommend_music(
        &request.emotion,
        &request.candidate_music,
        &request.played_history,
    );

    let (message, data) = match outcome {
        RecommendOutcome::NoHistory(music) => (
            "Recommendation complete (no play history)",
            RecommendData {
                recommended_music: music,
                user_profile: None,
                user_profile_size: None,
            },
        ),
        RecommendOutcome::EmptyProfile(music) => (
            "Recommendation complete (profile unavailable)",
            RecommendData {
                recommended_music: music,
                user_profile: Some(DocumentVector::new()),
                user_profile_size: Some(0),
            },
        ),
        RecommendOutcome::Ranked { music, profile } => {
            let top_scores: Vec<f64> = music.iter().take(3).map(|m| m.score).collect();
            tracing::info!(
                request_id = %request_id,
                profile_terms = profile.len(),
                top_scores = ?top_scores,
                "Recommendation completed"
            );
            let profile_size = profile.len();
            (
                "Recommendation complete",
                RecommendData {
                    recommended_music: music,
                    user_profile: Some(profile),
                    user_profile_size: Some(profile_size),
                },
            )
        }
    };

    Ok(Json(Envelope::ok(message, data)))
}
