use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiJson, AppResult},
    middleware::request_id::RequestId,
    models::{HistoryEntry, LanguagePreference},
    routes::Envelope,
    services::keywords::{self, KeywordOutcome},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRequest {
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub played_history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordData {
    pub keywords: Vec<String>,
    pub language_preference: LanguagePreference,
    pub top_terms: Vec<String>,
}

/// Handler for the keyword generation endpoint
///
/// Empty `keywords` tells the caller to fall back to its own defaults.
pub async fn generate_keywords(
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<KeywordRequest>,
) -> AppResult<Json<Envelope<KeywordData>>> {
    tracing::info!(
        request_id = %request_id,
        emotion = %request.emotion,
        history_count = request.played_history.len(),
        "Processing keyword generation request"
    );

    let outcome = keywords::generate_keywords(
        &request.emotion,
        &request.played_history,
        &mut rand::thread_rng(),
    );

    let (message, data) = match outcome {
        KeywordOutcome::InsufficientHistory => (
            "Insufficient play history, using default keywords",
            KeywordData {
                keywords: Vec::new(),
                language_preference: LanguagePreference::new(),
                top_terms: Vec::new(),
            },
        ),
        KeywordOutcome::EmptyProfile(preferences) => (
            "Profile unavailable, using default keywords",
            KeywordData {
                keywords: Vec::new(),
                language_preference: preferences,
                top_terms: Vec::new(),
            },
        ),
        KeywordOutcome::Generated(bundle) => {
            tracing::info!(
                request_id = %request_id,
                keywords = ?bundle.keywords,
                "Keyword generation completed"
            );
            (
                "Keyword generation complete",
                KeywordData {
                    keywords: bundle.keywords,
                    language_preference: bundle.language_preference,
                    top_terms: bundle.top_terms,
                },
            )
        }
    };

    Ok(Json(Envelope::ok(message, data)))
}
