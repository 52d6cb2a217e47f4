use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::services::pronunciation::Pronunciation;
use crate::state::AppState;
use crate::validation::validate_pronounce_text;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(speak))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechRequest {
    text: String,
}

async fn speak(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SpeechRequest>,
) -> Result<Response, AppError> {
    let text = validate_pronounce_text(&req.text).map_err(|message| {
        if req.text.trim().is_empty() {
            AppError::bad_request("EMPTY_TEXT", message)
        } else {
            AppError::bad_request("TEXT_TOO_LONG", message)
        }
    })?;

    let response = match state.pronouncer().pronounce(text).await {
        Some(Pronunciation::Audio {
            classification,
            audio,
        }) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "audio/mpeg"),
                (header::CACHE_CONTROL, "no-store"),
                (header::CONTENT_LANGUAGE, classification.lang.as_str()),
            ],
            audio,
        )
            .into_response(),
        Some(Pronunciation::Local {
            classification,
            rate,
        }) => ok(serde_json::json!({
            "strategy": "local",
            "lang": classification.lang,
            "kind": classification.kind,
            "rate": rate,
        }))
        .into_response(),
        Some(Pronunciation::Silent { .. }) | None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}
