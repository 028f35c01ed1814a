use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use crate::translation::{
    SUPPORTED_LANGUAGES, SupportedLanguage, TranslateError, TranslationRequest, TranslationResult,
};

/// `POST /translate`
///
/// The body is first taken as loose JSON so that a request failing the typed
/// shape can still echo whatever language fields it carried.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TranslationResult>, ApiError> {
    let Json(value) = payload.map_err(|rejection| {
        ApiError::new(
            TranslateError::InvalidInput(rejection.body_text()),
            None,
            None,
        )
    })?;

    let source_language = string_field(&value, "source_language");
    let target_language = string_field(&value, "target_language");

    let request: TranslationRequest = serde_json::from_value(value).map_err(|e| {
        ApiError::new(
            TranslateError::InvalidInput(format!("Invalid request body: {e}")),
            source_language.clone(),
            target_language.clone(),
        )
    })?;

    state
        .translator
        .translate(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, source_language, target_language))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_id": state.translator.model_id(),
    }))
}

/// `GET /languages`
pub async fn languages() -> Json<&'static [SupportedLanguage]> {
    Json(SUPPORTED_LANGUAGES)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
