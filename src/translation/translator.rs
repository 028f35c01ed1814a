use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::cleanup::{Reply, clean_reply};
use super::client::ModelClient;
use super::error::{LanguageField, TranslateError};
use super::language::{SupportedLanguage, resolve_language};
use super::prompt::Prompt;

/// A translation request as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}

/// A successful translation. Language fields echo the request verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}

/// Validates requests, prompts the model and cleans up its reply.
///
/// Holds no per-request state; one instance serves every request.
pub struct Translator {
    client: Arc<dyn ModelClient>,
    timeout: Duration,
}

impl Translator {
    pub fn new(client: Arc<dyn ModelClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn model_id(&self) -> &str {
        self.client.model_id()
    }

    /// Translates one request.
    ///
    /// Validation failures return before the model is called. The model call
    /// is attempted exactly once.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslateError> {
        let (target, source) = validate(request)?;

        debug!(
            to = target.code,
            from = source.map_or("auto", |s| s.code),
            chars = request.text.chars().count(),
            "translating"
        );

        let prompt = Prompt::for_translation(&request.text, target.name, source.map(|s| s.name));

        let raw = match tokio::time::timeout(self.timeout, self.client.complete(&prompt)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TranslateError::UpstreamUnavailable {
                    diagnostic: format!("model call exceeded {}s timeout", self.timeout.as_secs_f32()),
                });
            }
        };

        let translated_text = match clean_reply(&raw) {
            Reply::Translation(text) => text,
            Reply::Empty => {
                warn!(to = target.code, "model reply was empty");
                return Err(TranslateError::UpstreamResponseInvalid {
                    diagnostic: "model reply was empty after cleanup".to_string(),
                });
            }
        };

        Ok(TranslationResult {
            translated_text,
            target_language: request.target_language.clone(),
            source_language: request.source_language.clone(),
        })
    }
}

/// Checks text and resolves both language identifiers.
fn validate(
    request: &TranslationRequest,
) -> Result<(&'static SupportedLanguage, Option<&'static SupportedLanguage>), TranslateError> {
    if request.text.trim().is_empty() {
        return Err(TranslateError::InvalidInput(
            "Text to translate must not be empty".to_string(),
        ));
    }

    let target = resolve_language(&request.target_language).ok_or_else(|| {
        TranslateError::UnsupportedLanguage {
            field: LanguageField::Target,
            value: request.target_language.clone(),
        }
    })?;

    let source = request
        .source_language
        .as_deref()
        .map(|lang| {
            resolve_language(lang).ok_or_else(|| TranslateError::UnsupportedLanguage {
                field: LanguageField::Source,
                value: lang.to_string(),
            })
        })
        .transpose()?;

    Ok((target, source))
}
