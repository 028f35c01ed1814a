//! Wire format of the OCI Generative AI inference `chat` action.
//!
//! Cohere models take a single message plus a preamble; every other model
//! family uses the generic multi-message format.

use serde::{Deserialize, Serialize};

use super::client::ModelError;
use super::prompt::Prompt;

const API_VERSION: &str = "20231130";

/// Builds the chat action URL from a service endpoint.
pub fn chat_url(service_endpoint: &str) -> String {
    format!(
        "{}/{API_VERSION}/actions/chat",
        service_endpoint.trim_end_matches('/')
    )
}

/// Returns `true` if the model id belongs to the Cohere family.
pub fn is_cohere_model(model_id: &str) -> bool {
    model_id
        .get(..7)
        .is_some_and(|head| head.eq_ignore_ascii_case("cohere."))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetails<'a> {
    compartment_id: &'a str,
    serving_mode: ServingMode<'a>,
    chat_request: ChatRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServingMode<'a> {
    serving_type: &'static str,
    model_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "apiFormat")]
enum ChatRequest<'a> {
    #[serde(rename = "GENERIC", rename_all = "camelCase")]
    Generic {
        messages: Vec<GenericMessage<'a>>,
        max_tokens: u32,
        temperature: f32,
        is_stream: bool,
    },
    #[serde(rename = "COHERE", rename_all = "camelCase")]
    Cohere {
        message: &'a str,
        preamble_override: &'a str,
        max_tokens: u32,
        temperature: f32,
        is_stream: bool,
    },
}

#[derive(Debug, Serialize)]
struct GenericMessage<'a> {
    role: &'static str,
    content: Vec<TextContent<'a>>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> TextContent<'a> {
    const fn new(text: &'a str) -> Self {
        Self { kind: "TEXT", text }
    }
}

impl<'a> ChatDetails<'a> {
    pub fn new(
        model_id: &'a str,
        compartment_id: &'a str,
        prompt: &'a Prompt,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        let chat_request = if is_cohere_model(model_id) {
            ChatRequest::Cohere {
                message: &prompt.user,
                preamble_override: &prompt.system,
                max_tokens,
                temperature,
                is_stream: false,
            }
        } else {
            ChatRequest::Generic {
                messages: vec![
                    GenericMessage {
                        role: "SYSTEM",
                        content: vec![TextContent::new(&prompt.system)],
                    },
                    GenericMessage {
                        role: "USER",
                        content: vec![TextContent::new(&prompt.user)],
                    },
                ],
                max_tokens,
                temperature,
                is_stream: false,
            }
        };

        Self {
            compartment_id,
            serving_mode: ServingMode {
                serving_type: "ON_DEMAND",
                model_id,
            },
            chat_request,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatResult {
    chat_response: ChatResponse,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "apiFormat")]
enum ChatResponse {
    #[serde(rename = "GENERIC")]
    Generic {
        #[serde(default)]
        choices: Vec<Choice>,
    },
    #[serde(rename = "COHERE")]
    Cohere {
        #[serde(default)]
        text: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Pulls the reply text out of a chat response body.
///
/// Only the first choice is read; its text parts are concatenated.
pub fn extract_text(body: &str) -> Result<String, ModelError> {
    let result: ChatResult =
        serde_json::from_str(body).map_err(|e| ModelError::Malformed(e.to_string()))?;

    let text = match result.chat_response {
        ChatResponse::Cohere { text } => text.unwrap_or_default(),
        ChatResponse::Generic { choices } => {
            let message = choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .ok_or_else(|| ModelError::Malformed("response has no choices".to_string()))?;

            message
                .content
                .into_iter()
                .filter(|c| c.kind == "TEXT")
                .filter_map(|c| c.text)
                .collect()
        }
    };

    if text.trim().is_empty() {
        return Err(ModelError::Malformed("response text is empty".to_string()));
    }

    Ok(text)
}
