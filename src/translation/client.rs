use chrono::Utc;
use futures_util::future::BoxFuture;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE};
use reqwest::{Client, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::oci::{self, ChatDetails};
use super::prompt::Prompt;
use super::signer::RequestSigner;

/// Failures talking to the model endpoint.
///
/// Messages may include provider payloads; they are meant for logs.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model endpoint unreachable: {0}")]
    Unavailable(String),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Malformed(String),

    #[error("failed to build model request: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Internal(err.to_string())
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            // timeout, connect, request and body errors all mean we never got an answer
            Self::Unavailable(err.to_string())
        }
    }
}

/// A generative model that can complete a chat prompt.
///
/// Implementations own authentication, connection pooling and transport
/// concerns. Returns the raw text of the model's reply.
pub trait ModelClient: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a Prompt) -> BoxFuture<'a, Result<String, ModelError>>;

    /// Identifier of the model behind this client, for logs and `/health`.
    fn model_id(&self) -> &str;
}

/// How requests to OCI are authenticated.
#[derive(Debug, Clone)]
pub enum OciAuth {
    /// `Authorization: Bearer <token>`.
    Token(String),
    /// API-key request signing.
    ApiKey(RequestSigner),
}

/// Connection settings for the OCI Generative AI inference endpoint.
#[derive(Debug, Clone)]
pub struct OciSettings {
    pub model_id: String,
    pub service_endpoint: String,
    pub compartment_id: String,
    pub auth: OciAuth,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Client for the OCI Generative AI `chat` action.
pub struct OciChatClient {
    client: Client,
    settings: OciSettings,
    url: Url,
}

impl OciChatClient {
    pub fn new(settings: OciSettings) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ModelError::Internal(e.to_string()))?;

        let url = oci::chat_url(&settings.service_endpoint);
        let url = Url::parse(&url)
            .map_err(|e| ModelError::Internal(format!("invalid endpoint '{url}': {e}")))?;

        Ok(Self {
            client,
            settings,
            url,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn send(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let details = ChatDetails::new(
            &self.settings.model_id,
            &self.settings.compartment_id,
            prompt,
            self.settings.temperature,
            self.settings.max_tokens,
        );

        let body = serde_json::to_vec(&details)
            .map_err(|e| ModelError::Internal(format!("failed to encode chat request: {e}")))?;

        let http_request = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json");

        let http_request = match &self.settings.auth {
            OciAuth::Token(token) => http_request.bearer_auth(token),
            OciAuth::ApiKey(signer) => {
                let signed = signer.sign(&self.url, &body, Utc::now())?;
                http_request
                    .header(DATE, signed.date)
                    .header("x-content-sha256", signed.content_sha256)
                    .header(CONTENT_LENGTH, signed.content_length)
                    .header(AUTHORIZATION, signed.authorization)
            }
        };

        debug!(url = %self.url, model = %self.settings.model_id, "calling model endpoint");

        let response = http_request.body(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status { status, body });
        }

        let body = response.text().await?;
        oci::extract_text(&body)
    }
}

impl ModelClient for OciChatClient {
    fn complete<'a>(&'a self, prompt: &'a Prompt) -> BoxFuture<'a, Result<String, ModelError>> {
        Box::pin(self.send(prompt))
    }

    fn model_id(&self) -> &str {
        &self.settings.model_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::signer::{SIGNED_HEADERS, content_sha256, signing_string};
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use rsa::RsaPrivateKey;
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::signature::Verifier;
    use serde_json::{Value, json};
    use sha2::Sha256;
    use std::sync::{Arc, Mutex};

    const TEST_KEY: &str = include_str!("../../tests/fixtures/oci_api_key.pem");
    const KEY_ID: &str = "ocid1.tenancy.oc1..t/ocid1.user.oc1..u/aa:bb:cc";

    type Captured = Arc<Mutex<Option<(HeaderMap, Bytes)>>>;

    fn settings(endpoint: &str, auth: OciAuth) -> OciSettings {
        OciSettings {
            model_id: "meta.llama-3.1-70b-instruct".to_string(),
            service_endpoint: endpoint.to_string(),
            compartment_id: "ocid1.compartment.oc1..test".to_string(),
            auth,
            timeout: Duration::from_secs(2),
            temperature: 0.0,
            max_tokens: 256,
        }
    }

    fn token() -> OciAuth {
        OciAuth::Token("test-token".to_string())
    }

    async fn record(State(captured): State<Captured>, headers: HeaderMap, body: Bytes) -> Json<Value> {
        *captured.lock().unwrap() = Some((headers, body));
        Json(json!({
            "chatResponse": {
                "apiFormat": "GENERIC",
                "choices": [{
                    "message": {"role": "ASSISTANT", "content": [{"type": "TEXT", "text": "Hola"}]}
                }]
            }
        }))
    }

    /// Serves the chat action on an ephemeral local port and records the last request.
    async fn capture_server() -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route("/20231130/actions/chat", post(record))
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), captured)
    }

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
        headers.get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_client_builds_chat_url() {
        let client = OciChatClient::new(settings(
            "https://inference.generativeai.us-chicago-1.oci.oraclecloud.com/",
            token(),
        ))
        .unwrap();

        assert_eq!(
            client.url(),
            "https://inference.generativeai.us-chicago-1.oci.oraclecloud.com/20231130/actions/chat"
        );
        assert_eq!(client.model_id(), "meta.llama-3.1-70b-instruct");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = OciChatClient::new(settings("http://127.0.0.1:9", token())).unwrap();
        let prompt = Prompt::for_translation("Hello", "Spanish", None);

        let err = client.complete(&prompt).await.unwrap_err();
        assert!(matches!(err, ModelError::Unavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_token_auth_sends_bearer_header() {
        let (endpoint, captured) = capture_server().await;
        let client = OciChatClient::new(settings(&endpoint, token())).unwrap();

        let reply = client
            .complete(&Prompt::for_translation("Hello", "Spanish", None))
            .await
            .unwrap();
        assert_eq!(reply, "Hola");

        let (headers, _) = captured.lock().unwrap().take().unwrap();
        assert_eq!(header(&headers, "authorization"), "Bearer test-token");
        assert_eq!(header(&headers, "content-type"), "application/json");
        assert!(headers.get("x-content-sha256").is_none());
    }

    #[tokio::test]
    async fn test_api_key_auth_signs_request() {
        let (endpoint, captured) = capture_server().await;
        let signer = RequestSigner::new(KEY_ID, TEST_KEY).unwrap();
        let client = OciChatClient::new(settings(&endpoint, OciAuth::ApiKey(signer))).unwrap();

        let reply = client
            .complete(&Prompt::for_translation("Hello", "Spanish", None))
            .await
            .unwrap();
        assert_eq!(reply, "Hola");

        let (headers, body) = captured.lock().unwrap().take().unwrap();
        let sent: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(sent["compartmentId"], "ocid1.compartment.oc1..test");

        assert_eq!(header(&headers, "x-content-sha256"), content_sha256(&body));
        assert_eq!(header(&headers, "content-length"), body.len().to_string());

        let authorization = header(&headers, "authorization");
        assert!(authorization.starts_with(&format!(
            "Signature version=\"1\",keyId=\"{KEY_ID}\",algorithm=\"rsa-sha256\",headers=\"{SIGNED_HEADERS}\""
        )));

        // Rebuild the signing string from what actually arrived
        let expected = signing_string(
            header(&headers, "date"),
            "post /20231130/actions/chat",
            header(&headers, "host"),
            header(&headers, "x-content-sha256"),
            body.len(),
        );
        let encoded = authorization
            .split("signature=\"")
            .nth(1)
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap();
        let signature = Signature::try_from(STANDARD.decode(encoded).unwrap().as_slice()).unwrap();
        let public_key = RsaPrivateKey::from_pkcs8_pem(TEST_KEY)
            .unwrap()
            .to_public_key();

        assert!(
            VerifyingKey::<Sha256>::new(public_key)
                .verify(expected.as_bytes(), &signature)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body_for_logs() {
        let app = Router::new().route(
            "/20231130/actions/chat",
            post(|| async {
                (
                    axum::http::StatusCode::UNAUTHORIZED,
                    "{\"code\":\"NotAuthenticated\"}",
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = OciChatClient::new(settings(&format!("http://{addr}"), token())).unwrap();
        let err = client
            .complete(&Prompt::for_translation("Hello", "Spanish", None))
            .await
            .unwrap_err();

        assert!(
            matches!(err, ModelError::Status { status: 401, ref body } if body.contains("NotAuthenticated")),
            "got {err:?}"
        );
    }
}
