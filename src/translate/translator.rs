//! Core `Translator` trait and `ApiTranslator` implementation.
//!
//! `ApiTranslator` calls either the Gemini `generateContent` endpoint or any
//! OpenAI-compatible `/v1/chat/completions` endpoint.  All connection details
//! come from [`TranslationConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ServiceProvider, TranslationConfig};
use crate::translate::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating a sentence.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error, or a non-success status.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The service returned no usable text.
    #[error("translation service returned an empty response")]
    EmptyResponse,

    /// Translation is switched off in the configuration.
    #[error("translation is disabled")]
    Disabled,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Turns an ordered list of pictogram labels into one natural sentence.
///
/// Implementors must be `Send + Sync` so they can be shared with spawned
/// tasks behind an `Arc<dyn Translator>`.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, labels: &[String]) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// ApiTranslator
// ---------------------------------------------------------------------------

/// Remote sentence generator.
pub struct ApiTranslator {
    client: reqwest::Client,
    config: TranslationConfig,
    prompt_builder: PromptBuilder,
}

impl ApiTranslator {
    /// Build an `ApiTranslator` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(&config.language),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }

    async fn translate_gemini(&self, labels: &[String]) -> Result<String, TranslateError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": self.prompt_builder.build(labels) } ] }
            ],
            "generationConfig": { "temperature": self.config.temperature }
        });

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = self.api_key() {
            req = req.header("x-goog-api-key", key);
        }

        let json = read_json(req.send().await?).await?;
        extract_text(&json["candidates"][0]["content"]["parts"][0]["text"])
    }

    async fn translate_openai(&self, labels: &[String]) -> Result<String, TranslateError> {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(labels);
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  128
        });

        let mut req = self.client.post(&url).json(&body);
        // Local providers take no credentials.
        if let Some(key) = self.api_key() {
            req = req.bearer_auth(key);
        }

        let json = read_json(req.send().await?).await?;
        extract_text(&json["choices"][0]["message"]["content"])
    }
}

#[async_trait]
impl Translator for ApiTranslator {
    async fn translate(&self, labels: &[String]) -> Result<String, TranslateError> {
        if !self.config.enabled {
            return Err(TranslateError::Disabled);
        }
        log::debug!("translate: {} labels via {:?}", labels.len(), self.config.provider);
        match self.config.provider {
            ServiceProvider::Gemini => self.translate_gemini(labels).await,
            ServiceProvider::OpenAiCompatible => self.translate_openai(labels).await,
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, TranslateError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(TranslateError::Request(format!("{status}: {detail}")));
    }
    response
        .json()
        .await
        .map_err(|e| TranslateError::Parse(e.to_string()))
}

fn extract_text(value: &serde_json::Value) -> Result<String, TranslateError> {
    let text = value
        .as_str()
        .ok_or(TranslateError::EmptyResponse)?
        .trim()
        .to_string();
    if text.is_empty() {
        return Err(TranslateError::EmptyResponse);
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(provider: ServiceProvider, api_key: Option<&str>) -> TranslationConfig {
        TranslationConfig {
            provider,
            api_key: api_key.map(|s| s.to_string()),
            ..TranslationConfig::default()
        }
    }

    #[test]
    fn from_config_builds_for_each_provider() {
        let _ = ApiTranslator::from_config(&make_config(ServiceProvider::Gemini, None));
        let _ = ApiTranslator::from_config(&make_config(
            ServiceProvider::OpenAiCompatible,
            Some("sk-test"),
        ));
    }

    #[test]
    fn empty_api_key_is_treated_as_absent() {
        let translator = ApiTranslator::from_config(&make_config(ServiceProvider::Gemini, Some("")));
        assert!(translator.api_key().is_none());
    }

    #[test]
    fn extract_text_trims_and_rejects_blank() {
        let ok = serde_json::json!("  Quiero agua. \n");
        assert_eq!(extract_text(&ok).unwrap(), "Quiero agua.");

        let blank = serde_json::json!("   ");
        assert!(matches!(extract_text(&blank), Err(TranslateError::EmptyResponse)));

        let missing = serde_json::Value::Null;
        assert!(matches!(extract_text(&missing), Err(TranslateError::EmptyResponse)));
    }

    #[tokio::test]
    async fn disabled_config_short_circuits() {
        let mut config = make_config(ServiceProvider::Gemini, None);
        config.enabled = false;
        let translator = ApiTranslator::from_config(&config);
        let err = translator.translate(&["Sed".to_string()]).await.unwrap_err();
        assert!(matches!(err, TranslateError::Disabled));
    }

    fn board_labels() -> Vec<String> {
        ["Quiero", "Helado", "Parque"].iter().map(|s| s.to_string()).collect()
    }

    /// Asserts `text` mentions every label, in order.
    fn assert_ordered_labels(text: &str) {
        let positions: Vec<usize> = board_labels()
            .iter()
            .map(|l| text.find(l.as_str()).unwrap_or_else(|| panic!("'{l}' missing")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "labels out of order: {text}");
    }

    async fn single_body(server: &MockServer) -> serde_json::Value {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        serde_json::from_slice(&requests[0].body).unwrap()
    }

    #[tokio::test]
    async fn gemini_request_carries_ordered_labels() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "gm-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [ { "text": " Quiero un helado en el parque. " } ] } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = make_config(ServiceProvider::Gemini, Some("gm-key"));
        config.base_url = server.uri();
        config.model = "test-model".into();
        let sentence = ApiTranslator::from_config(&config)
            .translate(&board_labels())
            .await
            .unwrap();
        assert_eq!(sentence, "Quiero un helado en el parque.");

        let body = single_body(&server).await;
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert_ordered_labels(prompt);
    }

    #[tokio::test]
    async fn openai_request_carries_ordered_labels() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [ { "message": { "content": "Quiero un helado en el parque." } } ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = make_config(ServiceProvider::OpenAiCompatible, Some("sk-test"));
        config.base_url = server.uri();
        config.model = "test-model".into();
        let sentence = ApiTranslator::from_config(&config)
            .translate(&board_labels())
            .await
            .unwrap();
        assert_eq!(sentence, "Quiero un helado en el parque.");

        let body = single_body(&server).await;
        assert_eq!(body["model"], "test-model");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert_ordered_labels(user);
    }

    #[tokio::test]
    async fn error_status_is_a_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let mut config = make_config(ServiceProvider::OpenAiCompatible, None);
        config.base_url = server.uri();
        let err = ApiTranslator::from_config(&config)
            .translate(&board_labels())
            .await
            .unwrap_err();
        match err {
            TranslateError::Request(detail) => assert!(detail.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn translator_is_object_safe() {
        let translator: Box<dyn Translator> =
            Box::new(ApiTranslator::from_config(&TranslationConfig::default()));
        drop(translator);
    }
}
