use crate::domain::model::CompletionRequest;
use crate::domain::ports::ChatProvider;
use crate::utils::error::{ChatbotError, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// 供應商用來表示模型已下架或不存在的錯誤代碼
const MODEL_UNAVAILABLE_CODES: &[&str] = &["model_decommissioned", "model_not_found"];

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> crate::utils::error::Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ChatbotError::ConfigError {
                message: "Groq API key is empty".to_string(),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("medibot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn classify_failure(model: &str, status: StatusCode, body: &str) -> ProviderError {
        let error = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .unwrap_or_default();
        let message = error.message.unwrap_or_else(|| body.trim().to_string());

        if let Some(code) = error.code.as_deref() {
            if MODEL_UNAVAILABLE_CODES.contains(&code) {
                return ProviderError::ModelUnavailable {
                    model: model.to_string(),
                    message,
                };
            }
        }

        match status {
            StatusCode::UNAUTHORIZED => ProviderError::Unauthorized(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
            _ => ProviderError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl ChatProvider for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        tracing::debug!("Sending chat completion to model {}", request.model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::Transport)?;

        let status = response.status();
        tracing::debug!("Provider response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_failure(&request.model, status, &body));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse("no completion content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ChatMessage;
    use httpmock::prelude::*;

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hello")],
            max_tokens: 400,
            temperature: 0.2,
        }
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("Authorization", "Bearer test-key")
                .json_body_partial(r#"{"model": "llama-a", "max_tokens": 400}"#);
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  Stay hydrated.  "}}]
            }));
        });

        let client = GroqClient::new("test-key", server.base_url()).unwrap();
        let text = client.complete(&request("llama-a")).await.unwrap();

        api_mock.assert();
        assert_eq!(text, "Stay hydrated.");
    }

    #[tokio::test]
    async fn test_decommissioned_model_is_typed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(400).json_body(serde_json::json!({
                "error": {
                    "message": "The model `llama-old` has been decommissioned and is no longer supported.",
                    "type": "invalid_request_error",
                    "code": "model_decommissioned"
                }
            }));
        });

        let client = GroqClient::new("test-key", server.base_url()).unwrap();
        let err = client.complete(&request("llama-old")).await.unwrap_err();

        match err {
            ProviderError::ModelUnavailable { model, message } => {
                assert_eq!(model, "llama-old");
                assert!(message.contains("decommissioned"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decommission_text_without_code_is_not_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(400)
                .body("model_decommissioned, but not as a structured code");
        });

        let client = GroqClient::new("test-key", server.base_url()).unwrap();
        let err = client.complete(&request("llama-a")).await.unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_status_classification() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).json_body_partial(r#"{"model": "auth"}"#);
            then.status(401).json_body(serde_json::json!({
                "error": {"message": "Invalid API Key", "code": "invalid_api_key"}
            }));
        });
        server.mock(|when, then| {
            when.method(POST).json_body_partial(r#"{"model": "busy"}"#);
            then.status(429).body("slow down");
        });
        server.mock(|when, then| {
            when.method(POST).json_body_partial(r#"{"model": "broken"}"#);
            then.status(503).body("upstream unavailable");
        });

        let client = GroqClient::new("test-key", server.base_url()).unwrap();

        let err = client.complete(&request("auth")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unauthorized(ref m) if m == "Invalid API Key"));

        let err = client.complete(&request("busy")).await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited(_)));

        let err = client.complete(&request("broken")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(serde_json::json!({"choices": []}));
        });

        let client = GroqClient::new("test-key", server.base_url()).unwrap();
        let err = client.complete(&request("llama-a")).await.unwrap_err();

        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // 9 號埠 (discard) 通常沒有服務在聽
        let client = GroqClient::new("test-key", "http://127.0.0.1:9").unwrap();
        let err = client.complete(&request("llama-a")).await.unwrap_err();

        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(GroqClient::new("  ", DEFAULT_BASE_URL).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = GroqClient::new("k", "http://localhost:1234/v1/").unwrap();
        assert_eq!(client.completions_url(), "http://localhost:1234/v1/chat/completions");
    }
}
