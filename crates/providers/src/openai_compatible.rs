use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

pub struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAICompatibleProvider {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for OpenAICompatibleProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let api_key = request
            .api_key
            .as_deref()
            .or(self.api_key.as_deref())
            .ok_or(ProviderError::MissingCredential)?;

        let url = self.endpoint();
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        debug!(url = %url, model = %self.model, messages = request.messages.len(), "completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Parse("No choices in response".to_string()))?;

        choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::Parse("Completion has no content".to_string()))
    }

    fn name(&self) -> &str {
        "OpenAI Compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest::new(vec![ChatMessage::user("list tasks")])
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = OpenAICompatibleProvider::new(
            "https://api.openai.com/v1/".to_string(),
            None,
            "gpt-4o-mini".to_string(),
        );
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-default"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "[\"Buy milk\"]"}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAICompatibleProvider::new(
            server.uri(),
            Some("sk-default".to_string()),
            "gpt-4o-mini".to_string(),
        );
        let text = provider.complete(&request()).await.unwrap();
        assert_eq!(text, "[\"Buy milk\"]");
    }

    #[tokio::test]
    async fn test_request_key_overrides_configured_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer sk-caller"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAICompatibleProvider::new(
            server.uri(),
            Some("sk-default".to_string()),
            "gpt-4o-mini".to_string(),
        );
        let req = request().with_api_key(Some("sk-caller".to_string()));
        assert_eq!(provider.complete(&req).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_blank_content_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": ""}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAICompatibleProvider::new(
            server.uri(),
            Some("sk-default".to_string()),
            "gpt-4o-mini".to_string(),
        );
        let result = provider.complete(&request()).await;
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let provider =
            OpenAICompatibleProvider::new("http://localhost:1".to_string(), None, "m".to_string());
        let result = provider.complete(&request()).await;
        assert!(matches!(result, Err(ProviderError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let provider = OpenAICompatibleProvider::new(
            server.uri(),
            Some("sk-wrong".to_string()),
            "gpt-4o-mini".to_string(),
        );
        match provider.complete(&request()).await {
            Err(ProviderError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let provider = OpenAICompatibleProvider::new(
            server.uri(),
            Some("sk".to_string()),
            "gpt-4o-mini".to_string(),
        );
        let result = provider.complete(&request()).await;
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }
}
