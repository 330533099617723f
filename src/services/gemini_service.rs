use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use serde_json::Value;
use std::{ sync::Arc, time::Duration };

use crate::{
    config::GeminiConfig,
    error::AppError,
    services::generation_client::ModelBackend,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDeclaration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclaration {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: &str, parts: Vec<Part>) -> Self {
        Self {
            role: role.to_string(),
            parts,
        }
    }
}

/// One part of a turn. Gemini sets exactly one payload (text, inline data,
/// function call or response) per part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on thought-summary text, which is never part of the answer.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thought: Option<bool>,
    /// Opaque; must be sent back unchanged with the model turn that carried it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thought_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn inline_data(mime_type: &str, data: String) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
            ..Default::default()
        }
    }

    pub fn function_response(name: &str, response: Value, id: Option<String>) -> Self {
        Self {
            function_response: Some(FunctionResponse {
                name: name.to_string(),
                response,
                id,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct GeminiService {
    api_key: String,
    model: String,
    base_url: String,
    client: Arc<reqwest::Client>,
}

impl GeminiService {
    pub fn new(config: &GeminiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: Arc::new(client),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ModelBackend for GeminiService {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, AppError> {
        tracing::info!("Sending request to Gemini model {}", self.model);

        let response = self.client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send().await
            .map_err(|e| {
                tracing::error!("Gemini API request failed: {}", e);
                AppError::UpstreamCallFailure(format!("Gemini API request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(
                AppError::UpstreamCallFailure(
                    format!("Gemini API request failed: {} - {}", status, error_text)
                )
            );
        }

        let gemini_response: GenerateContentResponse = response
            .json().await
            .map_err(|e| {
                AppError::UpstreamCallFailure(format!("Failed to decode Gemini response: {}", e))
            })?;

        tracing::debug!("Received {} candidate(s) from Gemini", gemini_response.candidates.len());

        Ok(gemini_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::gemini_config;
    use axum::{ extract::Path, http::{ HeaderMap, StatusCode }, routing::post, Json, Router };
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::new("user", vec![Part::text("hello")])],
            tools: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(json!({ "type": "OBJECT" })),
            }),
        }
    }

    #[test]
    fn test_request_serializes_with_gemini_field_names() {
        let mut req = request();
        req.contents[0].parts.push(Part::inline_data("image/png", "aGk=".to_string()));
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["contents"][0]["parts"][0], json!({ "text": "hello" }));
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_response_with_function_call_deserializes() {
        let raw =
            json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "functionCall": { "name": "findFoodItem", "args": { "query": "apple" } } }
                ]},
                "finishReason": "STOP"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let call = response.candidates[0].content.as_ref().unwrap().parts[0]
            .function_call.as_ref()
            .unwrap();

        assert_eq!(call.name, "findFoodItem");
        assert_eq!(call.args["query"], "apple");
    }

    #[test]
    fn test_thought_signature_survives_a_round_trip() {
        let raw = json!({
            "functionCall": { "name": "findFoodItem", "args": { "query": "apple" } },
            "thoughtSignature": "SIG123"
        });
        let part: Part = serde_json::from_value(raw).unwrap();
        assert_eq!(part.thought_signature.as_deref(), Some("SIG123"));

        let echoed = serde_json::to_value(&part).unwrap();
        assert_eq!(echoed["thoughtSignature"], "SIG123");
        assert!(echoed.get("thought").is_none());
    }

    #[tokio::test]
    async fn test_posts_to_model_endpoint_with_api_key_header() {
        let app = Router::new().route(
            "/models/:method",
            post(|Path(method): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(method, "gemini-test:generateContent");
                assert_eq!(headers["x-goog-api-key"], "test-key");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
                Json(
                    json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": "{}" }] } }]
                })
                )
            })
        );

        let mut config = gemini_config();
        config.base_url = serve(app).await;
        let service = GeminiService::new(&config).unwrap();

        let response = service.generate_content(&request()).await.unwrap();
        let part = &response.candidates[0].content.as_ref().unwrap().parts[0];
        assert_eq!(part.text.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_failure() {
        let app = Router::new().route(
            "/models/:method",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exhausted") })
        );

        let mut config = gemini_config();
        config.base_url = serve(app).await;
        let service = GeminiService::new(&config).unwrap();

        let err = service.generate_content(&request()).await.unwrap_err();
        match err {
            AppError::UpstreamCallFailure(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("quota exhausted"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out_as_upstream_failure() {
        let app = Router::new().route(
            "/models/:method",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "candidates": [] }))
            })
        );

        let mut config = gemini_config();
        config.base_url = serve(app).await;
        config.timeout_secs = 1;
        let service = GeminiService::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = service.generate_content(&request()).await.unwrap_err();

        assert!(matches!(err, AppError::UpstreamCallFailure(_)), "got {:?}", err);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream_failure() {
        let mut config = gemini_config();
        config.base_url = "http://127.0.0.1:9".to_string();
        let service = GeminiService::new(&config).unwrap();

        let err = service.generate_content(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamCallFailure(_)));
    }
}
