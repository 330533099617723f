use async_trait::async_trait;
use serde_json::{ json, Value };
use std::{ collections::VecDeque, sync::{ Arc, Mutex } };

use crate::{
    config::{
        Config,
        Environment,
        ExportConfig,
        FoodLookupBackend,
        FoodLookupConfig,
        GeminiConfig,
        SecurityConfig,
        ServerConfig,
    },
    error::AppError,
    services::{
        gemini_service::{ GenerateContentRequest, GenerateContentResponse },
        generation_client::ModelBackend,
    },
};

/// Replays canned model responses in order and records every request it sees.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<GenerateContentResponse, AppError>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<GenerateContentResponse, AppError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedBackend ran out of replies"))
    }
}

fn model_reply(parts: Value) -> GenerateContentResponse {
    serde_json
        ::from_value(
            json!({
            "candidates": [{ "content": { "role": "model", "parts": parts }, "finishReason": "STOP" }]
        })
        )
        .unwrap()
}

pub fn text_reply(text: &str) -> GenerateContentResponse {
    model_reply(json!([{ "text": text }]))
}

pub fn function_call_reply(name: &str, args: Value) -> GenerateContentResponse {
    model_reply(json!([{ "functionCall": { "name": name, "args": args } }]))
}

pub fn gemini_config() -> GeminiConfig {
    GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 5,
        max_tool_rounds: 4,
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            port: 4000,
            host: "127.0.0.1".to_string(),
            environment: Environment::Development,
        },
        gemini: gemini_config(),
        food_lookup: FoodLookupConfig {
            backend: FoodLookupBackend::Stub,
            ninja_api_key: None,
        },
        export: ExportConfig { rows_per_page: 20 },
        security: SecurityConfig {
            cors_enabled: false,
            allowed_origins: vec![],
        },
    }
}
