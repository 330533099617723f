use async_trait::async_trait;
use base64::{ engine::general_purpose, Engine as _ };
use serde::de::DeserializeOwned;
use serde_json::{ json, Value };
use std::sync::Arc;

use crate::{
    error::{ AppError, SchemaViolation },
    schema::{ self, Schema },
    services::{
        gemini_service::{
            Content,
            FunctionCall,
            GenerateContentRequest,
            GenerateContentResponse,
            GenerationConfig,
            Part,
            ToolDeclaration,
        },
        prompt_renderer::{ PromptPart, RenderedPrompt },
        tools::{ self, Tool },
    },
};

/// Transport to the generative model.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, AppError>;
}

/// Runs one structured generation: prompt in, schema-validated record out.
///
/// The model may call the offered tools before answering; each tool round
/// re-sends the conversation with the tool results appended. A call is made
/// exactly once per round and nothing is retried.
pub struct GenerationClient {
    backend: Arc<dyn ModelBackend>,
    max_tool_rounds: usize,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn ModelBackend>, max_tool_rounds: usize) -> Self {
        Self {
            backend,
            max_tool_rounds,
        }
    }

    pub async fn run<T: DeserializeOwned>(
        &self,
        prompt: &RenderedPrompt,
        output_schema: &Schema,
        tools: &[Arc<dyn Tool>]
    ) -> Result<T, AppError> {
        let declarations = if tools.is_empty() {
            None
        } else {
            Some(
                vec![ToolDeclaration {
                    function_declarations: tools
                        .iter()
                        .map(|tool| tools::declaration(tool.as_ref()))
                        .collect(),
                }]
            )
        };

        // Gemini rejects JSON mode combined with function calling, so with tools
        // the schema travels as an instruction instead.
        let generation_config = if tools.is_empty() {
            Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(output_schema.to_gemini_schema()),
            })
        } else {
            None
        };

        let mut contents = vec![Content::new("user", user_parts(prompt, output_schema, !tools.is_empty()))];

        for round in 0..=self.max_tool_rounds {
            let request = GenerateContentRequest {
                contents: contents.clone(),
                tools: declarations.clone(),
                generation_config: generation_config.clone(),
            };

            let response = self.backend.generate_content(&request).await?;
            let content = first_content(response)?;

            let calls: Vec<FunctionCall> = content.parts
                .iter()
                .filter_map(|part| part.function_call.clone())
                .collect();

            if calls.is_empty() {
                let reply: String = content.parts
                    .iter()
                    .filter(|part| part.thought != Some(true))
                    .filter_map(|part| part.text.as_deref())
                    .collect();
                return parse_reply(&reply, output_schema);
            }

            if round == self.max_tool_rounds {
                break;
            }

            let mut responses = Vec::with_capacity(calls.len());
            for call in &calls {
                let result = invoke_tool(tools, call).await;
                responses.push(Part::function_response(&call.name, json!({ "result": result }), call.id.clone()));
            }

            contents.push(Content::new("model", content.parts));
            contents.push(Content::new("user", responses));
        }

        tracing::warn!("Model still requesting tools after {} rounds", self.max_tool_rounds);

        Err(
            AppError::EmptyGeneration(
                format!("model did not produce an answer within {} tool rounds", self.max_tool_rounds)
            )
        )
    }
}

fn user_parts(prompt: &RenderedPrompt, output_schema: &Schema, with_tools: bool) -> Vec<Part> {
    let mut parts: Vec<Part> = prompt.parts
        .iter()
        .map(|part| {
            match part {
                PromptPart::Text(text) => Part::text(text.clone()),
                PromptPart::Media { mime_type, data } =>
                    Part::inline_data(mime_type, general_purpose::STANDARD.encode(data)),
            }
        })
        .collect();

    if with_tools {
        parts.push(
            Part::text(
                format!(
                    "\n\nOutput should be in JSON format and conform to the following schema:\n\n```\n{}\n```\n",
                    output_schema.to_gemini_schema()
                )
            )
        );
    }

    parts
}

fn first_content(response: GenerateContentResponse) -> Result<Content, AppError> {
    let block_reason = response.prompt_feedback.and_then(|feedback| feedback.block_reason);

    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        match block_reason {
            Some(reason) => AppError::EmptyGeneration(format!("prompt blocked: {}", reason)),
            None => AppError::EmptyGeneration("no candidates in model response".to_string()),
        }
    })?;

    match candidate.content {
        Some(content) if !content.parts.is_empty() => Ok(content),
        _ =>
            Err(
                AppError::EmptyGeneration(
                    format!(
                        "candidate has no content (finish reason: {})",
                        candidate.finish_reason.as_deref().unwrap_or("unknown")
                    )
                )
            ),
    }
}

/// Failures are logged and reported to the model as an empty result list.
async fn invoke_tool(tools: &[Arc<dyn Tool>], call: &FunctionCall) -> Value {
    let Some(tool) = tools.iter().find(|tool| tool.name() == call.name) else {
        tracing::warn!("Model called unknown tool {}", call.name);
        return Value::Array(vec![]);
    };

    tracing::info!("Executing tool: {}", call.name);

    match tools::invoke(tool.as_ref(), &call.args).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Tool {} failed, reporting empty result: {:#}", call.name, e);
            Value::Array(vec![])
        }
    }
}

fn parse_reply<T: DeserializeOwned>(reply: &str, output_schema: &Schema) -> Result<T, AppError> {
    if reply.trim().is_empty() {
        return Err(AppError::EmptyGeneration("model returned an empty reply".to_string()));
    }

    let json_str = extract_json(reply);

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        tracing::warn!("Failed to parse model reply as JSON: {}. Reply was: {}", e, reply);
        SchemaViolation::new("$", "JSON object", "non-JSON text")
    })?;

    if value.is_null() {
        return Err(AppError::EmptyGeneration("model returned a null answer".to_string()));
    }

    Ok(schema::validate_as(output_schema, &value)?)
}

fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}
