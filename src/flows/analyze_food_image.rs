use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{ AppError, Result },
    models::{ AnalyzeFoodImageInput, AnalyzeFoodImageOutput },
    schema::{ self, definitions },
    services::{
        food_lookup::FoodLookup,
        generation_client::GenerationClient,
        prompt_renderer::PromptTemplate,
        tools::{ FindFoodItemTool, Tool },
    },
};

const PROMPT: PromptTemplate = PromptTemplate::new(
    "analyzeFoodImagePrompt",
    r#"You are an expert nutritionist. You will be given a photo of a food item and an optional description.

You will use this information to identify the food item and estimate its macronutrient content (calories, protein, carbs, and fat).

Use the findFoodItem tool to find the nutritional content for the food. If you cannot identify the food item, make your best guess.

Description: {{{description}}}
Photo: {{media url=photoDataUri}}"#
);

/// Identifies a food from a photo and/or description and estimates its macros.
pub struct AnalyzeFoodImageFlow {
    client: Arc<GenerationClient>,
    tools: Vec<Arc<dyn Tool>>,
}

impl AnalyzeFoodImageFlow {
    pub fn new(client: Arc<GenerationClient>, lookup: Arc<dyn FoodLookup>) -> Self {
        Self {
            client,
            tools: vec![Arc::new(FindFoodItemTool::new(lookup))],
        }
    }

    pub async fn run(&self, input: &Value) -> Result<AnalyzeFoodImageOutput> {
        let flow_id = Uuid::new_v4();
        let span = tracing::info_span!("flow", flow_name = "analyzeFoodImage", %flow_id);

        async move {
            let input = schema::validate(&definitions::analyze_food_image_input(), input)?;

            let has_photo = input["photoDataUri"].as_str().is_some_and(|uri| !uri.is_empty());
            let has_description = input["description"]
                .as_str()
                .is_some_and(|text| !text.trim().is_empty());
            if !has_photo && !has_description {
                tracing::info!("No photo or description supplied, model will make a best guess");
            }

            let prompt = PROMPT.render(&input)?;
            tracing::info!(
                "Rendered {} with {} image attachment(s)",
                PROMPT.name,
                prompt.media_count()
            );

            let output: AnalyzeFoodImageOutput = self.client.run(
                &prompt,
                &definitions::analyze_food_image_output(),
                &self.tools
            ).await?;

            tracing::info!("Identified food item: {}", output.food_item.name);

            Ok(output)
        }
            .instrument(span).await
    }

    pub async fn analyze(&self, input: &AnalyzeFoodImageInput) -> Result<AnalyzeFoodImageOutput> {
        let value = serde_json::to_value(input).map_err(|e| AppError::InternalError(e.into()))?;
        self.run(&value).await
    }
}
