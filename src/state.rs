use anyhow::{ Context, Result };
use std::sync::Arc;

use crate::{
    config::{ Config, FoodLookupBackend },
    flows::{ AnalyzeFoodImageFlow, GenerateDietPlanFlow },
    services::{
        food_lookup::{ FoodLookup, StubFoodLookup },
        generation_client::{ GenerationClient, ModelBackend },
        ninja_service::NinjaService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub food_lookup: Arc<dyn FoodLookup>,
    pub analyze_food_image: Arc<AnalyzeFoodImageFlow>,
    pub generate_diet_plan: Arc<GenerateDietPlanFlow>,
}

impl AppState {
    /// Wires one shared generation client into both flows.
    pub fn new(config: Config, backend: Arc<dyn ModelBackend>, food_lookup: Arc<dyn FoodLookup>) -> Self {
        let client = Arc::new(GenerationClient::new(backend, config.gemini.max_tool_rounds));

        Self {
            analyze_food_image: Arc::new(
                AnalyzeFoodImageFlow::new(client.clone(), food_lookup.clone())
            ),
            generate_diet_plan: Arc::new(GenerateDietPlanFlow::new(client)),
            food_lookup,
            config,
        }
    }
}

pub fn setup_food_lookup(config: &Config) -> Result<Arc<dyn FoodLookup>> {
    let lookup: Arc<dyn FoodLookup> = match config.food_lookup.backend {
        FoodLookupBackend::Stub => Arc::new(StubFoodLookup::default()),
        FoodLookupBackend::Ninja => {
            let api_key = config.food_lookup.ninja_api_key
                .clone()
                .context("NINJA_NUTRITION_API_KEY must be set for the ninja backend")?;
            Arc::new(NinjaService::new(api_key))
        }
    };

    tracing::info!("Initialized {} food lookup", lookup.backend_name());

    Ok(lookup)
}
