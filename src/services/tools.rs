use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    schema::{ self, definitions, Schema },
    services::{ food_lookup::FoodLookup, gemini_service::FunctionDeclaration },
};

/// A capability the model may call mid-generation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Schema;
    fn output_schema(&self) -> Schema;

    async fn call(&self, input: Value) -> Result<Value>;
}

/// Validates `args`, runs the tool, and validates what it returns.
pub async fn invoke(tool: &dyn Tool, args: &Value) -> Result<Value> {
    let input = schema::validate(&tool.input_schema(), args)?;
    let output = tool.call(input).await?;
    Ok(schema::validate(&tool.output_schema(), &output)?)
}

pub fn declaration(tool: &dyn Tool) -> FunctionDeclaration {
    FunctionDeclaration {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        parameters: tool.input_schema().to_gemini_schema(),
    }
}

pub struct FindFoodItemTool {
    lookup: Arc<dyn FoodLookup>,
}

impl FindFoodItemTool {
    pub fn new(lookup: Arc<dyn FoodLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for FindFoodItemTool {
    fn name(&self) -> &'static str {
        "findFoodItem"
    }

    fn description(&self) -> &'static str {
        "Searches a food database for items matching a given query."
    }

    fn input_schema(&self) -> Schema {
        definitions::find_food_item_input()
    }

    fn output_schema(&self) -> Schema {
        definitions::find_food_item_output()
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let query = input["query"].as_str().unwrap_or_default();
        let items = self.lookup.search(query).await?;

        tracing::debug!("findFoodItem({}) returned {} item(s)", query, items.len());

        Ok(serde_json::to_value(items)?)
    }
}
