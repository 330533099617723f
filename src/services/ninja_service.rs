use anyhow::{ Context, Result };
use async_trait::async_trait;
use reqwest::Client;
use serde::{ Deserialize, Serialize };
use serde_json::Value;
use std::sync::Arc;

use crate::{ models::FoodItem, services::food_lookup::FoodLookup };

const DEFAULT_BASE_URL: &str = "https://api.api-ninjas.com/v1";

fn parse_flexible_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        // Premium-only fields come back as text.
        Value::String(s) => s.parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn deserialize_flexible_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where D: serde::Deserializer<'de>
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_flexible_number(&value))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NinjaNutritionItem {
    pub name: String,
    #[serde(deserialize_with = "deserialize_flexible_number", default)]
    pub calories: f64,
    #[serde(deserialize_with = "deserialize_flexible_number", default)]
    pub protein_g: f64,
    #[serde(deserialize_with = "deserialize_flexible_number", default)]
    pub carbohydrates_total_g: f64,
    #[serde(deserialize_with = "deserialize_flexible_number", default)]
    pub fat_total_g: f64,
}

impl From<NinjaNutritionItem> for FoodItem {
    fn from(item: NinjaNutritionItem) -> Self {
        FoodItem::new(
            &item.name,
            item.calories.max(0.0),
            item.protein_g.max(0.0),
            item.carbohydrates_total_g.max(0.0),
            item.fat_total_g.max(0.0)
        )
    }
}

/// API Ninjas nutrition search as a [`FoodLookup`] backend.
#[derive(Clone)]
pub struct NinjaService {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl NinjaService {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_nutrition(&self, query: &str) -> Result<Vec<NinjaNutritionItem>> {
        let url = format!("{}/nutrition", self.base_url);

        tracing::debug!("Calling Ninja API with query: {}", query);

        let response = self.client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[("query", query)])
            .send().await
            .context("Failed to send request to Ninja API")?;

        let status = response.status();
        tracing::debug!("Ninja API response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ninja API error: {} - {}", status, error_text);
            anyhow::bail!("Ninja API error: {} - {}", status, error_text);
        }

        let response_text = response.text().await.context("Failed to get response text")?;

        let result: Vec<NinjaNutritionItem> = serde_json
            ::from_str(&response_text)
            .context("Failed to parse Ninja API response")?;

        tracing::debug!("Successfully parsed {} nutrition items", result.len());

        Ok(result)
    }
}

#[async_trait]
impl FoodLookup for NinjaService {
    async fn search(&self, query: &str) -> Result<Vec<FoodItem>> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }

        let items = self.get_nutrition(query).await?;
        Ok(items.into_iter().map(FoodItem::from).collect())
    }

    fn backend_name(&self) -> &'static str {
        "ninja"
    }
}
