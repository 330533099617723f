use anyhow::Result;
use async_trait::async_trait;

use crate::models::FoodItem;

/// Food search backing the `findFoodItem` tool.
///
/// Implementations must be side-effect free and return an empty list when
/// nothing matches.
#[async_trait]
pub trait FoodLookup: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<FoodItem>>;

    fn backend_name(&self) -> &'static str;
}

/// Placeholder for a real food index.
///
/// Filters its fixed catalog by name, but hands back the whole catalog when
/// nothing matches, so callers always receive the two reference records.
pub struct StubFoodLookup {
    catalog: Vec<FoodItem>,
}

impl Default for StubFoodLookup {
    fn default() -> Self {
        Self {
            catalog: vec![
                FoodItem::new("Apple", 95.0, 0.3, 25.0, 0.3),
                FoodItem::new("Chicken Breast", 165.0, 31.0, 0.0, 3.6)
            ],
        }
    }
}

#[async_trait]
impl FoodLookup for StubFoodLookup {
    async fn search(&self, query: &str) -> Result<Vec<FoodItem>> {
        let needle = query.trim().to_lowercase();

        let matches: Vec<FoodItem> = self.catalog
            .iter()
            .filter(|item| {
                let name = item.name.to_lowercase();
                !needle.is_empty() && (name.contains(&needle) || needle.contains(&name))
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            tracing::debug!("Stub lookup has no match for '{}', returning full catalog", query);
            return Ok(self.catalog.clone());
        }

        Ok(matches)
    }

    fn backend_name(&self) -> &'static str {
        "stub"
    }
}
