use serde::{ Deserialize, Serialize };

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodItem {
    pub name: String,
    pub nutrition: Nutrition,
}

impl FoodItem {
    pub fn new(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            name: name.to_string(),
            nutrition: Nutrition { calories, protein, carbs, fat },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFoodImageInput {
    /// `data:<mime>;base64,<data>`, or empty when only a description is given.
    pub photo_data_uri: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFoodImageOutput {
    pub food_item: FoodItem,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum HealthGoal {
    WeightLoss,
    WeightGain,
    MuscleBuilding,
    OverallHealth,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDietPlanInput {
    pub age: u32,
    pub gender: Gender,
    /// Centimeters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub activity_level: ActivityLevel,
    pub health_goal: HealthGoal,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub food_choices: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub foods_to_avoid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub favorite_foods: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meal_preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snacking_habits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dietary_restrictions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_caloric_intake: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub meal_time: String,
    pub food_items: String,
    pub portion_size: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub micronutrient_focus: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDietPlanOutput {
    pub diet_plan: Vec<Meal>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanExportRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weight_kg: Option<f64>,
    pub diet_plan: Vec<Meal>,
}
