use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{ AppError, Result },
    models::{ GenerateDietPlanInput, GenerateDietPlanOutput },
    schema::{ self, definitions },
    services::{ generation_client::GenerationClient, prompt_renderer::PromptTemplate },
};

const PROMPT: PromptTemplate = PromptTemplate::new(
    "generateDietPlanPrompt",
    r#"You are an expert nutritionist. You will be given information about a user, including their age, gender, height, weight, activity level, dietary preferences, and health goals.

You will use this information to generate a detailed and personalized diet plan for the user. The diet plan should be safe, healthy, effective, easy to follow, and sustainable in the long term.

Return the plan as a list of meals in the order they are eaten. Each meal has:
- mealTime (e.g., Breakfast, Lunch, Dinner, Snack)
- foodItems (e.g., Oats, Chicken, Vegetables, etc.)
- portionSize (e.g., 1 cup, 150 grams, etc.)
- calories (calories for the meal)
- protein, carbs and fat in grams
- micronutrientFocus (e.g., High in Protein, Low in Carbs, Rich in Fiber)

Here is the user's information:
Age: {{{age}}}
Gender: {{{gender}}}
Height: {{{height}}} cm
Weight: {{{weight}}} kg
Activity Level: {{{activityLevel}}}
Food Choices: {{{foodChoices}}}
Foods to Avoid: {{{foodsToAvoid}}}
Favorite Foods: {{{favoriteFoods}}}
Health Goal: {{{healthGoal}}}
Meal Preferences: {{{mealPreferences}}}
Snacking Habits: {{{snackingHabits}}}
Dietary Restrictions: {{{dietaryRestrictions}}}
Target Caloric Intake: {{{targetCaloricIntake}}}"#
);

/// Builds a personalized meal plan from biometrics and preferences.
pub struct GenerateDietPlanFlow {
    client: Arc<GenerationClient>,
}

impl GenerateDietPlanFlow {
    pub fn new(client: Arc<GenerationClient>) -> Self {
        Self { client }
    }

    pub async fn run(&self, input: &Value) -> Result<GenerateDietPlanOutput> {
        let flow_id = Uuid::new_v4();
        let span = tracing::info_span!("flow", flow_name = "generateDietPlan", %flow_id);

        async move {
            let input = schema::validate(&definitions::generate_diet_plan_input(), input)?;
            let profile: GenerateDietPlanInput = serde_json
                ::from_value(input.clone())
                .map_err(|e| AppError::InternalError(e.into()))?;

            tracing::info!(
                "Planning for {:?} with goal {:?} at {:?}",
                profile.gender,
                profile.health_goal,
                profile.activity_level
            );

            let prompt = PROMPT.render(&input)?;

            tracing::info!("Rendered {}", PROMPT.name);
            tracing::debug!("Prompt text: {}", prompt.text());

            let output: GenerateDietPlanOutput = self.client.run(
                &prompt,
                &definitions::generate_diet_plan_output(),
                &[]
            ).await?;

            tracing::info!("Generated diet plan with {} meal(s)", output.diet_plan.len());

            Ok(output)
        }
            .instrument(span).await
    }

}
