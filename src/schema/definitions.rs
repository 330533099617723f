use super::{ Field, NumberRule, Schema, StringRule };

pub const GENDERS: &[&str] = &["male", "female"];

pub const ACTIVITY_LEVELS: &[&str] = &[
    "sedentary",
    "lightlyActive",
    "moderatelyActive",
    "veryActive",
    "extraActive",
];

pub const HEALTH_GOALS: &[&str] = &["weightLoss", "weightGain", "muscleBuilding", "overallHealth"];

pub fn nutrition() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "calories",
                "The number of calories in the food item.",
                Schema::Number(NumberRule::NON_NEGATIVE)
            ),
            Field::required(
                "protein",
                "The amount of protein in grams.",
                Schema::Number(NumberRule::NON_NEGATIVE)
            ),
            Field::required(
                "carbs",
                "The amount of carbohydrates in grams.",
                Schema::Number(NumberRule::NON_NEGATIVE)
            ),
            Field::required(
                "fat",
                "The amount of fat in grams.",
                Schema::Number(NumberRule::NON_NEGATIVE)
            )
        ]
    )
}

pub fn food_item() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "name",
                "The name of the identified food item.",
                Schema::String(StringRule::NonEmpty)
            ),
            Field::required(
                "nutrition",
                "The nutritional information for the food item.",
                nutrition()
            )
        ]
    )
}

pub fn analyze_food_image_input() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "photoDataUri",
                "A photo of a food item, as a data URI with a MIME type and Base64 encoding: 'data:<mimetype>;base64,<encoded_data>'. Empty when only a description is given.",
                Schema::String(StringRule::DataUri)
            ),
            Field::optional(
                "description",
                "Optional description of the food item.",
                Schema::string()
            )
        ]
    )
}

pub fn analyze_food_image_output() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "foodItem",
                "The identified food item and its nutritional information.",
                food_item()
            )
        ]
    )
}

pub fn find_food_item_input() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "query",
                "The search query (e.g., \"apple\", \"chicken breast\").",
                Schema::String(StringRule::NonEmpty)
            )
        ]
    )
}

pub fn find_food_item_output() -> Schema {
    Schema::array(food_item())
}

pub fn generate_diet_plan_input() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "age",
                "The age of the user.",
                Schema::Integer(NumberRule::POSITIVE.at_most(u32::MAX as f64))
            ),
            Field::required("gender", "The gender of the user.", Schema::Enum(GENDERS)),
            Field::required(
                "height",
                "The height of the user in centimeters.",
                Schema::Number(NumberRule::POSITIVE)
            ),
            Field::required(
                "weight",
                "The weight of the user in kilograms.",
                Schema::Number(NumberRule::POSITIVE)
            ),
            Field::required(
                "activityLevel",
                "The activity level of the user.",
                Schema::Enum(ACTIVITY_LEVELS)
            ),
            Field::optional(
                "foodChoices",
                "The food choices of the user (e.g., vegetarian, vegan, non-vegetarian).",
                Schema::string()
            ),
            Field::optional("foodsToAvoid", "Foods that the user wants to avoid.", Schema::string()),
            Field::optional("favoriteFoods", "Favorite foods of the user.", Schema::string()),
            Field::required(
                "healthGoal",
                "The health goal of the user.",
                Schema::Enum(HEALTH_GOALS)
            ),
            Field::optional(
                "mealPreferences",
                "Meal preferences like number of meals per day and portion sizes.",
                Schema::string()
            ),
            Field::optional("snackingHabits", "Snacking habits of the user.", Schema::string()),
            Field::optional(
                "dietaryRestrictions",
                "Dietary restrictions or allergies of the user.",
                Schema::string()
            ),
            Field::optional(
                "targetCaloricIntake",
                "Target daily caloric intake for the user.",
                Schema::Number(NumberRule::POSITIVE)
            )
        ]
    )
}

pub fn meal() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "mealTime",
                "Meal time (e.g., Breakfast, Lunch, Dinner, Snack).",
                Schema::String(StringRule::NonEmpty)
            ),
            Field::required(
                "foodItems",
                "Food items for this meal (e.g., Oats, Chicken, Vegetables).",
                Schema::String(StringRule::NonEmpty)
            ),
            Field::required(
                "portionSize",
                "Portion size (e.g., 1 cup, 150 grams).",
                Schema::string()
            ),
            Field::required(
                "calories",
                "Calories for this meal.",
                Schema::Number(NumberRule::NON_NEGATIVE)
            ),
            Field::required(
                "protein",
                "Protein in grams.",
                Schema::Number(NumberRule::NON_NEGATIVE)
            ),
            Field::required(
                "carbs",
                "Carbohydrates in grams.",
                Schema::Number(NumberRule::NON_NEGATIVE)
            ),
            Field::required("fat", "Fat in grams.", Schema::Number(NumberRule::NON_NEGATIVE)),
            Field::optional(
                "micronutrientFocus",
                "Micronutrient focus (e.g., High in Protein, Rich in Fiber).",
                Schema::string()
            )
        ]
    )
}

pub fn generate_diet_plan_output() -> Schema {
    Schema::Object(
        vec![
            Field::required(
                "dietPlan",
                "The personalized diet plan as an ordered list of meals.",
                Schema::array(meal())
            )
        ]
    )
}

pub fn diet_plan_export_request() -> Schema {
    Schema::Object(
        vec![
            Field::optional("title", "Document title.", Schema::string()),
            Field::optional(
                "weightKg",
                "Body weight used for the recommended protein line.",
                Schema::Number(NumberRule::POSITIVE)
            ),
            Field::required("dietPlan", "Meals to export.", Schema::array(meal()))
        ]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ ActivityLevel, Gender, HealthGoal };

    fn serde_names<T: serde::Serialize>(values: &[T]) -> Vec<String> {
        values
            .iter()
            .map(|v| serde_json::to_value(v).unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_enum_domains_match_record_types() {
        assert_eq!(serde_names(&[Gender::Male, Gender::Female]), GENDERS);
        assert_eq!(
            serde_names(
                &[
                    ActivityLevel::Sedentary,
                    ActivityLevel::LightlyActive,
                    ActivityLevel::ModeratelyActive,
                    ActivityLevel::VeryActive,
                    ActivityLevel::ExtraActive,
                ]
            ),
            ACTIVITY_LEVELS
        );
        assert_eq!(
            serde_names(
                &[
                    HealthGoal::WeightLoss,
                    HealthGoal::WeightGain,
                    HealthGoal::MuscleBuilding,
                    HealthGoal::OverallHealth,
                ]
            ),
            HEALTH_GOALS
        );
    }

    #[test]
    fn test_activity_levels_do_not_include_legacy_highly_active() {
        assert!(!ACTIVITY_LEVELS.contains(&"highlyActive"));
    }
}
