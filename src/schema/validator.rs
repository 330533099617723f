use serde::de::DeserializeOwned;
use serde_json::{ Map, Value };

use super::{ NumberRule, Schema, StringRule };
use crate::{ data_uri::DataUri, error::SchemaViolation };

const ROOT: &str = "$";

/// Checks `value` against `schema` and returns the normalized payload.
///
/// Unknown object keys are dropped and an explicit `null` on an optional field
/// is treated as absent. Absent optional fields stay absent.
pub fn validate(schema: &Schema, value: &Value) -> Result<Value, SchemaViolation> {
    check(schema, value, ROOT)
}

/// [`validate`], then deserialize the normalized payload into `T`.
pub fn validate_as<T: DeserializeOwned>(
    schema: &Schema,
    value: &Value
) -> Result<T, SchemaViolation> {
    let normalized = validate(schema, value)?;

    serde_json
        ::from_value(normalized)
        .map_err(|e| SchemaViolation::new(ROOT, "payload matching the record type", e.to_string()))
}

fn check(schema: &Schema, value: &Value, path: &str) -> Result<Value, SchemaViolation> {
    match schema {
        Schema::Object(fields) => {
            let map = value.as_object().ok_or_else(|| mismatch(schema, value, path))?;
            let mut normalized = Map::new();

            for field in fields {
                let field_path = child(path, field.name);
                match map.get(field.name) {
                    None | Some(Value::Null) if !field.required => {}
                    None => {
                        return Err(
                            SchemaViolation::new(field_path, field.schema.describe(), "missing")
                        );
                    }
                    Some(field_value) => {
                        let checked = check(&field.schema, field_value, &field_path)?;
                        normalized.insert(field.name.to_string(), checked);
                    }
                }
            }

            Ok(Value::Object(normalized))
        }
        Schema::Array(items) => {
            let elements = value.as_array().ok_or_else(|| mismatch(schema, value, path))?;

            elements
                .iter()
                .enumerate()
                .map(|(i, element)| check(items, element, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Schema::String(rule) => {
            let text = value.as_str().ok_or_else(|| mismatch(schema, value, path))?;

            match rule {
                StringRule::Any => {}
                StringRule::NonEmpty => {
                    if text.trim().is_empty() {
                        return Err(mismatch(schema, value, path));
                    }
                }
                StringRule::DataUri => {
                    if !text.is_empty() {
                        DataUri::parse(text).map_err(|e|
                            SchemaViolation::new(path, schema.describe(), e.to_string())
                        )?;
                    }
                }
            }

            Ok(value.clone())
        }
        Schema::Number(rule) => {
            let number = value.as_f64().ok_or_else(|| mismatch(schema, value, path))?;
            check_bounds(schema, rule, number, value, path)?;
            Ok(value.clone())
        }
        Schema::Integer(rule) => {
            let number = value.as_f64().ok_or_else(|| mismatch(schema, value, path))?;
            if number.fract() != 0.0 {
                return Err(mismatch(schema, value, path));
            }
            check_bounds(schema, rule, number, value, path)?;

            // 30.0 is accepted and normalized to 30.
            Ok(match value.as_i64() {
                Some(n) => Value::from(n),
                None => Value::from(number as i64),
            })
        }
        Schema::Enum(allowed) => {
            let text = value.as_str().ok_or_else(|| mismatch(schema, value, path))?;
            if !allowed.contains(&text) {
                return Err(SchemaViolation::new(path, schema.describe(), format!("\"{}\"", text)));
            }
            Ok(value.clone())
        }
    }
}

fn check_bounds(
    schema: &Schema,
    rule: &NumberRule,
    number: f64,
    value: &Value,
    path: &str
) -> Result<(), SchemaViolation> {
    let below_minimum = rule.minimum.is_some_and(|min| number < min);
    let at_or_below_exclusive = rule.exclusive_minimum.is_some_and(|min| number <= min);
    let above_maximum = rule.maximum.is_some_and(|max| number > max);

    if !number.is_finite() || below_minimum || at_or_below_exclusive || above_maximum {
        return Err(mismatch(schema, value, path));
    }
    Ok(())
}

fn child(path: &str, name: &str) -> String {
    if path == ROOT { name.to_string() } else { format!("{}.{}", path, name) }
}

fn mismatch(schema: &Schema, value: &Value, path: &str) -> SchemaViolation {
    SchemaViolation::new(path, schema.describe(), shape_of(value))
}

fn shape_of(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) if s.trim().is_empty() => "empty string".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ GenerateDietPlanInput, GenerateDietPlanOutput, Gender };
    use crate::schema::definitions;
    use serde_json::json;

    fn diet_input() -> Value {
        json!({
            "age": 30,
            "gender": "female",
            "height": 168,
            "weight": 62.5,
            "activityLevel": "moderatelyActive",
            "healthGoal": "overallHealth",
        })
    }

    #[test]
    fn test_missing_required_field_reports_path() {
        let mut input = diet_input();
        input.as_object_mut().unwrap().remove("age");

        let err = validate(&definitions::generate_diet_plan_input(), &input).unwrap_err();
        assert_eq!(err, SchemaViolation::new("age", "integer > 0 and <= 4294967295", "missing"));
    }

    #[test]
    fn test_integer_too_large_for_record_names_the_field() {
        let mut input = diet_input();
        input["age"] = json!(5e9);

        let err = validate_as::<GenerateDietPlanInput>(
            &definitions::generate_diet_plan_input(),
            &input
        ).unwrap_err();
        assert_eq!(err.path, "age");
        assert!(err.expected.ends_with("<= 4294967295"));

        input["age"] = json!(u32::MAX);
        assert!(validate(&definitions::generate_diet_plan_input(), &input).is_ok());
    }

    #[test]
    fn test_enum_outside_domain_is_rejected() {
        let mut input = diet_input();
        input["activityLevel"] = json!("highlyActive");

        let err = validate(&definitions::generate_diet_plan_input(), &input).unwrap_err();
        assert_eq!(err.path, "activityLevel");
        assert_eq!(err.actual, "\"highlyActive\"");
        assert!(err.expected.contains("veryActive"));
    }

    #[test]
    fn test_optional_fields_stay_absent_and_unknown_keys_are_dropped() {
        let mut input = diet_input();
        input["foodChoices"] = Value::Null;
        input["favoriteColor"] = json!("green");

        let normalized = validate(&definitions::generate_diet_plan_input(), &input).unwrap();
        let map = normalized.as_object().unwrap();

        assert!(!map.contains_key("foodChoices"));
        assert!(!map.contains_key("favoriteColor"));
        assert!(!map.contains_key("targetCaloricIntake"));
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_required_null_is_a_violation() {
        let mut input = diet_input();
        input["gender"] = Value::Null;

        let err = validate(&definitions::generate_diet_plan_input(), &input).unwrap_err();
        assert_eq!(err.path, "gender");
        assert_eq!(err.actual, "null");
    }

    #[test]
    fn test_integer_accepts_whole_floats_only() {
        let mut input = diet_input();
        input["age"] = json!(30.0);
        let normalized = validate(&definitions::generate_diet_plan_input(), &input).unwrap();
        assert_eq!(normalized["age"], json!(30));

        input["age"] = json!(30.5);
        let err = validate(&definitions::generate_diet_plan_input(), &input).unwrap_err();
        assert_eq!(err.path, "age");
        assert_eq!(err.actual, "number 30.5");
    }

    #[test]
    fn test_positive_bounds_reject_zero() {
        let mut input = diet_input();
        input["weight"] = json!(0);

        let err = validate(&definitions::generate_diet_plan_input(), &input).unwrap_err();
        assert_eq!(err.path, "weight");
        assert_eq!(err.expected, "number > 0");
    }

    #[test]
    fn test_nested_array_path_is_reported() {
        let output =
            json!({
            "dietPlan": [
                { "mealTime": "Breakfast", "foodItems": "Oats", "portionSize": "1 cup",
                  "calories": 300, "protein": 10, "carbs": 54, "fat": 5 },
                { "mealTime": "Lunch", "foodItems": "Chicken salad", "portionSize": "1 bowl",
                  "calories": -1, "protein": 35, "carbs": 12, "fat": 9 }
            ]
        });

        let err = validate(&definitions::generate_diet_plan_output(), &output).unwrap_err();
        assert_eq!(err.path, "dietPlan[1].calories");
        assert_eq!(err.expected, "number >= 0");
        assert_eq!(err.actual, "number -1");
    }

    #[test]
    fn test_string_where_number_expected() {
        let reply = json!({ "foodItem": { "name": "Apple", "nutrition": {
            "calories": "95", "protein": 0.3, "carbs": 25, "fat": 0.3 } } });

        let err = validate(&definitions::analyze_food_image_output(), &reply).unwrap_err();
        assert_eq!(err.path, "foodItem.nutrition.calories");
        assert_eq!(err.actual, "string");
    }

    #[test]
    fn test_data_uri_rule() {
        let schema = definitions::analyze_food_image_input();

        assert!(validate(&schema, &json!({ "photoDataUri": "", "description": "toast" })).is_ok());
        assert!(validate(&schema, &json!({ "photoDataUri": "data:image/png;base64,aGk=" })).is_ok());

        let err = validate(&schema, &json!({ "photoDataUri": "https://example.com/a.png" }))
            .unwrap_err();
        assert_eq!(err.path, "photoDataUri");
    }

    #[test]
    fn test_root_type_mismatch() {
        let err = validate(&definitions::analyze_food_image_output(), &json!([])).unwrap_err();
        assert_eq!(err, SchemaViolation::new("$", "object", "array"));
    }

    #[test]
    fn test_validate_as_produces_typed_records() {
        let input: GenerateDietPlanInput = validate_as(
            &definitions::generate_diet_plan_input(),
            &diet_input()
        ).unwrap();
        assert_eq!(input.age, 30);
        assert_eq!(input.gender, Gender::Female);
        assert_eq!(input.food_choices, None);

        let output: GenerateDietPlanOutput = validate_as(
            &definitions::generate_diet_plan_output(),
            &json!({ "dietPlan": [] })
        ).unwrap();
        assert!(output.diet_plan.is_empty());
    }
}
