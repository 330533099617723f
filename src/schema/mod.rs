//! Data-only payload shapes shared by the validator, the model request
//! builder, and the tool declarations.

pub mod definitions;
mod validator;

pub use validator::{ validate, validate_as };

use serde_json::{ json, Map, Value };

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Object(Vec<Field>),
    Array(Box<Schema>),
    String(StringRule),
    Number(NumberRule),
    Integer(NumberRule),
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StringRule {
    #[default]
    Any,
    /// Must contain something other than whitespace.
    NonEmpty,
    /// Empty, or a decodable `data:<mime>;base64,<data>` URI.
    DataUri,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRule {
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    /// Inclusive.
    pub maximum: Option<f64>,
}

impl NumberRule {
    pub const NON_NEGATIVE: Self = Self { minimum: Some(0.0), exclusive_minimum: None, maximum: None };
    pub const POSITIVE: Self = Self { minimum: None, exclusive_minimum: Some(0.0), maximum: None };

    pub const fn at_most(self, maximum: f64) -> Self {
        Self { maximum: Some(maximum), ..self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub schema: Schema,
}

impl Field {
    pub fn required(name: &'static str, description: &'static str, schema: Schema) -> Self {
        Self { name, description, required: true, schema }
    }

    pub fn optional(name: &'static str, description: &'static str, schema: Schema) -> Self {
        Self { name, description, required: false, schema }
    }
}

impl Schema {
    pub fn string() -> Self {
        Schema::String(StringRule::Any)
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    /// Human-readable shape, used as the `expected` side of a violation.
    pub fn describe(&self) -> String {
        match self {
            Schema::Object(_) => "object".to_string(),
            Schema::Array(items) => format!("array of {}", items.describe()),
            Schema::String(StringRule::Any) => "string".to_string(),
            Schema::String(StringRule::NonEmpty) => "non-empty string".to_string(),
            Schema::String(StringRule::DataUri) => "empty string or base64 data URI".to_string(),
            Schema::Number(rule) => describe_number("number", rule),
            Schema::Integer(rule) => describe_number("integer", rule),
            Schema::Enum(values) => format!("one of [{}]", values.join(", ")),
        }
    }

    /// Gemini's OpenAPI-subset schema, used for `responseSchema` and tool parameters.
    pub fn to_gemini_schema(&self) -> Value {
        gemini_schema(self, None)
    }
}

fn describe_number(kind: &str, rule: &NumberRule) -> String {
    let lower = match (rule.minimum, rule.exclusive_minimum) {
        (_, Some(bound)) => format!("{} > {}", kind, bound),
        (Some(bound), None) => format!("{} >= {}", kind, bound),
        (None, None) => kind.to_string(),
    };

    match rule.maximum {
        Some(max) => format!("{} and <= {}", lower, max),
        None => lower,
    }
}

fn gemini_schema(schema: &Schema, description: Option<&str>) -> Value {
    let mut out = match schema {
        Schema::Object(fields) => {
            let mut properties = Map::new();
            for field in fields {
                properties.insert(
                    field.name.to_string(),
                    gemini_schema(&field.schema, Some(field.description))
                );
            }
            let required: Vec<&str> = fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect();
            let ordering: Vec<&str> = fields
                .iter()
                .map(|f| f.name)
                .collect();

            json!({
                "type": "OBJECT",
                "properties": properties,
                "required": required,
                "propertyOrdering": ordering,
            })
        }
        Schema::Array(items) => json!({ "type": "ARRAY", "items": gemini_schema(items, None) }),
        Schema::String(_) => json!({ "type": "STRING" }),
        Schema::Number(_) => json!({ "type": "NUMBER" }),
        Schema::Integer(_) => json!({ "type": "INTEGER" }),
        Schema::Enum(values) => json!({ "type": "STRING", "format": "enum", "enum": values }),
    };

    if let (Some(text), Some(obj)) = (description, out.as_object_mut()) {
        if !text.is_empty() {
            obj.insert("description".to_string(), Value::String(text.to_string()));
        }
    }

    out
}
