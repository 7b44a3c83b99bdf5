use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MealAnalysisRequest {
    #[validate(
        url(message = "image_url must be a valid URL"),
        custom(function = "require_https", message = "image_url must use https")
    )]
    #[schema(example = "https://cdn.example.com/meals/lunch.jpg")]
    pub image_url: String,

    #[schema(example = "lunch")]
    pub meal_type: Option<String>,

    pub notes: Option<String>,
}

fn require_https(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("https_required"))
    }
}

/// Nutrition estimate returned by the model. Missing fields default so a
/// sparse answer still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct MealAnalysis {
    pub food_items: Vec<FoodItem>,
    pub total_calories: f64,
    pub macros: Macronutrients,
    /// 1 (poor) to 10 (excellent).
    pub health_score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct FoodItem {
    pub name: String,
    pub portion: String,
    pub calories: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct Macronutrients {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

impl MealAnalysis {
    /// Response schema handed to the model alongside the photo.
    pub fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "food_items": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "portion": { "type": "STRING" },
                            "calories": { "type": "NUMBER" }
                        },
                        "required": ["name", "calories"]
                    }
                },
                "total_calories": { "type": "NUMBER" },
                "macros": {
                    "type": "OBJECT",
                    "properties": {
                        "protein_g": { "type": "NUMBER" },
                        "carbs_g": { "type": "NUMBER" },
                        "fat_g": { "type": "NUMBER" },
                        "fiber_g": { "type": "NUMBER" }
                    }
                },
                "health_score": { "type": "NUMBER" },
                "recommendations": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["food_items", "total_calories", "macros", "health_score"]
        })
    }
}
