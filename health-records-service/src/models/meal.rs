use super::{Dated, Entity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealLog {
    pub id: String,
    pub profile_id: String,
    pub meal_type: Option<String>,
    pub meal_date: String,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub photo_url: Option<String>,
}

impl Entity for MealLog {
    const COLLECTION: &'static str = "meal_logs";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Dated for MealLog {
    fn record_date(&self) -> Option<&str> {
        Some(&self.meal_date)
    }
}
