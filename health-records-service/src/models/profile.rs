use super::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl Entity for Profile {
    const COLLECTION: &'static str = "profiles";

    fn id(&self) -> &str {
        &self.id
    }
}
