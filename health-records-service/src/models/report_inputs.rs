use super::{Dated, Entity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResult {
    pub id: String,
    pub profile_id: String,
    pub test_name: String,
    pub value: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub flag: Option<String>,
    pub test_date: String,
}

impl Entity for LabResult {
    const COLLECTION: &'static str = "lab_results";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Dated for LabResult {
    fn record_date(&self) -> Option<&str> {
        Some(&self.test_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthInsight {
    pub id: String,
    pub profile_id: String,
    pub title: String,
    pub description: Option<String>,
    pub insight_type: Option<String>,
    pub severity: Option<String>,
    pub created_date: String,
}

impl Entity for HealthInsight {
    const COLLECTION: &'static str = "health_insights";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Dated for HealthInsight {
    fn record_date(&self) -> Option<&str> {
        Some(&self.created_date)
    }
}
