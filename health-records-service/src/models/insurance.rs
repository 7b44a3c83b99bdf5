use super::Entity;
use serde::{Deserialize, Serialize};

/// Insurance policy on file for a profile. Read only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthInsurance {
    pub id: String,
    pub profile_id: String,
    pub provider_name: String,
    pub policy_number: String,
    pub plan_name: Option<String>,
    pub plan_type: Option<String>,
    pub premium_amount: Option<f64>,
    pub deductible: Option<f64>,
    pub out_of_pocket_max: Option<f64>,
    pub coverage_start_date: Option<String>,
    pub coverage_end_date: Option<String>,
    #[serde(default)]
    pub covered_services: Vec<String>,
    #[serde(default)]
    pub excluded_services: Vec<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

impl Entity for HealthInsurance {
    const COLLECTION: &'static str = "health_insurance";

    fn id(&self) -> &str {
        &self.id
    }
}
