use super::{Dated, Entity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub id: String,
    pub profile_id: String,
    pub medication_name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for Medication {
    const COLLECTION: &'static str = "medications";

    fn id(&self) -> &str {
        &self.id
    }
}

// A medication list is a current-state view, not a dated event.
impl Dated for Medication {
    fn record_date(&self) -> Option<&str> {
        None
    }
}
