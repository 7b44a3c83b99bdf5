use super::{Dated, Entity};
use serde::{Deserialize, Serialize};

/// One vital sign reading. Blood pressure arrives as `systolic`/`diastolic`
/// with no aggregate `value`; everything else uses `value`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalMeasurement {
    pub id: String,
    pub profile_id: String,
    pub vital_type: String,
    pub value: Option<f64>,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub unit: Option<String>,
    pub measured_at: String,
    pub notes: Option<String>,
}

impl VitalMeasurement {
    /// Display value: `systolic/diastolic` when both are recorded, else `value`.
    pub fn display_value(&self) -> String {
        match (self.systolic, self.diastolic, self.value) {
            (Some(systolic), Some(diastolic), _) => format!("{}/{}", systolic, diastolic),
            (_, _, Some(value)) => value.to_string(),
            _ => String::new(),
        }
    }
}

impl Entity for VitalMeasurement {
    const COLLECTION: &'static str = "vital_measurements";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Dated for VitalMeasurement {
    fn record_date(&self) -> Option<&str> {
        Some(&self.measured_at)
    }
}
