//! Typed records for every collection the service reads or writes.

pub mod document;
pub mod insurance;
pub mod meal;
pub mod medication;
pub mod profile;
pub mod report_inputs;
pub mod share_link;
pub mod user;
pub mod vitals;

pub use document::MedicalDocument;
pub use insurance::HealthInsurance;
pub use meal::MealLog;
pub use medication::Medication;
pub use profile::Profile;
pub use report_inputs::{HealthInsight, LabResult};
pub use share_link::{AccessLevel, ShareType, ShareableLink};
pub use user::{User, UserRole};
pub use vitals::VitalMeasurement;

use serde::{de::DeserializeOwned, Serialize};

/// A record stored in a named collection of the entity store.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Records that carry the date they describe, used for report period filtering.
pub trait Dated {
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; `None` means always in range.
    fn record_date(&self) -> Option<&str>;
}
