pub mod admin;
pub mod documents;
pub mod health;
pub mod insurance;
pub mod meals;
pub mod reports;
pub mod search;
pub mod share_links;

pub use admin::bootstrap_admin;
pub use documents::{download_document_file, upload_document};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use insurance::ask_insurance_question;
pub use meals::analyze_meal;
pub use reports::generate_report;
pub use search::search_documents;
pub use share_links::create_share_link;
