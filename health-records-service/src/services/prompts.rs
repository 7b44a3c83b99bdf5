//! Prompt assembly for the LLM-backed endpoints.

use crate::models::{HealthInsurance, MedicalDocument};
use std::collections::HashMap;

/// Response schema for document search: an array of document ids.
pub fn document_ids_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

pub fn document_search(query: &str, documents: &[MedicalDocument]) -> String {
    let mut prompt = String::from(
        "You are helping a patient find documents in their personal health record.\n\
         Return the ids of the documents relevant to the search query, most relevant first, \
         as a JSON array of strings. Return an empty array when nothing matches. \
         Only use ids from the list below.\n\nDocuments:\n",
    );

    for document in documents {
        prompt.push_str(&format!(
            "- id: {} | title: {} | type: {} | facility: {} | doctor: {} | date: {} | summary: {}\n",
            document.id,
            document.title,
            document.document_type,
            document.facility_name.as_deref().unwrap_or("n/a"),
            document.doctor_name.as_deref().unwrap_or("n/a"),
            document.document_date.as_deref().unwrap_or("n/a"),
            document.ai_summary.as_deref().unwrap_or("n/a"),
        ));
    }

    prompt.push_str(&format!("\nSearch query: {}", query));
    prompt
}

/// Keep only ids that name a fetched document, in the model's order, once each.
pub fn select_documents(documents: Vec<MedicalDocument>, ids: &[String]) -> Vec<MedicalDocument> {
    let mut by_id: HashMap<String, MedicalDocument> = documents
        .into_iter()
        .map(|document| (document.id.clone(), document))
        .collect();

    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

pub fn insurance_question(question: &str, policies: &[HealthInsurance]) -> String {
    let mut prompt = String::from(
        "You are an assistant that explains health insurance coverage in plain language.\n\
         Answer the question using only the policy information below. If the policies do not \
         contain the answer, say so and suggest contacting the insurer.\n\nPolicies:\n",
    );

    for (index, policy) in policies.iter().enumerate() {
        prompt.push_str(&format!(
            "\nPolicy {}: {} ({})\n",
            index + 1,
            policy.provider_name,
            policy.policy_number
        ));
        let fields = [
            ("Plan", policy.plan_name.clone()),
            ("Plan type", policy.plan_type.clone()),
            ("Premium", policy.premium_amount.map(|v| format!("{:.2}", v))),
            ("Deductible", policy.deductible.map(|v| format!("{:.2}", v))),
            (
                "Out-of-pocket maximum",
                policy.out_of_pocket_max.map(|v| format!("{:.2}", v)),
            ),
            ("Coverage starts", policy.coverage_start_date.clone()),
            ("Coverage ends", policy.coverage_end_date.clone()),
            ("Contact phone", policy.contact_phone.clone()),
            ("Contact email", policy.contact_email.clone()),
            ("Notes", policy.notes.clone()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                prompt.push_str(&format!("  {}: {}\n", label, value));
            }
        }
        if !policy.covered_services.is_empty() {
            prompt.push_str(&format!("  Covered: {}\n", policy.covered_services.join(", ")));
        }
        if !policy.excluded_services.is_empty() {
            prompt.push_str(&format!("  Excluded: {}\n", policy.excluded_services.join(", ")));
        }
    }

    prompt.push_str(&format!("\nQuestion: {}", question));
    prompt
}

pub fn meal_photo(meal_type: Option<&str>, notes: Option<&str>) -> String {
    let mut prompt = String::from(
        "Analyze the meal in this photo. Identify each food item with an estimated portion and \
         calories, the total calories, macronutrients in grams (protein, carbs, fat, fiber), a \
         health score from 1 to 10, and short recommendations for a more balanced meal.",
    );
    if let Some(meal_type) = meal_type {
        prompt.push_str(&format!("\nMeal type: {}", meal_type));
    }
    if let Some(notes) = notes {
        prompt.push_str(&format!("\nNotes from the patient: {}", notes));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(id: &str, title: &str) -> MedicalDocument {
        let mut document =
            MedicalDocument::new("p1".to_string(), title.to_string(), "lab".to_string());
        document.id = id.to_string();
        document
    }

    #[test]
    fn search_prompt_lists_every_document_and_the_query() {
        let mut lipid = document("d1", "Lipid panel");
        lipid.facility_name = Some("City Lab".to_string());
        lipid.ai_summary = Some("LDL slightly elevated".to_string());

        let prompt = document_search("cholesterol", &[lipid, document("d2", "Chest X-ray")]);

        assert!(prompt.contains("id: d1 | title: Lipid panel | type: lab | facility: City Lab"));
        assert!(prompt.contains("summary: LDL slightly elevated"));
        assert!(prompt.contains("id: d2 | title: Chest X-ray"));
        assert!(prompt.ends_with("Search query: cholesterol"));
    }

    #[test]
    fn selection_drops_unknown_and_duplicate_ids() {
        let documents = vec![document("d1", "A"), document("d2", "B"), document("d3", "C")];
        let ids = ["d3", "ghost", "d1", "d3"].map(String::from);

        let selected = select_documents(documents, &ids);

        let selected_ids: Vec<&str> = selected.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(selected_ids, vec!["d3", "d1"]);
    }

    #[test]
    fn insurance_prompt_includes_coverage_lists() {
        let policy = HealthInsurance {
            id: "i1".to_string(),
            profile_id: "p1".to_string(),
            provider_name: "Acme Health".to_string(),
            policy_number: "AC-123".to_string(),
            plan_name: Some("Gold".to_string()),
            plan_type: None,
            premium_amount: None,
            deductible: Some(500.0),
            out_of_pocket_max: None,
            coverage_start_date: None,
            coverage_end_date: None,
            covered_services: vec!["physiotherapy".to_string(), "dental".to_string()],
            excluded_services: vec!["cosmetic".to_string()],
            contact_phone: None,
            contact_email: None,
            notes: None,
        };

        let prompt = insurance_question("Is physio covered?", &[policy]);

        assert!(prompt.contains("Policy 1: Acme Health (AC-123)"));
        assert!(prompt.contains("Deductible: 500.00"));
        assert!(prompt.contains("Covered: physiotherapy, dental"));
        assert!(prompt.contains("Excluded: cosmetic"));
        assert!(prompt.ends_with("Question: Is physio covered?"));
    }

    #[test]
    fn meal_prompt_carries_optional_context() {
        let prompt = meal_photo(Some("dinner"), None);
        assert!(prompt.contains("Meal type: dinner"));
        assert!(!prompt.contains("Notes"));
    }

    #[test]
    fn each_document_gets_its_own_line() {
        let prompt = document_search("x", &[document("d1", "A"), document("d2", "B")]);

        let listed: Vec<&str> = prompt.lines().filter(|l| l.starts_with("- id:")).collect();
        assert_eq!(listed.len(), 2);
        assert!(listed[1].starts_with("- id: d2"));
    }
}
