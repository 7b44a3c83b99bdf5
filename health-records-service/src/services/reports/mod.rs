//! Report assembly: pick the included metrics, fetch them concurrently, trim
//! them to the reporting period, then hand them to a renderer.

pub mod csv_export;
pub mod pdf;

use crate::models::{
    Dated, HealthInsight, LabResult, MealLog, Medication, Profile, VitalMeasurement,
};
use crate::services::store::Repository;
use chrono::NaiveDate;
use futures::future::try_join_all;
use service_core::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMetric {
    Vitals,
    Medications,
    Nutrition,
    Labs,
    Insights,
}

impl ReportMetric {
    pub fn title(&self) -> &'static str {
        match self {
            ReportMetric::Vitals => "Vital Signs",
            ReportMetric::Medications => "Medications",
            ReportMetric::Nutrition => "Nutrition",
            ReportMetric::Labs => "Lab Results",
            ReportMetric::Insights => "Health Insights",
        }
    }
}

/// Inclusive `[start, end]` period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Accepts `YYYY-MM-DD` or anything starting with it (RFC 3339 timestamps).
    /// Unparseable dates are outside every range.
    pub fn contains(&self, date: &str) -> bool {
        date.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .is_some_and(|day| day >= self.start && day <= self.end)
    }

    pub fn retain<T: Dated>(&self, records: Vec<T>) -> Vec<T> {
        records
            .into_iter()
            .filter(|record| record.record_date().map_or(true, |date| self.contains(date)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricRecords {
    Vitals(Vec<VitalMeasurement>),
    Medications(Vec<Medication>),
    Nutrition(Vec<MealLog>),
    Labs(Vec<LabResult>),
    Insights(Vec<HealthInsight>),
}

impl MetricRecords {
    pub fn metric(&self) -> ReportMetric {
        match self {
            MetricRecords::Vitals(_) => ReportMetric::Vitals,
            MetricRecords::Medications(_) => ReportMetric::Medications,
            MetricRecords::Nutrition(_) => ReportMetric::Nutrition,
            MetricRecords::Labs(_) => ReportMetric::Labs,
            MetricRecords::Insights(_) => ReportMetric::Insights,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MetricRecords::Vitals(rows) => rows.len(),
            MetricRecords::Medications(rows) => rows.len(),
            MetricRecords::Nutrition(rows) => rows.len(),
            MetricRecords::Labs(rows) => rows.len(),
            MetricRecords::Insights(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One human-readable line per record, for the PDF body.
    pub fn lines(&self) -> Vec<String> {
        match self {
            MetricRecords::Vitals(rows) => rows
                .iter()
                .map(|v| {
                    format!(
                        "{}  {}: {} {}",
                        day_of(&v.measured_at),
                        v.vital_type,
                        v.display_value(),
                        v.unit.as_deref().unwrap_or_default()
                    )
                    .trim_end()
                    .to_string()
                })
                .collect(),
            MetricRecords::Medications(rows) => rows
                .iter()
                .map(|m| {
                    let mut line = m.medication_name.clone();
                    for detail in [&m.dosage, &m.frequency].into_iter().flatten() {
                        line.push_str(" - ");
                        line.push_str(detail);
                    }
                    if !m.is_active {
                        line.push_str(" (inactive)");
                    }
                    line
                })
                .collect(),
            MetricRecords::Nutrition(rows) => rows
                .iter()
                .map(|meal| {
                    let calories = meal
                        .calories
                        .map(|kcal| format!("{} kcal", kcal))
                        .unwrap_or_else(|| "calories not recorded".to_string());
                    format!(
                        "{}  {}: {}",
                        meal.meal_date,
                        meal.meal_type.as_deref().unwrap_or("meal"),
                        calories
                    )
                })
                .collect(),
            MetricRecords::Labs(rows) => rows
                .iter()
                .map(|lab| {
                    let mut line = format!(
                        "{}  {}: {} {}",
                        lab.test_date,
                        lab.test_name,
                        lab.value.as_deref().unwrap_or("-"),
                        lab.unit.as_deref().unwrap_or_default()
                    )
                    .trim_end()
                    .to_string();
                    if let Some(flag) = &lab.flag {
                        line.push_str(&format!(" [{}]", flag));
                    }
                    line
                })
                .collect(),
            MetricRecords::Insights(rows) => rows
                .iter()
                .map(|insight| format!("{}  {}", day_of(&insight.created_date), insight.title))
                .collect(),
        }
    }
}

/// Everything a renderer needs.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub profile: Profile,
    pub range: DateRange,
    pub generated_on: NaiveDate,
    pub sections: Vec<MetricRecords>,
}

impl ReportData {
    pub fn vitals(&self) -> &[VitalMeasurement] {
        self.sections
            .iter()
            .find_map(|section| match section {
                MetricRecords::Vitals(rows) => Some(rows.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Fetch one collection per metric, concurrently. Results keep the order of
/// `metrics`; the first failure aborts the whole report.
pub async fn collect_sections(
    repo: &Repository,
    profile_id: &str,
    metrics: &[ReportMetric],
    range: DateRange,
) -> Result<Vec<MetricRecords>, AppError> {
    try_join_all(
        metrics
            .iter()
            .map(|metric| fetch_metric(repo, profile_id, *metric, range)),
    )
    .await
}

async fn fetch_metric(
    repo: &Repository,
    profile_id: &str,
    metric: ReportMetric,
    range: DateRange,
) -> Result<MetricRecords, AppError> {
    let records = match metric {
        ReportMetric::Vitals => MetricRecords::Vitals(
            range.retain(repo.list_for_profile::<VitalMeasurement>(profile_id).await?),
        ),
        ReportMetric::Medications => MetricRecords::Medications(
            repo.list_for_profile::<Medication>(profile_id).await?,
        ),
        ReportMetric::Nutrition => MetricRecords::Nutrition(
            range.retain(repo.list_for_profile::<MealLog>(profile_id).await?),
        ),
        ReportMetric::Labs => MetricRecords::Labs(
            range.retain(repo.list_for_profile::<LabResult>(profile_id).await?),
        ),
        ReportMetric::Insights => MetricRecords::Insights(
            range.retain(repo.list_for_profile::<HealthInsight>(profile_id).await?),
        ),
    };

    tracing::debug!(
        profile_id = %profile_id,
        metric = ?metric,
        rows = records.len(),
        "Fetched report section"
    );

    Ok(records)
}

/// `YYYY-MM-DD` prefix of a date or timestamp, or the input unchanged.
pub(crate) fn day_of(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;
    use crate::services::store::MemoryStore;
    use std::sync::Arc;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn march() -> DateRange {
        DateRange::new(date("2024-03-01"), date("2024-03-31")).unwrap()
    }

    fn vital(id: &str, measured_at: &str) -> VitalMeasurement {
        VitalMeasurement {
            id: id.to_string(),
            profile_id: "p1".to_string(),
            vital_type: "heart_rate".to_string(),
            value: Some(64.0),
            systolic: None,
            diastolic: None,
            unit: Some("bpm".to_string()),
            measured_at: measured_at.to_string(),
            notes: None,
        }
    }

    fn medication(id: &str) -> Medication {
        Medication {
            id: id.to_string(),
            profile_id: "p1".to_string(),
            medication_name: "Metformin".to_string(),
            dosage: Some("500mg".to_string()),
            frequency: Some("twice daily".to_string()),
            start_date: Some("2019-01-01".to_string()),
            end_date: None,
            is_active: true,
        }
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(matches!(
            DateRange::new(date("2024-04-01"), date("2024-03-01")),
            Err(AppError::BadRequest(_))
        ));
        assert!(DateRange::new(date("2024-03-01"), date("2024-03-01")).is_ok());
    }

    #[test]
    fn range_is_inclusive_and_accepts_timestamps() {
        let range = march();
        assert!(range.contains("2024-03-01"));
        assert!(range.contains("2024-03-31T23:59:59Z"));
        assert!(!range.contains("2024-04-01T00:00:00Z"));
        assert!(!range.contains("not a date"));
    }

    #[test]
    fn undated_records_are_always_retained() {
        let kept = march().retain(vec![medication("m1")]);
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn fetches_one_collection_per_metric_in_order() {
        let store = Arc::new(MemoryStore::new());
        store.seed(&[vital("v1", "2024-03-05T08:00:00Z"), vital("v2", "2024-05-01")]);
        store.seed(&[medication("m1")]);
        let repo = Repository::new(store.clone());

        let sections = collect_sections(
            &repo,
            "p1",
            &[ReportMetric::Medications, ReportMetric::Vitals],
            march(),
        )
        .await
        .unwrap();

        assert_eq!(sections[0].metric(), ReportMetric::Medications);
        assert_eq!(sections[1].metric(), ReportMetric::Vitals);
        assert_eq!(sections[1].len(), 1);
        assert_eq!(store.query_count(VitalMeasurement::COLLECTION), 1);
        assert_eq!(store.query_count(Medication::COLLECTION), 1);
        assert_eq!(store.query_count(MealLog::COLLECTION), 0);
        assert_eq!(store.query_count(LabResult::COLLECTION), 0);
    }

    #[tokio::test]
    async fn any_failed_fetch_fails_the_report() {
        let store = Arc::new(MemoryStore::new());
        store.fail_collection(LabResult::COLLECTION);
        let repo = Repository::new(store);

        let result =
            collect_sections(&repo, "p1", &[ReportMetric::Vitals, ReportMetric::Labs], march())
                .await;

        assert!(result.is_err());
    }

    #[test]
    fn vital_lines_show_date_value_and_unit() {
        let lines = MetricRecords::Vitals(vec![vital("v1", "2024-03-05T08:00:00Z")]).lines();
        assert_eq!(lines, vec!["2024-03-05  heart_rate: 64 bpm"]);
    }
}
