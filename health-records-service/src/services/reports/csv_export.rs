use super::day_of;
use crate::models::VitalMeasurement;
use serde::Serialize;
use service_core::error::AppError;

pub const CSV_HEADER: &str = "Date,Metric,Value,Unit";

#[derive(Serialize)]
struct VitalRow<'a> {
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Metric")]
    metric: &'a str,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Unit")]
    unit: &'a str,
}

/// One row per vital measurement under a fixed `Date,Metric,Value,Unit` header.
pub fn render_vitals(vitals: &[VitalMeasurement]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    // Written explicitly so an empty report still carries the header.
    writer
        .write_record(CSV_HEADER.split(','))
        .map_err(csv_error)?;

    for vital in vitals {
        writer
            .serialize(VitalRow {
                date: day_of(&vital.measured_at),
                metric: &vital.vital_type,
                value: vital.display_value(),
                unit: vital.unit.as_deref().unwrap_or_default(),
            })
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to flush CSV: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("CSV is not UTF-8: {}", e)))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::InternalError(anyhow::anyhow!("Failed to write CSV: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vital(
        vital_type: &str,
        value: Option<f64>,
        pressure: Option<(f64, f64)>,
        unit: &str,
    ) -> VitalMeasurement {
        VitalMeasurement {
            id: "v".to_string(),
            profile_id: "p1".to_string(),
            vital_type: vital_type.to_string(),
            value,
            systolic: pressure.map(|(s, _)| s),
            diastolic: pressure.map(|(_, d)| d),
            unit: Some(unit.to_string()),
            measured_at: "2024-03-05T08:30:00Z".to_string(),
            notes: None,
        }
    }

    #[test]
    fn empty_report_is_just_the_header() {
        assert_eq!(render_vitals(&[]).unwrap(), "Date,Metric,Value,Unit\n");
    }

    #[test]
    fn rows_follow_the_header() {
        let csv = render_vitals(&[
            vital("blood_pressure", None, Some((120.0, 80.0)), "mmHg"),
            vital("weight", Some(71.4), None, "kg"),
        ])
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "2024-03-05,blood_pressure,120/80,mmHg");
        assert_eq!(lines[2], "2024-03-05,weight,71.4,kg");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let csv = render_vitals(&[vital("glucose, fasting", Some(5.4), None, "mmol/L")]).unwrap();
        assert!(csv.contains("\"glucose, fasting\""));
    }
}
