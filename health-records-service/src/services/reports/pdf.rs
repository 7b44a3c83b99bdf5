//! PDF rendering via `printpdf`.
//!
//! Layout is computed first as plain lines per page so pagination can be
//! checked without parsing PDF output; rendering then places each line.

use super::ReportData;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use service_core::error::AppError;
use std::io::BufWriter;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MM: f32 = 280.0;
const BOTTOM_MM: f32 = 20.0;
const LEFT_MM: f32 = 20.0;
const INDENT_MM: f32 = 25.0;
const WRAP_COLUMNS: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Title,
    Heading,
    Body,
    Row,
}

impl Style {
    fn font_size(self) -> f32 {
        match self {
            Style::Title => 18.0,
            Style::Heading => 12.0,
            Style::Body => 10.0,
            Style::Row => 9.0,
        }
    }

    /// Vertical space consumed by a line in this style.
    fn advance(self) -> f32 {
        match self {
            Style::Title => 12.0,
            Style::Heading => 7.0,
            Style::Body => 5.5,
            Style::Row => 4.5,
        }
    }

    fn x(self) -> f32 {
        match self {
            Style::Row => INDENT_MM,
            _ => LEFT_MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub style: Style,
    pub y: f32,
}

/// Title, generation date, period and patient, then one section per metric
/// with its row count and rows.
pub fn layout(report: &ReportData) -> Vec<Vec<Line>> {
    let mut pages = PageBuilder::new();

    pages.push("Health Report", Style::Title);
    pages.push(
        &format!("Generated: {}", report.generated_on.format("%Y-%m-%d")),
        Style::Body,
    );
    pages.push(
        &format!(
            "Period: {} to {}",
            report.range.start.format("%Y-%m-%d"),
            report.range.end.format("%Y-%m-%d")
        ),
        Style::Body,
    );
    pages.push(&format!("Patient: {}", report.profile.full_name), Style::Body);
    pages.gap(6.0);

    for section in &report.sections {
        pages.push(
            &format!("{} ({} records)", section.metric().title(), section.len()),
            Style::Heading,
        );
        if section.is_empty() {
            pages.push("No records in this period.", Style::Row);
        }
        for line in section.lines() {
            for wrapped in wrap_text(&line, WRAP_COLUMNS) {
                pages.push(&wrapped, Style::Row);
            }
        }
        pages.gap(4.0);
    }

    pages.finish()
}

pub fn render(report: &ReportData) -> Result<Vec<u8>, AppError> {
    let pages = layout(report);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Health Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, lines) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        for line in lines {
            let face = match line.style {
                Style::Title | Style::Heading => &bold,
                Style::Body | Style::Row => &font,
            };
            layer.use_text(
                line.text.as_str(),
                line.style.font_size(),
                Mm(line.style.x()),
                Mm(line.y),
                face,
            );
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(pdf_error)?;
    buf.into_inner()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("PDF buffer error: {}", e)))
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalError(anyhow::anyhow!("PDF render error: {}", e))
}

struct PageBuilder {
    pages: Vec<Vec<Line>>,
    y: f32,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: TOP_MM,
        }
    }

    fn push(&mut self, text: &str, style: Style) {
        if self.y - style.advance() < BOTTOM_MM {
            self.pages.push(Vec::new());
            self.y = TOP_MM;
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(Line {
                text: text.to_string(),
                style,
                y: self.y,
            });
        }
        self.y -= style.advance();
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn finish(self) -> Vec<Vec<Line>> {
        self.pages
    }
}

fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Profile, VitalMeasurement};
    use crate::services::reports::{DateRange, MetricRecords};
    use chrono::NaiveDate;

    fn report(vital_count: usize) -> ReportData {
        let vitals = (0..vital_count)
            .map(|i| VitalMeasurement {
                id: format!("v{}", i),
                profile_id: "p1".to_string(),
                vital_type: "heart_rate".to_string(),
                value: Some(60.0 + i as f64),
                systolic: None,
                diastolic: None,
                unit: Some("bpm".to_string()),
                measured_at: "2024-03-05".to_string(),
                notes: None,
            })
            .collect();

        ReportData {
            profile: Profile {
                id: "p1".to_string(),
                full_name: "Ana Ruiz".to_string(),
                date_of_birth: None,
                gender: None,
                blood_type: None,
                chronic_conditions: vec![],
                allergies: vec![],
            },
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )
            .unwrap(),
            generated_on: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            sections: vec![MetricRecords::Vitals(vitals), MetricRecords::Medications(vec![])],
        }
    }

    #[test]
    fn header_lines_come_first() {
        let pages = layout(&report(1));
        let texts: Vec<&str> = pages[0].iter().map(|l| l.text.as_str()).collect();

        assert_eq!(
            &texts[..4],
            &[
                "Health Report",
                "Generated: 2024-04-02",
                "Period: 2024-03-01 to 2024-03-31",
                "Patient: Ana Ruiz",
            ]
        );
        assert!(texts.contains(&"Vital Signs (1 records)"));
        assert!(texts.contains(&"Medications (0 records)"));
        assert!(texts.contains(&"No records in this period."));
    }

    #[test]
    fn long_sections_spill_onto_new_pages() {
        let pages = layout(&report(200));

        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.iter().all(|line| line.y >= BOTTOM_MM && line.y <= TOP_MM));
        }
    }

    #[test]
    fn render_produces_a_pdf() {
        let bytes = render(&report(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_text_breaks_on_word_boundaries() {
        assert_eq!(wrap_text("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
