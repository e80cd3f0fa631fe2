//! Single-page report document.
//!
//! The document is a list of styled lines. A PDF writer draws them; the
//! plain-text rendering is used for terminals and tests. Layout is not part
//! of the contract, content is.

use serde::{Deserialize, Serialize};

use crate::models::{Report, Vitals};

pub const DOCUMENT_TITLE: &str = "Kidney Disease Risk Assessment";
pub const DOCUMENT_SUBTITLE: &str = "Generated by KidneyGuard AI • Medical Screening Tool";
pub const NO_FLAGS_LINE: &str = "No immediate critical flags.";
pub const DISCLAIMER: &str =
    "Disclaimer: AI screening tool. Not a substitute for professional medical advice.";

/// Typographic role of a line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Title,
    Subtitle,
    Heading,
    Emphasis,
    Body,
    ListItem,
    Footnote,
}

/// Text color of a line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Navy,
    Gray,
    Slate,
    Black,
    Red,
    Green,
    Firebrick,
    DarkGreen,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentLine {
    pub text: String,
    pub style: TextStyle,
    pub tone: Tone,
}

impl DocumentLine {
    fn new(text: impl Into<String>, style: TextStyle, tone: Tone) -> Self {
        Self {
            text: text.into(),
            style,
            tone,
        }
    }
}

/// Document content for one report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDocument {
    pub lines: Vec<DocumentLine>,
}

/// "Label: value unit" for a vitals entry.
fn vital_line(field: crate::models::Field, value: f64) -> String {
    let unit = field.unit();
    if unit.is_empty() {
        format!("{}: {}", field.label(), value)
    } else {
        format!("{}: {} {}", field.label(), value, unit)
    }
}

impl ReportDocument {
    /// Lay out a report.
    pub fn from_report(report: &Report) -> Self {
        use TextStyle::*;

        let mut lines = vec![
            DocumentLine::new(DOCUMENT_TITLE, Title, Tone::Navy),
            DocumentLine::new(DOCUMENT_SUBTITLE, Subtitle, Tone::Gray),
            DocumentLine::new(format!("Report generated {}", report.generated_at), Subtitle, Tone::Gray),
            DocumentLine::new("1. Assessment Result", Heading, Tone::Slate),
        ];

        let diagnosis_tone = if report.result.diagnosis.is_positive() {
            Tone::Red
        } else {
            Tone::Green
        };
        lines.push(DocumentLine::new(
            format!("Diagnosis: {}", report.result.diagnosis.description()),
            Emphasis,
            diagnosis_tone,
        ));
        lines.push(DocumentLine::new(
            format!("Confidence Level: {:.2}%", report.result.confidence),
            Body,
            Tone::Black,
        ));

        lines.push(DocumentLine::new("2. Key Vitals & Chemistry", Heading, Tone::Slate));
        for (field, value) in report.vitals.entries() {
            lines.push(DocumentLine::new(vital_line(field, value), Body, Tone::Black));
        }

        lines.push(DocumentLine::new("3. Clinical Flags", Heading, Tone::Slate));
        if report.flags.is_empty() {
            lines.push(DocumentLine::new(NO_FLAGS_LINE, ListItem, Tone::DarkGreen));
        } else {
            for flag in &report.flags {
                lines.push(DocumentLine::new(flag.as_str(), ListItem, Tone::Firebrick));
            }
        }

        lines.push(DocumentLine::new(DISCLAIMER, Footnote, Tone::Gray));

        Self { lines }
    }

    /// Vitals lines in report order.
    pub fn vitals_lines(&self) -> Vec<&str> {
        let start = self
            .lines
            .iter()
            .position(|l| l.text == "2. Key Vitals & Chemistry")
            .map(|i| i + 1)
            .unwrap_or(self.lines.len());
        self.lines[start..]
            .iter()
            .take(Vitals::FIELDS.len())
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Plain-text rendering.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            match line.style {
                TextStyle::Title => {
                    text.push_str(&line.text);
                    text.push('\n');
                    text.push_str(&"=".repeat(line.text.chars().count()));
                }
                TextStyle::Heading => {
                    text.push('\n');
                    text.push_str(&line.text);
                }
                TextStyle::ListItem => {
                    text.push_str("  • ");
                    text.push_str(&line.text);
                }
                TextStyle::Emphasis | TextStyle::Body => {
                    text.push_str("  ");
                    text.push_str(&line.text);
                }
                TextStyle::Footnote => {
                    text.push('\n');
                    text.push_str(&line.text);
                }
                TextStyle::Subtitle => text.push_str(&line.text),
            }
            text.push('\n');
        }
        text
    }
}
