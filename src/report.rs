//! Report sink: PDF rendering of a verdict and the keyed result store.
//!
//! The store maps a report id to the verdict it was created from, so
//! concurrent requests each keep their own pending report instead of
//! clobbering a shared slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::types::Verdict;
use crate::{Result, SpcError};

// US Letter.
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const TOP_MARGIN: f32 = 18.0;
const BOTTOM_MARGIN: f32 = 18.0;
const LINE_STEP: f32 = 6.0;

/// Keyed store of comparison verdicts awaiting report generation.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    verdicts: Arc<Mutex<HashMap<Uuid, Verdict>>>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a verdict and hand back the id that retrieves it.
    pub fn store(&self, verdict: Verdict) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().insert(id, verdict);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Verdict> {
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Verdict>> {
        match self.verdicts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Render a verdict as a paginated PDF report.
///
/// An empty verdict is an error: there is nothing to report on, and the
/// service maps this to a 400 rather than emitting a blank document.
pub fn render_pdf(verdict: &Verdict) -> Result<Vec<u8>> {
    if verdict.is_empty() {
        return Err(SpcError::Report(
            "No comparison results available".to_string(),
        ));
    }

    let mut writer = ReportWriter::new()?;
    writer.line("GUI Comparison Report", 14.0, 12.0, true);
    writer.gap(4.0);

    if !verdict.matched.is_empty() {
        writer.line("Matched Elements:", 12.0, 12.0, true);
        for element in &verdict.matched {
            writer.line(
                &format!("{}: All styles match", element.element),
                11.0,
                16.0,
                false,
            );
        }
        writer.gap(4.0);
    }

    if !verdict.differences.is_empty() {
        writer.line("Differences:", 12.0, 12.0, true);
        for diff in &verdict.differences {
            writer.line(&format!("{}: {}", diff.element, diff.issue), 11.0, 16.0, false);
            for detail in &diff.details {
                writer.line(
                    &format!(
                        "- {}: expected {}, got {}",
                        detail.property,
                        display_value(&detail.expected),
                        display_value(&detail.actual)
                    ),
                    10.0,
                    20.0,
                    false,
                );
            }
            writer.gap(2.0);
        }
    }

    let bytes = writer.finish()?;
    info!(bytes = bytes.len(), "PDF report rendered");
    Ok(bytes)
}

/// Strings print without quotes; everything else keeps its JSON form.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cursor over the PDF pages; adds a page when a line would fall below the
/// bottom margin.
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl ReportWriter {
    fn new() -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            "GUI Comparison Report",
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "content",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: PAGE_HEIGHT - TOP_MARGIN,
        })
    }

    fn line(&mut self, text: &str, size: f32, indent: f32, bold: bool) {
        if self.y < BOTTOM_MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - TOP_MARGIN;
        }
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(indent), Mm(self.y), font);
        self.y -= LINE_STEP;
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(e: printpdf::Error) -> SpcError {
    SpcError::Report(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difference, Issue, MatchedElement, PropertyMismatch, StyleProperty};
    use serde_json::json;

    fn sample_verdict() -> Verdict {
        Verdict {
            differences: vec![
                Difference {
                    element: "Header".to_string(),
                    issue: Issue::StyleMismatch,
                    details: vec![PropertyMismatch {
                        property: StyleProperty::Color,
                        expected: json!("#000"),
                        actual: json!("rgb(17, 17, 17)"),
                    }],
                },
                Difference {
                    element: "Footer".to_string(),
                    issue: Issue::NotFound,
                    details: Vec::new(),
                },
            ],
            matched: vec![MatchedElement {
                element: "Hero".to_string(),
            }],
        }
    }

    #[test]
    fn store_round_trips_verdicts_under_distinct_ids() {
        let store = ReportStore::new();
        let first = store.store(sample_verdict());
        let second = store.store(Verdict::default());

        assert_ne!(first, second);
        assert_eq!(store.get(&first), Some(sample_verdict()));
        assert_eq!(store.get(&second), Some(Verdict::default()));
    }

    #[test]
    fn unknown_id_yields_none() {
        let store = ReportStore::new();
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn empty_verdict_is_a_report_error() {
        let err = render_pdf(&Verdict::default()).unwrap_err();
        assert!(matches!(err, SpcError::Report(_)));
    }

    #[test]
    fn rendered_pdf_has_pdf_header() {
        let bytes = render_pdf(&sample_verdict()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn many_entries_paginate_without_panicking() {
        let verdict = Verdict {
            differences: Vec::new(),
            matched: (0..200)
                .map(|i| MatchedElement {
                    element: format!("Element {i}"),
                })
                .collect(),
        };
        let bytes = render_pdf(&verdict).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn display_value_strips_quotes_from_strings_only() {
        assert_eq!(display_value(&json!("16px")), "16px");
        assert_eq!(display_value(&json!(16.0)), "16.0");
        assert_eq!(
            display_value(&json!({"r": 1.0})),
            r#"{"r":1.0}"#
        );
    }
}
