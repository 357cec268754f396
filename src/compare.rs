//! The style comparison and reconciliation engine.
//!
//! Takes the flat design-record and page-record sequences, aligns them by
//! identity, computes property-level diffs, and classifies every design
//! element as matched, mismatched, or missing. Pure and synchronous: no I/O,
//! no shared state, inputs are never mutated, and malformed records are
//! skipped with a warning rather than aborting the run.

use serde_json::Value;
use tracing::warn;

use crate::types::{
    DesignRecord, Difference, Issue, MatchedElement, PageRecord, PropertyMismatch, StyleProperty,
    Verdict,
};

/// Every property the engine checks, in report order.
///
/// Margin, padding and border stay in the table even though one side can
/// never express them; their accessors return `None` for that side, so the
/// asymmetry is visible here instead of silently nulled fields.
const COMPARED_PROPERTIES: [StyleProperty; 9] = [
    StyleProperty::Width,
    StyleProperty::Height,
    StyleProperty::Color,
    StyleProperty::BackgroundColor,
    StyleProperty::FontFamily,
    StyleProperty::FontSize,
    StyleProperty::Margin,
    StyleProperty::Padding,
    StyleProperty::Border,
];

/// Compare design intent against the rendered page.
///
/// Every design record with a resolvable identity lands in exactly one of
/// `matched` or `differences`, in design traversal order. Page elements the
/// design never mentions are not reported; the engine only evaluates what
/// the design declares. Empty inputs yield an empty verdict, not an error.
pub fn compare_elements(design: &[DesignRecord], page: &[PageRecord]) -> Verdict {
    let mut differences = Vec::new();
    let mut matched = Vec::new();

    for record in design {
        let Some(identity) = identity(record) else {
            warn!("design element without a selector or name, skipping");
            continue;
        };

        let Some(candidate) = align(identity, page) else {
            warn!(element = identity, "element not found on the website");
            differences.push(Difference {
                element: identity.to_string(),
                issue: Issue::NotFound,
                details: Vec::new(),
            });
            continue;
        };

        let mismatches: Vec<PropertyMismatch> = COMPARED_PROPERTIES
            .iter()
            .filter_map(|&property| {
                // Absence on either side is never a mismatch: there is
                // nothing to enforce, or nothing was observed.
                let expected = expected_value(record, property)?;
                let actual = actual_value(candidate, property)?;
                (expected != actual).then_some(PropertyMismatch {
                    property,
                    expected,
                    actual,
                })
            })
            .collect();

        if mismatches.is_empty() {
            matched.push(MatchedElement {
                element: identity.to_string(),
            });
        } else {
            warn!(
                element = identity,
                count = mismatches.len(),
                "style mismatch"
            );
            differences.push(Difference {
                element: identity.to_string(),
                issue: Issue::StyleMismatch,
                details: mismatches,
            });
        }
    }

    Verdict {
        differences,
        matched,
    }
}

/// Identity key for a design record: explicit selector first, then the
/// human-readable name. Empty strings count as absent.
fn identity(record: &DesignRecord) -> Option<&str> {
    record
        .selector
        .as_deref()
        .or(record.name.as_deref())
        .filter(|s| !s.is_empty())
}

/// First page record whose selector or tag equals the identity.
///
/// First-match, not best-match: when several rendered elements share the
/// identity (repeated list items, say) the earliest in extraction order wins.
/// Deterministic by construction, at the cost of ambiguous-match accuracy.
fn align<'a>(identity: &str, page: &'a [PageRecord]) -> Option<&'a PageRecord> {
    page.iter().find(|candidate| {
        candidate.selector.as_deref() == Some(identity) || candidate.tag.as_deref() == Some(identity)
    })
}

fn expected_value(record: &DesignRecord, property: StyleProperty) -> Option<Value> {
    match property {
        StyleProperty::Width => record.width.map(Value::from),
        StyleProperty::Height => record.height.map(Value::from),
        StyleProperty::Color => record.color.as_ref().map(color_value),
        StyleProperty::BackgroundColor => text(&record.background_color),
        StyleProperty::FontFamily => text(&record.font_family),
        StyleProperty::FontSize => record.font_size.map(Value::from),
        // The design source has no spacing concept.
        StyleProperty::Margin | StyleProperty::Padding => None,
        StyleProperty::Border => text(&record.border),
    }
}

fn actual_value(record: &PageRecord, property: StyleProperty) -> Option<Value> {
    match property {
        StyleProperty::Width => record.width.map(Value::from),
        StyleProperty::Height => record.height.map(Value::from),
        StyleProperty::Color => text(&record.color),
        StyleProperty::BackgroundColor => text(&record.background),
        StyleProperty::FontFamily => text(&record.font_family),
        StyleProperty::FontSize => text(&record.font_size),
        StyleProperty::Margin => text(&record.margin),
        StyleProperty::Padding => text(&record.padding),
        // The capturer never extracts borders.
        StyleProperty::Border => None,
    }
}

fn text(value: &Option<String>) -> Option<Value> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
}

fn color_value(color: &crate::types::ColorValue) -> Value {
    use crate::types::ColorValue;
    match color {
        ColorValue::Text(s) => Value::String(s.clone()),
        ColorValue::Rgba(c) => serde_json::json!({
            "r": c.r,
            "g": c.g,
            "b": c.b,
            "a": c.a,
        }),
    }
}
