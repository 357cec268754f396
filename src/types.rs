//! Core data types: style records from both sources and the verdict shape.
//!
//! The field names and nesting of [`Verdict`], [`Difference`] and
//! [`PropertyMismatch`] are a wire contract: the HTTP response serializer and
//! the PDF report sink both consume them, and the report sink branches on the
//! literal [`Issue`] strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// RGBA color as design tools emit it (channels in the 0.0-1.0 range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl DesignColor {
    /// Convert to hex color string (e.g., "#ff7f00").
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0) as u8,
            (self.g * 255.0) as u8,
            (self.b * 255.0) as u8
        )
    }
}

/// A color as carried by a design record.
///
/// Design tools emit a structured RGBA object while rendered pages emit CSS
/// color text. No normalization is performed between the two: values are
/// compared by raw equality and only match when both sides produce the same
/// textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Rgba(DesignColor),
    Text(String),
}

/// Style intent for one element of the design document.
///
/// Margin and padding are deliberately absent: the design source cannot
/// express them, so those properties are only ever checkable from the page
/// side and no check is emitted for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DesignRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

/// Computed styles for one rendered element.
///
/// Border is deliberately absent: the capturer never extracts it, the mirror
/// image of the margin/padding asymmetry on [`DesignRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Truncated outerHTML, used as a fine-grained identity when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

/// The fixed set of properties the engine knows how to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleProperty {
    Width,
    Height,
    Color,
    BackgroundColor,
    FontFamily,
    FontSize,
    Margin,
    Padding,
    Border,
}

impl StyleProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleProperty::Width => "width",
            StyleProperty::Height => "height",
            StyleProperty::Color => "color",
            StyleProperty::BackgroundColor => "background-color",
            StyleProperty::FontFamily => "font-family",
            StyleProperty::FontSize => "font-size",
            StyleProperty::Margin => "margin",
            StyleProperty::Padding => "padding",
            StyleProperty::Border => "border",
        }
    }
}

impl std::fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a design element ended up in the differences list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issue {
    #[serde(rename = "Style mismatch")]
    StyleMismatch,
    #[serde(rename = "Element not found on the website")]
    NotFound,
}

impl Issue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Issue::StyleMismatch => "Style mismatch",
            Issue::NotFound => "Element not found on the website",
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One disagreeing property with both values verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMismatch {
    pub property: StyleProperty,
    pub expected: Value,
    pub actual: Value,
}

/// A design element the page failed to reproduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub element: String,
    pub issue: Issue,
    /// Empty (and omitted from the wire) for missing elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<PropertyMismatch>,
}

/// A design element whose every comparable property agreed with the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedElement {
    pub element: String,
}

/// The engine's output: both lists follow the design traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub differences: Vec<Difference>,
    pub matched: Vec<MatchedElement>,
}

impl Verdict {
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty() && self.matched.is_empty()
    }
}
