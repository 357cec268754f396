//! Style parity checker: compares the computed CSS of a rendered web page
//! against the design intent extracted from a Figma document.
//!
//! The pipeline has three collaborators feeding one engine:
//! - [`figma`] pulls a document from the Figma REST API and flattens it into
//!   design records
//! - [`capture`] loads the page in headless Chromium and harvests computed
//!   styles per element
//! - [`compare`] aligns both sides by identity and reports, per design
//!   element, whether it matched, mismatched (with per-property details), or
//!   was missing from the page
//!
//! [`server`] exposes the pipeline over HTTP; [`report`] renders a stored
//! verdict as a PDF.

pub mod capture;
pub mod compare;
pub mod config;
pub mod error;
pub mod figma;
pub mod report;
pub mod server;
pub mod types;

pub use capture::{CaptureOptions, PageCapturer};
pub use compare::compare_elements;
pub use config::Config;
pub use error::{ErrorCategory, ErrorPayload, Result, SpcError};
pub use figma::{extract_design_records, parse_figma_url, FigmaClient};
pub use report::{render_pdf, ReportStore};
pub use types::{DesignRecord, Difference, MatchedElement, PageRecord, Verdict};
