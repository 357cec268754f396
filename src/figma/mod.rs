//! Figma integration: the design-extractor collaborator.
//!
//! This module provides:
//! - [`FigmaClient`] - HTTP client for the Figma REST API
//! - [`extract_design_records`] - Document tree to flat design records
//! - [`parse_figma_url`] - File key extraction from share links
//! - API types for parsing Figma JSON responses

pub mod api_types;
pub mod client;
pub mod extract;

pub use api_types::{FigmaBoundingBox, FigmaFile, FigmaNodeData, FigmaPaintData, FigmaTypeStyle};
pub use client::{map_figma_error, FigmaClient, FigmaError};
pub use extract::extract_design_records;

use url::Url;

use crate::{Result, SpcError};

/// File key and optional node id parsed from a Figma share URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigmaInfo {
    pub file_key: String,
    pub node_id: Option<String>,
}

/// Extract the file key (and node id, if present) from a Figma URL.
///
/// Accepts both the legacy `/file/<KEY>/...` and the newer `/design/<KEY>/...`
/// path shapes.
pub fn parse_figma_url(value: &str) -> Result<FigmaInfo> {
    let url = Url::parse(value)?;

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();

    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design")
        .and_then(|i| path_segments.get(i + 1))
        .map(|s| s.to_string())
        .ok_or_else(|| {
            SpcError::Config(format!(
                "Figma URL missing file key in '{}'. Hint: use https://www.figma.com/file/<FILE_KEY>/...",
                value
            ))
        })?;

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| v.replace('-', ":"));

    Ok(FigmaInfo { file_key, node_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_url() {
        let info = parse_figma_url("https://www.figma.com/file/ABC123/My-Design?node-id=12-34")
            .unwrap();
        assert_eq!(info.file_key, "ABC123");
        assert_eq!(info.node_id, Some("12:34".to_string()));
    }

    #[test]
    fn parses_design_url() {
        let info =
            parse_figma_url("https://www.figma.com/design/XYZ789/Another-Design?node-id=5-10")
                .unwrap();
        assert_eq!(info.file_key, "XYZ789");
        assert_eq!(info.node_id, Some("5:10".to_string()));
    }

    #[test]
    fn node_id_is_optional() {
        let info = parse_figma_url("https://www.figma.com/file/ABC123/My-Design").unwrap();
        assert_eq!(info.file_key, "ABC123");
        assert!(info.node_id.is_none());
    }

    #[test]
    fn missing_file_key_is_a_config_error() {
        let err = parse_figma_url("https://www.figma.com/community/whatever").unwrap_err();
        assert!(matches!(err, SpcError::Config(_)));
        assert!(err.to_string().contains("file key"));
    }

    #[test]
    fn malformed_url_is_an_url_error() {
        let err = parse_figma_url("not a url").unwrap_err();
        assert!(matches!(err, SpcError::InvalidUrl(_)));
    }
}
