//! Flattening a Figma document tree into design records.

use tracing::debug;

use crate::types::{ColorValue, DesignRecord};

use super::api_types::FigmaNodeData;

/// Walk the document depth-first, parent before children, collecting one
/// design record per node that carries absolute geometry.
///
/// The traversal order here fixes the ordering of the comparison verdict
/// downstream. Nodes without a bounding box (components off-canvas, slices)
/// are skipped with a debug log; partial documents are expected input.
pub fn extract_design_records(document: &FigmaNodeData) -> Vec<DesignRecord> {
    let mut records = Vec::new();
    collect(document, 0, &mut records);
    records
}

fn collect(node: &FigmaNodeData, depth: usize, records: &mut Vec<DesignRecord>) {
    match node.absolute_bounding_box.as_ref() {
        Some(bounds) => {
            let name = if node.name.is_empty() {
                "Unnamed".to_string()
            } else {
                node.name.clone()
            };
            // First fill only; fills without a color (image fills) yield none.
            let color = node
                .fills
                .first()
                .and_then(|fill| fill.color.clone())
                .map(ColorValue::Rgba);

            let record = DesignRecord {
                selector: None,
                name: Some(name),
                width: Some(bounds.width),
                height: Some(bounds.height),
                color,
                background_color: None,
                font_family: node.style.as_ref().and_then(|s| s.font_family.clone()),
                font_size: node.style.as_ref().and_then(|s| s.font_size),
                border: None,
            };
            debug!(depth, name = %node.name, "collected design element");
            records.push(record);
        }
        None => debug!(depth, name = %node.name, "skipped node without absolute geometry"),
    }

    for child in &node.children {
        collect(child, depth + 1, records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DesignColor;
    use serde_json::json;

    fn document(value: serde_json::Value) -> FigmaNodeData {
        serde_json::from_value(value).expect("valid node fixture")
    }

    #[test]
    fn traversal_is_depth_first_parent_before_children() {
        let doc = document(json!({
            "id": "0:0", "name": "Document", "type": "DOCUMENT",
            "children": [
                {
                    "id": "1:0", "name": "Frame A", "type": "FRAME",
                    "absoluteBoundingBox": {"x": 0, "y": 0, "width": 100, "height": 50},
                    "children": [
                        {
                            "id": "1:1", "name": "Child A1", "type": "TEXT",
                            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}
                        },
                        {
                            "id": "1:2", "name": "Child A2", "type": "TEXT",
                            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}
                        }
                    ]
                },
                {
                    "id": "2:0", "name": "Frame B", "type": "FRAME",
                    "absoluteBoundingBox": {"x": 0, "y": 0, "width": 100, "height": 50}
                }
            ]
        }));

        let records = extract_design_records(&doc);
        let names: Vec<&str> = records.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["Frame A", "Child A1", "Child A2", "Frame B"]);
    }

    #[test]
    fn nodes_without_bounding_box_are_skipped_but_children_still_walked() {
        let doc = document(json!({
            "id": "0:0", "name": "Document", "type": "DOCUMENT",
            "children": [{
                "id": "1:0", "name": "Page", "type": "CANVAS",
                "children": [{
                    "id": "1:1", "name": "Hero", "type": "FRAME",
                    "absoluteBoundingBox": {"x": 0, "y": 0, "width": 1440, "height": 600}
                }]
            }]
        }));

        let records = extract_design_records(&doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Hero"));
        assert_eq!(records[0].width, Some(1440.0));
        assert_eq!(records[0].height, Some(600.0));
    }

    #[test]
    fn first_fill_color_is_taken_when_present() {
        let doc = document(json!({
            "id": "1:0", "name": "Box", "type": "RECTANGLE",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 10, "height": 10},
            "fills": [
                {"type": "SOLID", "color": {"r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0}},
                {"type": "SOLID", "color": {"r": 0.0, "g": 1.0, "b": 0.0, "a": 1.0}}
            ]
        }));

        let records = extract_design_records(&doc);
        assert_eq!(
            records[0].color,
            Some(ColorValue::Rgba(DesignColor {
                r: 1.0,
                g: 0.0,
                b: 0.0,
                a: 1.0
            }))
        );
    }

    #[test]
    fn fill_without_color_yields_no_color() {
        let doc = document(json!({
            "id": "1:0", "name": "Photo", "type": "RECTANGLE",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 10, "height": 10},
            "fills": [{"type": "IMAGE"}]
        }));

        let records = extract_design_records(&doc);
        assert!(records[0].color.is_none());
    }

    #[test]
    fn type_style_maps_to_font_fields() {
        let doc = document(json!({
            "id": "1:0", "name": "Title", "type": "TEXT",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 300, "height": 40},
            "style": {"fontFamily": "Inter", "fontSize": 32.0, "fontWeight": 700.0}
        }));

        let records = extract_design_records(&doc);
        assert_eq!(records[0].font_family.as_deref(), Some("Inter"));
        assert_eq!(records[0].font_size, Some(32.0));
    }

    #[test]
    fn unnamed_node_falls_back_to_placeholder() {
        let doc = document(json!({
            "id": "1:0", "type": "RECTANGLE",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}
        }));

        let records = extract_design_records(&doc);
        assert_eq!(records[0].name.as_deref(), Some("Unnamed"));
    }
}
