//! End-to-end checks of the comparison engine and the JSON it emits.

use serde_json::json;

use spc_lib::types::{ColorValue, DesignRecord, Issue, PageRecord};
use spc_lib::{compare_elements, Verdict};

fn design(name: &str) -> DesignRecord {
    DesignRecord {
        name: Some(name.to_string()),
        ..DesignRecord::default()
    }
}

fn page(tag: &str) -> PageRecord {
    PageRecord {
        tag: Some(tag.to_string()),
        ..PageRecord::default()
    }
}

#[test]
fn full_verdict_serializes_to_expected_shape() {
    let design = vec![
        DesignRecord {
            name: Some("Header".to_string()),
            font_family: Some("Inter".to_string()),
            ..DesignRecord::default()
        },
        design("Footer"),
        DesignRecord {
            name: Some("Hero".to_string()),
            font_family: Some("Roboto".to_string()),
            ..DesignRecord::default()
        },
    ];
    let page = vec![
        PageRecord {
            tag: Some("Header".to_string()),
            font_family: Some("Inter".to_string()),
            ..PageRecord::default()
        },
        PageRecord {
            tag: Some("Hero".to_string()),
            font_family: Some("Arial".to_string()),
            ..PageRecord::default()
        },
    ];

    let verdict = compare_elements(&design, &page);
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(
        json,
        json!({
            "differences": [
                {
                    "element": "Footer",
                    "issue": "Element not found on the website"
                },
                {
                    "element": "Hero",
                    "issue": "Style mismatch",
                    "details": [{
                        "property": "font-family",
                        "expected": "Roboto",
                        "actual": "Arial"
                    }]
                }
            ],
            "matched": [
                {"element": "Header"}
            ]
        })
    );
}

#[test]
fn verdict_round_trips_through_json() {
    let design = vec![
        DesignRecord {
            name: Some("Card".to_string()),
            width: Some(320.0),
            ..DesignRecord::default()
        },
        design("Gone"),
    ];
    let page = vec![PageRecord {
        tag: Some("Card".to_string()),
        width: Some(300.0),
        ..PageRecord::default()
    }];

    let verdict = compare_elements(&design, &page);
    let text = serde_json::to_string(&verdict).unwrap();
    let parsed: Verdict = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed, verdict);
    assert_eq!(parsed.differences[0].issue, Issue::StyleMismatch);
    assert_eq!(parsed.differences[1].issue, Issue::NotFound);
}

#[test]
fn structured_design_color_never_equals_css_text() {
    let design = vec![DesignRecord {
        name: Some("Badge".to_string()),
        color: Some(ColorValue::Rgba(spc_lib::types::DesignColor {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        })),
        ..DesignRecord::default()
    }];
    let page = vec![PageRecord {
        tag: Some("Badge".to_string()),
        color: Some("rgb(0, 0, 0)".to_string()),
        ..PageRecord::default()
    }];

    let verdict = compare_elements(&design, &page);

    assert_eq!(verdict.differences.len(), 1);
    let detail = &verdict.differences[0].details[0];
    assert_eq!(detail.expected, json!({"r": 0.0, "g": 0.0, "b": 0.0, "a": 1.0}));
    assert_eq!(detail.actual, json!("rgb(0, 0, 0)"));
}

#[test]
fn page_selector_outranks_tag_during_alignment() {
    let design = vec![DesignRecord {
        selector: Some("<div class=\"hero\">".to_string()),
        name: Some("Hero".to_string()),
        ..DesignRecord::default()
    }];
    let page = vec![
        page("Hero"),
        PageRecord {
            tag: Some("DIV".to_string()),
            selector: Some("<div class=\"hero\">".to_string()),
            font_family: Some("Inter".to_string()),
            ..PageRecord::default()
        },
    ];

    let verdict = compare_elements(&design, &page);

    // The selector identity aligns with the second page element.
    assert_eq!(verdict.matched.len(), 1);
    assert_eq!(verdict.matched[0].element, "<div class=\"hero\">");
}

#[test]
fn empty_inputs_produce_an_empty_verdict() {
    let verdict = compare_elements(&[], &[]);
    assert!(verdict.is_empty());

    let verdict = compare_elements(&[], &[page("DIV")]);
    assert!(verdict.is_empty());
}
