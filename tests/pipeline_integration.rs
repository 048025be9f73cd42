//! Integration tests for the extract -> normalize -> generate pipeline

use gridpilot::action::extract::extract;
use gridpilot::action::normalize::normalize;
use gridpilot::action::script::generate;
use gridpilot::action::{ActionKind, ActionParams, AggFunction, PivotValue};
use gridpilot::sheet::{CellValue, SheetSnapshot};
use proptest::prelude::*;
use serde_json::json;

fn snapshot(headers: &[&str], sample: &[&[CellValue]]) -> SheetSnapshot {
    SheetSnapshot {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        data_sample: sample.iter().map(|row| row.to_vec()).collect(),
        row_count: sample.len() as u32,
        column_count: headers.len() as u32,
        ..Default::default()
    }
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.into())
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

/// Test 1: pivot with empty values over a numeric column injects a sum.
#[test]
fn test_pivot_empty_values_numeric_column() {
    let snap = snapshot(
        &["Region", "Sales"],
        &[
            &[text("Region"), text("Sales")],
            &[text("North"), num(100.0)],
            &[text("South"), num(200.0)],
        ],
    );
    let raw = r#"{"action": "pivot_table", "parameters": {"rows": ["Region"], "values": []}, "explanation": "pivot"}"#;

    let doc = extract(raw).unwrap();
    let action = normalize(&doc, &snap);

    match &action.params {
        ActionParams::Pivot(p) => {
            assert_eq!(
                p.values,
                vec![PivotValue {
                    field: "Sales".into(),
                    function: AggFunction::Sum,
                }]
            );
        }
        other => panic!("unexpected params: {other:?}"),
    }

    let generated = generate(&action);
    assert!(generated.office_script.contains("Excel.AggregationFunction.sum"));
    assert!(generated.office_script.contains(r#"getItem("Sales")"#));
}

/// Test 2: no numeric columns falls back to counting the first header.
#[test]
fn test_pivot_empty_values_text_only_sheet() {
    let snap = snapshot(
        &["Name", "Status"],
        &[
            &[text("Name"), text("Status")],
            &[text("Ada"), text("Active")],
            &[text("Grace"), text("Inactive")],
        ],
    );
    let doc = extract(r#"{"action": "pivot_table", "parameters": {}}"#).unwrap();
    let action = normalize(&doc, &snap);

    match &action.params {
        ActionParams::Pivot(p) => {
            assert_eq!(
                p.values,
                vec![PivotValue {
                    field: "Name".into(),
                    function: AggFunction::Count,
                }]
            );
        }
        other => panic!("unexpected params: {other:?}"),
    }
}

/// Test 3: chart with no dataRange and "None" selection synthesizes the
/// range from sheet dimensions.
#[test]
fn test_chart_range_synthesized_from_dimensions() {
    let mut snap = snapshot(&["A", "B", "C"], &[]);
    snap.selected_range = Some("None".into());
    snap.row_count = 12;
    snap.column_count = 3;

    let doc = extract(r#"{"action": "chart", "parameters": {"chartType": "line"}}"#).unwrap();
    let action = normalize(&doc, &snap);

    match &action.params {
        ActionParams::Chart(p) => assert_eq!(p.data_range, "A1:C12"),
        other => panic!("unexpected params: {other:?}"),
    }

    let generated = generate(&action);
    assert!(generated.office_script.contains(r#"sheet.getRange("A1:C12")"#));
    assert!(generated.office_script.contains("Excel.ChartType.line"));
}

/// Test 4: formula document compiles to a script assigning the formula
/// to the target cell.
#[test]
fn test_formula_end_to_end() {
    let raw = r#"{"action": "formula", "parameters": {"formula": "SUM(A1:A10)", "targetCell": "B1"}, "explanation": "sum column A"}"#;
    let doc = extract(raw).unwrap();
    let action = normalize(&doc, &SheetSnapshot::default());
    let generated = generate(&action);

    assert_eq!(generated.action, ActionKind::Formula);
    assert_eq!(generated.explanation, "sum column A");
    assert!(generated.office_script.contains(r#"sheet.getRange("B1")"#));
    assert!(generated
        .office_script
        .contains(r#"range.formulas = [["=SUM(A1:A10)"]]"#));
    assert_eq!(generated.parameters["formula"], "=SUM(A1:A10)");
    assert_eq!(generated.parameters["targetCell"], "B1");
}

/// Fenced model output extracts to the same document as bare output.
#[test]
fn test_fenced_output_extraction() {
    let doc = extract("```json\n{\"action\":\"chart\"}\n```").unwrap();
    assert_eq!(doc.get("action").unwrap(), "chart");
}

/// Pivot fields that match no header are dropped and reported; the
/// response still carries a usable script.
#[test]
fn test_pivot_dropped_fields_surface_warnings() {
    let snap = snapshot(
        &["Region", "Sales"],
        &[
            &[text("Region"), text("Sales")],
            &[text("North"), num(100.0)],
        ],
    );
    let raw = r#"{
        "action": "pivot_table",
        "parameters": {
            "rows": ["Region", "Territory"],
            "values": [{"field": "Revenue", "function": "sum"}],
            "filters": []
        }
    }"#;
    let doc = extract(raw).unwrap();
    let action = normalize(&doc, &snap);
    let generated = generate(&action);

    assert_eq!(generated.warnings.len(), 2);
    assert!(generated.warnings.iter().any(|w| w.contains("Territory")));
    assert!(generated.warnings.iter().any(|w| w.contains("Revenue")));
    // Revenue was dropped, so the numeric fallback kicked in.
    assert!(generated.office_script.contains(r#"getItem("Sales")"#));
}

/// Unknown action kinds compile to the generic no-op script with the
/// parameters passed through untouched.
#[test]
fn test_unknown_kind_generic_script() {
    let doc = extract(r#"{"action": "resize_rows", "parameters": {"height": 20}}"#).unwrap();
    let action = normalize(&doc, &SheetSnapshot::default());
    let generated = generate(&action);

    assert_eq!(generated.action, ActionKind::Generic);
    assert_eq!(generated.office_script, "// Action not yet implemented");
    assert_eq!(generated.parameters["height"], 20);
}

/// A quote inside a formula must not break the emitted script.
#[test]
fn test_formula_with_quotes_stays_balanced() {
    let raw = r#"{"action": "formula", "parameters": {"formula": "=COUNTIF(A:A,\"done\")", "targetCell": "C1"}}"#;
    let doc = extract(raw).unwrap();
    let action = normalize(&doc, &SheetSnapshot::default());
    let generated = generate(&action);

    // Every quote inside the formula literal is escaped.
    assert!(generated
        .office_script
        .contains(r#"[["=COUNTIF(A:A,\"done\")"]]"#));
}

proptest! {
    /// Any combination of present/absent opening (with or without a tag)
    /// and closing fences around a valid document extracts identically.
    #[test]
    fn prop_fence_wrapping_is_transparent(
        open in prop::sample::select(vec!["", "```", "```json"]),
        close in prop::sample::select(vec!["", "```"]),
        pad in "[ \t\n]{0,3}",
    ) {
        let inner = r#"{"action":"chart","parameters":{"chartType":"pie"}}"#;
        let wrapped = format!("{pad}{open}\n{inner}\n{close}{pad}");

        let doc = extract(&wrapped).unwrap();
        let bare = extract(inner).unwrap();
        prop_assert_eq!(doc, bare);
    }
}
