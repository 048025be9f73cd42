//! Action normalization - validates and repairs model output against the
//! sheet snapshot
//!
//! Normalization never rejects an action for missing or invalid optional
//! fields; it defaults or drops instead, on the premise that a partial
//! best-effort action beats a hard failure. The only errors that reach
//! the caller come from upstream extraction. Repairs that lose
//! information (dropped pivot fields) are recorded as warnings on the
//! normalized action.

use crate::action::extract::strip_fences;
use crate::action::{
    ActionKind, ActionParams, AggFunction, ChartParams, FormulaParams, NormalizedAction,
    PivotParams, PivotValue,
};
use crate::sheet::SheetSnapshot;
use serde_json::{Map, Value};

/// Normalize an extracted model document into a validated action.
///
/// The document is expected in the interpret-query shape:
/// `{"action": ..., "parameters": {...}, "explanation": ...}`. Unknown or
/// missing kinds become [`ActionKind::Generic`].
pub fn normalize(doc: &Map<String, Value>, snapshot: &SheetSnapshot) -> NormalizedAction {
    let kind = doc
        .get("action")
        .cloned()
        .and_then(|v| serde_json::from_value::<ActionKind>(v).ok())
        .unwrap_or_default();

    let explanation = doc
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let raw_params = doc
        .get("parameters")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let mut warnings = Vec::new();
    let params = match kind {
        ActionKind::Formula => ActionParams::Formula(normalize_formula_params(&raw_params)),
        ActionKind::Chart => ActionParams::Chart(normalize_chart_params(&raw_params, snapshot)),
        ActionKind::PivotTable => {
            let pivot = normalize_pivot_params(&raw_params, snapshot, &mut warnings);
            ActionParams::Pivot(pivot)
        }
        ActionKind::Filter | ActionKind::Sort | ActionKind::Other | ActionKind::Generic => {
            ActionParams::Opaque(raw_params)
        }
    };

    NormalizedAction {
        kind,
        params,
        explanation,
        warnings,
    }
}

/// Ensure a formula string starts with exactly one `=`, stripping any
/// code fences the model wrapped it in. Idempotent.
pub fn normalize_formula_text(raw: &str) -> String {
    let formula = strip_fences(raw);
    if formula.starts_with('=') {
        formula.to_string()
    } else {
        format!("={formula}")
    }
}

fn normalize_formula_params(raw: &Value) -> FormulaParams {
    let mut params: FormulaParams =
        serde_json::from_value(raw.clone()).unwrap_or_default();
    params.formula = normalize_formula_text(&params.formula);
    if params.target_cell.trim().is_empty() {
        params.target_cell = "A1".to_string();
    }
    params
}

/// Normalize chart parameters: lenient chart-type parse (handled at
/// deserialization) and data-range fallback to the snapshot's suggested
/// range.
pub fn normalize_chart_params(raw: &Value, snapshot: &SheetSnapshot) -> ChartParams {
    let mut params: ChartParams = serde_json::from_value(raw.clone()).unwrap_or_default();
    if params.data_range.trim().is_empty() {
        params.data_range = snapshot.suggested_range();
        tracing::debug!(data_range = %params.data_range, "chart dataRange missing, using suggested range");
    }
    params
}

/// Normalize pivot parameters against the snapshot headers.
///
/// Field references that do not exactly match a trimmed snapshot header
/// are dropped and reported via `warnings`. An empty `values` list after
/// filtering gets one injected aggregation: sum over the first
/// numeric-majority column, else count over the first header. Only a
/// sheet with no headers at all leaves `values` empty.
pub fn normalize_pivot_params(
    raw: &Value,
    snapshot: &SheetSnapshot,
    warnings: &mut Vec<String>,
) -> PivotParams {
    let params: PivotParams = serde_json::from_value(raw.clone()).unwrap_or_default();
    let available = snapshot.available_headers();

    let keep_matching = |fields: Vec<String>, slot: &str, warnings: &mut Vec<String>| {
        let mut kept = Vec::new();
        for field in fields {
            if available.iter().any(|h| h == &field) {
                kept.push(field);
            } else {
                warnings.push(format!(
                    "pivot {slot} field '{field}' does not match any sheet header; dropped"
                ));
            }
        }
        kept
    };

    let rows = keep_matching(params.rows, "row", warnings);
    let columns = keep_matching(params.columns, "column", warnings);
    let filters = keep_matching(params.filters, "filter", warnings);

    let mut values = Vec::new();
    for value in params.values {
        if available.iter().any(|h| h == &value.field) {
            values.push(value);
        } else {
            warnings.push(format!(
                "pivot value field '{}' does not match any sheet header; dropped",
                value.field
            ));
        }
    }

    if values.is_empty() {
        let numeric = snapshot.numeric_majority_columns();
        if let Some(field) = numeric.first() {
            tracing::warn!(field = %field, "pivot values empty, injecting sum over numeric column");
            values.push(PivotValue {
                field: field.clone(),
                function: AggFunction::Sum,
            });
        } else if let Some(field) = available.first() {
            tracing::warn!(field = %field, "pivot values empty, injecting count over first header");
            values.push(PivotValue {
                field: field.clone(),
                function: AggFunction::Count,
            });
        }
        // No headers at all: values stays empty, the generator's
        // defensive re-check covers it.
    }

    PivotParams {
        rows,
        columns,
        values,
        filters,
    }
}
