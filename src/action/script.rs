//! Office-script generation - compiles a normalized action into the text
//! the host add-in executes
//!
//! Each template reproduces one fixed Office.js call sequence: active
//! worksheet lookup, the host API calls for the action, then a single
//! sync. Generation is a pure string composition; nothing here touches
//! the host runtime. All interpolated text goes through [`js_string`] so
//! a quote in a formula or title cannot break the emitted script.

use crate::action::{
    ActionKind, ActionParams, AggFunction, ChartParams, ChartType, FormulaParams,
    GeneratedAction, NormalizedAction, PivotParams, PivotValue,
};
use serde_json::Value;

impl ChartType {
    /// Host chart-type enum identifier.
    pub fn host_type(&self) -> &'static str {
        match self {
            ChartType::Line => "Excel.ChartType.line",
            ChartType::Bar => "Excel.ChartType.barClustered",
            ChartType::Column => "Excel.ChartType.columnClustered",
            ChartType::Pie => "Excel.ChartType.pie",
            ChartType::Area => "Excel.ChartType.area",
            ChartType::Scatter => "Excel.ChartType.xyscatter",
        }
    }
}

impl AggFunction {
    /// Host aggregation enum identifier.
    pub fn host_enum(&self) -> &'static str {
        match self {
            AggFunction::Sum => "Excel.AggregationFunction.sum",
            AggFunction::Count => "Excel.AggregationFunction.count",
            AggFunction::Average => "Excel.AggregationFunction.average",
            AggFunction::Max => "Excel.AggregationFunction.max",
            AggFunction::Min => "Excel.AggregationFunction.min",
        }
    }
}

/// Escape text for inclusion in a double-quoted JS string literal.
pub fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Compile a normalized action into the final pipeline output.
///
/// Total over its input: any kind without a dedicated template routes to
/// the generic no-op script, never an error.
pub fn generate(action: &NormalizedAction) -> GeneratedAction {
    match &action.params {
        ActionParams::Formula(p) => GeneratedAction {
            action: ActionKind::Formula,
            parameters: serde_json::to_value(p).unwrap_or(Value::Null),
            explanation: action.explanation.clone(),
            office_script: formula_script(p),
            warnings: action.warnings.clone(),
        },
        ActionParams::Chart(p) => GeneratedAction {
            action: ActionKind::Chart,
            parameters: serde_json::to_value(p).unwrap_or(Value::Null),
            explanation: action.explanation.clone(),
            office_script: chart_script(p),
            warnings: action.warnings.clone(),
        },
        ActionParams::Pivot(p) => GeneratedAction {
            action: ActionKind::PivotTable,
            parameters: serde_json::to_value(p).unwrap_or(Value::Null),
            explanation: action.explanation.clone(),
            office_script: pivot_script(p),
            warnings: action.warnings.clone(),
        },
        // filter/sort/other and anything unrecognized: no template yet,
        // raw parameters pass through unchanged.
        ActionParams::Opaque(raw) => GeneratedAction {
            action: ActionKind::Generic,
            parameters: raw.clone(),
            explanation: action.explanation.clone(),
            office_script: "// Action not yet implemented".to_string(),
            warnings: action.warnings.clone(),
        },
    }
}

fn formula_script(params: &FormulaParams) -> String {
    format!(
        r#"await Excel.run(async (context) => {{
    const sheet = context.workbook.worksheets.getActiveWorksheet();
    const range = sheet.getRange("{target}");
    range.formulas = [["{formula}"]];
    await context.sync();
}});
"#,
        target = js_string(&params.target_cell),
        formula = js_string(&params.formula),
    )
}

fn chart_script(params: &ChartParams) -> String {
    let title = params.title.as_deref().unwrap_or("Chart");
    format!(
        r#"await Excel.run(async (context) => {{
    const sheet = context.workbook.worksheets.getActiveWorksheet();
    const dataRange = sheet.getRange("{range}");

    const chart = sheet.charts.add(
        {chart_type},
        dataRange,
        Excel.ChartSeriesBy.auto
    );

    chart.title.text = "{title}";
    chart.legend.position = Excel.ChartLegendPosition.bottom;
    chart.legend.visible = true;

    chart.top = 20;
    chart.left = 400;
    chart.height = 300;
    chart.width = 500;

    await context.sync();
}});
"#,
        range = js_string(&params.data_range),
        chart_type = params.chart_type.host_type(),
        title = js_string(title),
    )
}

fn pivot_script(params: &PivotParams) -> String {
    let mut body = String::new();

    for field in &params.rows {
        body.push_str(&hierarchy_add("rowHierarchies", field));
    }
    for field in &params.columns {
        body.push_str(&hierarchy_add("columnHierarchies", field));
    }
    for field in &params.filters {
        body.push_str(&hierarchy_add("filterHierarchies", field));
    }

    // Defensive re-check: normalization guarantees a non-empty values
    // list whenever the sheet has headers, but never emit a pivot with
    // no aggregation at all.
    let synthetic;
    let values: &[PivotValue] = if params.values.is_empty() {
        synthetic = [PivotValue {
            field: params.rows.first().cloned().unwrap_or_default(),
            function: AggFunction::Count,
        }];
        &synthetic
    } else {
        &params.values
    };

    for (i, value) in values.iter().enumerate() {
        body.push_str(&format!(
            "    const dataHierarchy{i} = pivotTable.dataHierarchies.add(pivotTable.hierarchies.getItem(\"{field}\"));\n",
            field = js_string(&value.field),
        ));
        body.push_str(&format!(
            "    dataHierarchy{i}.summarizeBy = {agg};\n",
            agg = value.function.host_enum(),
        ));
    }

    format!(
        r#"await Excel.run(async (context) => {{
    const sheet = context.workbook.worksheets.getActiveWorksheet();
    const rangeToAnalyze = sheet.getUsedRange();

    const pivotTable = sheet.pivotTables.add(
        "AIPivotTable_" + Date.now(),
        rangeToAnalyze,
        sheet.getRange("A1")
    );

{body}
    await context.sync();
}});
"#
    )
}

fn hierarchy_add(collection: &str, field: &str) -> String {
    format!(
        "    pivotTable.{collection}.add(pivotTable.hierarchies.getItem(\"{field}\"));\n",
        field = js_string(field),
    )
}
