//! Instruction prompts and user-message builders
//!
//! Prompt content is a tunable input, not core logic; the builders pair
//! each instruction prompt with a user message carrying the query and a
//! rendering of the sheet snapshot.

use crate::sheet::SheetSnapshot;

/// Classify a request into an action kind plus parameters.
pub const INTERPRET_QUERY_PROMPT: &str = r#"You are an Excel AI assistant. Analyze the user's request and:
1. Determine the action type (formula, pivot_table, chart, filter, sort, etc.)
2. Extract necessary parameters
3. Provide a clear explanation

Context includes: selected range, sheet data, existing formulas.

Action types:
- "formula": For calculations and formulas
- "pivot_table": For pivot tables
- "chart": For graphs, plots, visualizations (use keywords: plot, chart, graph, visualize)
- "filter": For filtering data
- "sort": For sorting data
- "other": For other actions

For FORMULA actions, you MUST include:
- "formula": the Excel formula (starting with =)
- "targetCell": the cell address where the formula should go

For CHART actions, just set action to "chart" and provide explanation.

Respond ONLY with valid JSON in this exact format (no markdown, no extra text):
{
    "action": "formula|pivot_table|chart|filter|sort|other",
    "parameters": {},
    "explanation": "Clear explanation of what will be done"
}
"#;

/// Generate a bare Excel formula.
pub const GENERATE_FORMULA_PROMPT: &str = r#"You are an Excel formula expert. Generate valid Excel formulas.
- Use proper Excel function syntax
- Consider the data context provided
- Return ONLY the formula, starting with =
"#;

/// Generate a chart configuration.
pub const GENERATE_CHART_PROMPT: &str = r#"You are an Excel chart expert. Generate chart configurations.

Analyze the data provided and create an appropriate chart configuration.

IMPORTANT: For dataRange, you must specify the EXACT range of data to chart.
- If headers are in row 1 and data is in rows 2-10, use "A1:B10" (includes headers)
- If user has selected a range, use that range
- Make sure to include all relevant data columns

Respond ONLY with valid JSON in this exact format (no markdown, no extra text):
{
    "chartType": "line|bar|column|pie|area|scatter",
    "dataRange": "A1:B10",
    "title": "Chart Title",
    "xAxis": {
        "column": "column_name_or_range",
        "title": "X Axis Title"
    },
    "yAxis": {
        "column": "column_name_or_range",
        "title": "Y Axis Title"
    },
    "position": "E2"
}

Chart Types:
- line: Line chart (trends over time)
- bar: Horizontal bar chart
- column: Vertical bar chart (default)
- pie: Pie chart (parts of a whole)
- area: Area chart (cumulative values)
- scatter: Scatter plot (correlation)

Rules:
1. dataRange MUST include the headers if present
2. Choose chart type based on data structure
3. For time series data, use line charts
4. For categorical comparisons, use column/bar charts
5. For parts-of-whole, use pie charts
"#;

/// Generate a pivot-table configuration.
pub const GENERATE_PIVOT_PROMPT: &str = r#"You are an Excel pivot table expert. Generate pivot table configurations.

Analyze the user's request and the data structure to create an appropriate pivot table.

CRITICAL RULES:
1. Column names MUST exactly match the headers provided in the context
2. The "values" array MUST NEVER be empty - always include at least one field to aggregate
3. If user mentions filtering (e.g., "for Germany", "Midmarket segment"), put those fields in "filters" array
4. Default aggregation: use "count" for text fields, "sum" for numeric fields

Field purposes:
- rows: Fields to group by (categories, dimensions) - what you want to see broken down
- columns: Fields to spread across columns (optional) - for cross-tabulation
- values: Fields to aggregate (REQUIRED) - what you want to calculate/measure
- filters: Fields to filter by - when user says "for X" or "in Y"

Respond ONLY with valid JSON in this exact format (no markdown):
{
    "rows": ["exact_column_name"],
    "columns": [],
    "values": [
        {
            "field": "exact_column_name",
            "function": "sum|count|average|max|min"
        }
    ],
    "filters": ["exact_column_name"]
}

REMEMBER: "values" array must ALWAYS have at least one item!
"#;

/// User message for query interpretation.
pub fn interpret_user_message(query: &str, snapshot: &SheetSnapshot) -> String {
    format!(
        "Query: {query}\n\n\
         Excel Context:\n{context}\n\
         If the user doesn't specify where to put the formula, use the first \
         empty cell after the selected range or data.\n",
        context = snapshot.summary(),
    )
}

/// User message for bare formula generation.
pub fn formula_user_message(query: &str, snapshot: &SheetSnapshot) -> String {
    format!(
        "Create an Excel formula for: {query}\n\n\
         Context:\n\
         - Column Headers: {headers}\n\
         - Data Range: {range}\n",
        headers = serde_json::to_string(&snapshot.headers).unwrap_or_default(),
        range = snapshot.suggested_range(),
    )
}

/// User message for chart generation, carrying the precomputed suggested
/// range so the model anchors on real sheet dimensions.
pub fn chart_user_message(query: &str, snapshot: &SheetSnapshot) -> String {
    format!(
        "Create a chart for: {query}\n\n\
         Excel Context:\n\
         - Available Columns: {headers}\n\
         - Selected/Suggested Data Range: {range}\n\
         - Number of Rows: {rows}\n\
         - Number of Columns: {cols}\n\
         - Data Sample (first few rows): {sample}\n\n\
         Choose the most appropriate chart type and ensure dataRange captures all relevant data.\n\
         If headers exist, include them in the range (e.g., A1:B10 for headers in row 1, data in rows 2-10).\n",
        headers = serde_json::to_string(&snapshot.headers).unwrap_or_default(),
        range = snapshot.suggested_range(),
        rows = snapshot.row_count,
        cols = snapshot.column_count,
        sample = sample_json(snapshot),
    )
}

/// User message for pivot generation, carrying the numeric-column scan.
pub fn pivot_user_message(query: &str, snapshot: &SheetSnapshot) -> String {
    format!(
        "Create a pivot table for: {query}\n\n\
         Available Column Headers (USE THESE EXACTLY): {headers}\n\
         Detected Numeric Columns (good for values): {numeric}\n\
         Data Range: {range}\n\n\
         Data Sample (first 5 rows): {sample}\n\n\
         Instructions:\n\
         1. Identify FILTER fields: Look for phrases like \"for X\", \"in Y\", \"where Z\" - these go in filters\n\
         2. Identify ROW fields: What categories to group/break down by\n\
         3. Identify VALUE fields: What to measure/aggregate (REQUIRED - never leave empty!)\n\
         - Prefer numeric columns for sum/average, count for categorical data\n\
         4. Use EXACT column names from headers list\n",
        headers = serde_json::to_string(&snapshot.headers).unwrap_or_default(),
        numeric = serde_json::to_string(&snapshot.numeric_majority_columns()).unwrap_or_default(),
        range = snapshot.suggested_range(),
        sample = sample_json(snapshot),
    )
}

fn sample_json(snapshot: &SheetSnapshot) -> String {
    let sample: Vec<_> = snapshot.data_sample.iter().take(5).collect();
    serde_json::to_string(&sample).unwrap_or_default()
}
