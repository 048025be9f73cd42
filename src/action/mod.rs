//! Structured spreadsheet actions
//!
//! The model classifies a user request into one of a closed set of action
//! kinds; each kind carries typed parameters. Normalization produces an
//! immutable [`NormalizedAction`], and script generation turns that into a
//! [`GeneratedAction`] carrying the executable Office-script text.

pub mod extract;
pub mod normalize;
pub mod script;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The classified intent of a user request.
///
/// `Generic` is the terminal fallback: unrecognized kind strings
/// deserialize to it, and it is what the generator emits a no-op script
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Formula,
    PivotTable,
    Chart,
    Filter,
    Sort,
    Other,
    #[serde(other)]
    Generic,
}

impl Default for ActionKind {
    fn default() -> Self {
        Self::Generic
    }
}

/// Chart types the model may request, mirroring the prompt contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Column,
    Pie,
    Area,
    Scatter,
}

impl Default for ChartType {
    fn default() -> Self {
        Self::Column
    }
}

impl ChartType {
    /// Lenient parse: anything unrecognized becomes the default column
    /// chart rather than an error.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "line" => Self::Line,
            "bar" => Self::Bar,
            "column" => Self::Column,
            "pie" => Self::Pie,
            "area" => Self::Area,
            "scatter" => Self::Scatter,
            _ => Self::Column,
        }
    }
}

fn lenient_chart_type<'de, D>(deserializer: D) -> Result<ChartType, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref()
        .and_then(Value::as_str)
        .map(ChartType::parse)
        .unwrap_or_default())
}

/// Aggregation functions a pivot value field can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunction {
    Sum,
    Count,
    Average,
    Max,
    Min,
}

impl Default for AggFunction {
    fn default() -> Self {
        Self::Sum
    }
}

impl AggFunction {
    /// Lenient parse with the same fallback the host mapping uses:
    /// unrecognized names aggregate by sum.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sum" => Self::Sum,
            "count" => Self::Count,
            "average" => Self::Average,
            "max" => Self::Max,
            "min" => Self::Min,
            _ => Self::Sum,
        }
    }
}

fn lenient_agg_function<'de, D>(deserializer: D) -> Result<AggFunction, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref()
        .and_then(Value::as_str)
        .map(AggFunction::parse)
        .unwrap_or_default())
}

// Per-field leniency: the model occasionally emits the wrong JSON type
// for a single field. Defaulting happens per field so a bad value never
// discards its valid siblings.

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref()
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(Value::as_str).map(str::to_string))
}

fn lenient_target_cell<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref()
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(default_target_cell))
}

fn lenient_string_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_pivot_values<'de, D>(deserializer: D) -> Result<Vec<PivotValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn default_target_cell() -> String {
    "A1".to_string()
}

/// Parameters for a formula assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub formula: String,
    /// Cell the formula is written to. The model is asked to pick an
    /// empty cell; absent that, A1. `target` is accepted as an alias.
    #[serde(
        default = "default_target_cell",
        alias = "target",
        deserialize_with = "lenient_target_cell"
    )]
    pub target_cell: String,
}

impl Default for FormulaParams {
    fn default() -> Self {
        Self {
            formula: String::new(),
            target_cell: default_target_cell(),
        }
    }
}

/// Parameters for chart creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartParams {
    #[serde(default, deserialize_with = "lenient_chart_type")]
    pub chart_type: ChartType,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_range: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<String>,
}

/// One aggregated field of a pivot table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotValue {
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_agg_function")]
    pub function: AggFunction,
}

/// Parameters for pivot-table construction. All field names must match
/// snapshot headers exactly after normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotParams {
    #[serde(default, deserialize_with = "lenient_string_vec")]
    pub rows: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_vec")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "lenient_pivot_values")]
    pub values: Vec<PivotValue>,
    #[serde(default, deserialize_with = "lenient_string_vec")]
    pub filters: Vec<String>,
}

/// Kind-specific parameters of a normalized action.
///
/// Kinds without a dedicated script template keep their raw parameters
/// opaquely and compile to the generic no-op script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionParams {
    Formula(FormulaParams),
    Chart(ChartParams),
    Pivot(PivotParams),
    Opaque(Value),
}

/// A validated, defaulted action. Immutable once built; the generator
/// consumes it by reference and never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAction {
    pub kind: ActionKind,
    pub params: ActionParams,
    pub explanation: String,
    /// Repairs worth surfacing to the caller, e.g. pivot fields dropped
    /// for not matching any sheet header.
    pub warnings: Vec<String>,
}

/// Final pipeline output: the structured action plus the Office-script
/// text the host runtime executes.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedAction {
    pub action: ActionKind,
    pub parameters: Value,
    pub explanation: String,
    pub office_script: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
