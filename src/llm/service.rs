//! Model-call entry points
//!
//! One function per logical action: query interpretation, formula
//! generation, chart generation, pivot generation. Each is a single
//! model round-trip followed by the deterministic extract → normalize →
//! generate pipeline; there is no multi-turn interaction and no state
//! between calls.

use crate::action::extract::extract;
use crate::action::normalize::{
    normalize, normalize_chart_params, normalize_formula_text, normalize_pivot_params,
};
use crate::action::script::generate;
use crate::action::{ActionKind, ActionParams, GeneratedAction, NormalizedAction};
use crate::core::error::Result;
use crate::llm::client::LlmClient;
use crate::llm::prompts;
use crate::sheet::SheetSnapshot;
use serde_json::Value;

/// Interpret a free-text request into a generated action.
///
/// The full pipeline: classify via the model, extract the structured
/// document, normalize against the snapshot, compile to a script.
pub async fn interpret_query(
    client: &LlmClient,
    query: &str,
    snapshot: &SheetSnapshot,
) -> Result<GeneratedAction> {
    let user = prompts::interpret_user_message(query, snapshot);
    let response = client
        .complete(prompts::INTERPRET_QUERY_PROMPT, &user)
        .await?;

    let doc = extract(&response).inspect_err(|_| {
        tracing::warn!(response = %response, "model returned unparseable action document");
    })?;

    let action = normalize(&doc, snapshot);
    tracing::info!(kind = ?action.kind, warnings = action.warnings.len(), "normalized action");
    Ok(generate(&action))
}

/// Generate a bare Excel formula string, fences stripped and `=`-prefixed.
pub async fn generate_formula(
    client: &LlmClient,
    query: &str,
    snapshot: &SheetSnapshot,
) -> Result<String> {
    let user = prompts::formula_user_message(query, snapshot);
    let response = client
        .complete(prompts::GENERATE_FORMULA_PROMPT, &user)
        .await?;
    Ok(normalize_formula_text(&response))
}

/// Generate a chart action: the model proposes a chart config, the
/// normalizer repairs its data range, and the generator compiles it.
pub async fn generate_chart(
    client: &LlmClient,
    query: &str,
    snapshot: &SheetSnapshot,
) -> Result<GeneratedAction> {
    let user = prompts::chart_user_message(query, snapshot);
    let response = client
        .complete(prompts::GENERATE_CHART_PROMPT, &user)
        .await?;

    let doc = extract(&response).inspect_err(|_| {
        tracing::warn!(response = %response, "model returned unparseable chart config");
    })?;

    let params = normalize_chart_params(&Value::Object(doc), snapshot);
    let explanation = format!(
        "Creating a {} chart with the specified data",
        serde_json::to_value(params.chart_type)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "column".to_string()),
    );

    let action = NormalizedAction {
        kind: ActionKind::Chart,
        params: ActionParams::Chart(params),
        explanation,
        warnings: Vec::new(),
    };
    Ok(generate(&action))
}

/// Generate a validated pivot-table configuration.
///
/// Returns the normalized action (not a compiled script) so callers see
/// both the repaired config and any dropped-field warnings.
pub async fn generate_pivot(
    client: &LlmClient,
    query: &str,
    snapshot: &SheetSnapshot,
) -> Result<NormalizedAction> {
    let user = prompts::pivot_user_message(query, snapshot);
    let response = client
        .complete(prompts::GENERATE_PIVOT_PROMPT, &user)
        .await?;

    let doc = extract(&response).inspect_err(|_| {
        tracing::warn!(response = %response, "model returned unparseable pivot config");
    })?;

    let mut warnings = Vec::new();
    let params = normalize_pivot_params(&Value::Object(doc), snapshot, &mut warnings);

    Ok(NormalizedAction {
        kind: ActionKind::PivotTable,
        params: ActionParams::Pivot(params),
        explanation: String::new(),
        warnings,
    })
}
