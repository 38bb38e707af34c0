use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

use crate::models::{AppState, FormState};
use crate::services::{form_from_query, import_url, merge_query_params};
use crate::utils::{build_query_string, with_query};
use super::generator::{generator_page, PageExtras};
use super::helpers::{query_map, render_template};

#[derive(Deserialize)]
pub struct VantageImportForm {
    vantage_url: Option<String>,
    current_query: Option<String>,
}

/// Replace the selected instance types with the `selected` list of a pasted
/// instances.vantage.sh link.
pub async fn vantage_import_post(
    State(state): State<AppState>,
    Form(input): Form<VantageImportForm>,
) -> impl IntoResponse {
    let raw = input.vantage_url.unwrap_or_default();
    let existing = query_map(&input.current_query.unwrap_or_default());
    let imported = import_url(&raw);
    if !imported.is_valid {
        tracing::warn!(url = %raw, "Rejected instances.vantage.sh URL");
        return render_template(
            StatusCode::UNPROCESSABLE_ENTITY,
            generator_page(&state, &form_from_query(&existing), PageExtras {
                messages: vec!["Invalid instances.vantage.sh URL".to_string()],
                vantage_input: raw,
                ..Default::default()
            }),
        );
    }
    tracing::info!(selected = imported.selected.len(), "Imported instance selection from instances.vantage.sh");
    // Only the selection changes; every other parameter stays as it was.
    let mut selection = FormState::default();
    selection.set_instance_types(imported.selected);
    let query = build_query_string(&merge_query_params(&existing, &selection));
    Redirect::to(&with_query("/", &query)).into_response()
}
