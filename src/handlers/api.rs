use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::DOWNLOAD_FILE_NAME;
use crate::error::ValidationError;
use crate::models::{AppState, FormState, SpotFleetDocument};
use crate::services::{build, extract_json, form_from_query, render_pretty, share_query, validate};

fn document_from_query(q: &HashMap<String, String>) -> Result<SpotFleetDocument, ValidationError> {
    let form = form_from_query(q);
    validate(&form)?;
    Ok(build(&form, Utc::now()))
}

fn error_json(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// The document for the form in the query string, as an attachment.
pub async fn download_get(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    let doc = match document_from_query(&q) {
        Ok(doc) => doc,
        Err(e) => return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    };
    match render_pretty(&doc) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME)),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(%e, "Failed to serialize configuration");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub async fn config_get(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    match document_from_query(&q) {
        Ok(doc) => Json(doc).into_response(),
        Err(e) => error_json(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

#[derive(Deserialize)]
pub struct EditorDraft {
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorCommit {
    pub status: &'static str,
    pub form: FormState,
    pub share_query: String,
}

/// Debounced JSON editor sync. Each draft replaces the previous pending one;
/// replaced drafts answer `204 No Content`, the last one is extracted once the
/// editor has been quiet.
pub async fn editor_draft_post(
    State(state): State<AppState>,
    Path(editor_id): Path<String>,
    Json(draft): Json<EditorDraft>,
) -> impl IntoResponse {
    let debouncer = state.editors.debouncer(&editor_id);
    let text = draft.text;
    match debouncer.run(move || extract_json(&text)).await {
        None => StatusCode::NO_CONTENT.into_response(),
        Some(Ok(form)) => {
            tracing::info!(editor_id = %editor_id, account_id = %form.account_id, "Applied JSON editor draft");
            let share_query = share_query(&form);
            Json(EditorCommit { status: "applied", form, share_query }).into_response()
        }
        Some(Err(e)) => {
            tracing::debug!(editor_id = %editor_id, %e, "JSON editor draft rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "status": "rejected", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
