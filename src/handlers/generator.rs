use axum::{
    body::Bytes,
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{AppState, FormState, GeneratorFormData, InstanceTypeOption, SubnetRow};
use crate::services::{build, extract_json, form_from_query, render_pretty, share_query, validate};
use crate::services::vantage::{export_url, VantageSelection};
use crate::templates::GeneratorTemplate;
use crate::utils::{build_query_string, parse_urlencoded_body, with_query};
use super::helpers::{absolute_url_from_state, query_map, render_template, submitted_form};

const PAGE_TITLE: &str = "AWS Spot Fleet Configuration Generator";

/// Page state that does not live in the form itself.
#[derive(Default)]
pub struct PageExtras {
    pub search: String,
    pub messages: Vec<String>,
    pub import_text: String,
    pub vantage_input: String,
    pub target_capacity_text: Option<String>,
}

pub fn generator_page(state: &AppState, form: &FormState, extras: PageExtras) -> GeneratorTemplate {
    let visible = state.catalog.search(&extras.search);
    let instance_options: Vec<InstanceTypeOption> = visible
        .iter()
        .map(|name| InstanceTypeOption {
            name: name.to_string(),
            selected: form.instance_types.iter().any(|t| t == name),
        })
        .collect();
    let hidden_instance_types: Vec<String> = form
        .instance_types
        .iter()
        .filter(|t| !visible.contains(&t.as_str()))
        .cloned()
        .collect();

    let mut subnet_rows: Vec<SubnetRow> = form
        .subnet_ids
        .iter()
        .enumerate()
        .map(|(index, subnet_id)| SubnetRow { index, subnet_id: subnet_id.clone() })
        .collect();
    if subnet_rows.is_empty() {
        subnet_rows.push(SubnetRow { index: 0, subnet_id: String::new() });
    }

    let preview_json = if validate(form).is_ok() {
        // Blank subnet rows never reach the document.
        let filled = FormState { subnet_ids: form.filled_subnet_ids(), ..form.clone() };
        match render_pretty(&build(&filled, Utc::now())) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(%e, "Failed to render configuration preview");
                String::new()
            }
        }
    } else {
        String::new()
    };

    let vantage_url = if form.instance_types.is_empty() {
        String::new()
    } else {
        export_url(&VantageSelection::from_instance_types(&form.instance_types))
    };

    let current_query = share_query(form);
    let target_capacity = extras.target_capacity_text.unwrap_or_else(|| {
        if form.target_capacity > 0 {
            form.target_capacity.to_string()
        } else {
            String::new()
        }
    });
    let has_messages = !extras.messages.is_empty();

    GeneratorTemplate {
        page_title: PAGE_TITLE.to_string(),
        base_url: state.public_base_url.clone(),
        messages: extras.messages,
        has_messages,
        form_data: GeneratorFormData {
            account_id: form.account_id.clone(),
            launch_template_id: form.launch_template_id.clone(),
            target_capacity,
        },
        search: extras.search,
        instance_options,
        hidden_instance_types,
        selected_instance_types: form.instance_types.clone(),
        subnet_rows,
        share_url: absolute_url_from_state(state, &with_query("/", &current_query)),
        download_url: with_query("/download", &current_query),
        current_query,
        has_preview: !preview_json.is_empty(),
        preview_json,
        has_vantage_url: !vantage_url.is_empty(),
        vantage_url,
        vantage_input: extras.vantage_input,
        import_text: extras.import_text,
        editor_quiet_ms: state.editors.quiet_interval().as_millis(),
    }
}

/// Redirect back to the page with the form encoded in the address bar.
fn redirect_to_form(form: &FormState, search: &str) -> Response {
    let mut query = share_query(form);
    if !search.is_empty() {
        let search_pair = build_query_string(&[("search".to_string(), search.to_string())]);
        query = if query.is_empty() { search_pair } else { format!("{}&{}", query, search_pair) };
    }
    Redirect::to(&with_query("/", &query)).into_response()
}

fn rejected(state: &AppState, form: &FormState, extras: PageExtras) -> Response {
    render_template(StatusCode::UNPROCESSABLE_ENTITY, generator_page(state, form, extras))
}

pub async fn index_get(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let form = form_from_query(&q);
    let extras = PageExtras {
        search: q.get("search").map(|s| s.trim().to_string()).unwrap_or_default(),
        ..Default::default()
    };
    render_template(StatusCode::OK, generator_page(&state, &form, extras))
}

pub async fn generate_post(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let submitted = submitted_form(&parse_urlencoded_body(&body));
    let mut form = submitted.form;
    if let Err(e) = validate(&form) {
        tracing::warn!(%e, "Rejected configuration form");
        return rejected(&state, &form, PageExtras {
            search: submitted.search,
            messages: vec![e.to_string()],
            target_capacity_text: Some(submitted.target_capacity_text),
            ..Default::default()
        });
    }
    form.subnet_ids = form.filled_subnet_ids();
    tracing::info!(
        account_id = %form.account_id,
        target_capacity = form.target_capacity,
        overrides = form.instance_types.len() * form.subnet_ids.len(),
        "Generated Spot Fleet configuration"
    );
    redirect_to_form(&form, &submitted.search)
}

pub async fn subnets_add_post(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let submitted = submitted_form(&parse_urlencoded_body(&body));
    let mut form = submitted.form;
    if let Err(e) = form.add_subnet(&submitted.new_subnet) {
        tracing::warn!(%e, subnet = %submitted.new_subnet, "Rejected subnet");
        return rejected(&state, &form, PageExtras {
            search: submitted.search,
            messages: vec![e.to_string()],
            target_capacity_text: Some(submitted.target_capacity_text),
            ..Default::default()
        });
    }
    redirect_to_form(&form, &submitted.search)
}

pub async fn subnets_remove_post(body: Bytes) -> impl IntoResponse {
    let submitted = submitted_form(&parse_urlencoded_body(&body));
    let mut form = submitted.form;
    if let Some(index) = submitted.remove_index {
        form.remove_subnet(index);
    }
    redirect_to_form(&form, &submitted.search)
}

pub async fn search_post(body: Bytes) -> impl IntoResponse {
    let submitted = submitted_form(&parse_urlencoded_body(&body));
    redirect_to_form(&submitted.form, &submitted.search)
}

#[derive(Deserialize)]
pub struct ImportForm {
    json: Option<String>,
    current_query: Option<String>,
}

pub async fn import_post(State(state): State<AppState>, Form(input): Form<ImportForm>) -> impl IntoResponse {
    let text = input.json.unwrap_or_default();
    match extract_json(&text) {
        Ok(form) => {
            tracing::info!(account_id = %form.account_id, "Imported Spot Fleet configuration");
            redirect_to_form(&form, "")
        }
        Err(e) => {
            tracing::warn!(%e, "Import failed");
            let previous = form_from_query(&query_map(&input.current_query.unwrap_or_default()));
            rejected(&state, &previous, PageExtras {
                messages: vec![format!("Import failed: {}", e)],
                import_text: text,
                ..Default::default()
            })
        }
    }
}
