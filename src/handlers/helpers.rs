use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::models::{AppState, FormState};
use crate::templates::BaseTemplate;
use crate::utils::{parse_target_capacity, parse_text_list};

/// Everything the generator form posts back, whichever button submitted it.
#[derive(Debug, Clone, Default)]
pub struct SubmittedForm {
    pub form: FormState,
    pub search: String,
    pub new_subnet: String,
    pub remove_index: Option<usize>,
    /// Raw target capacity text, echoed back when the page is re-rendered.
    pub target_capacity_text: String,
}

fn first_value(body: &HashMap<String, Vec<String>>, key: &str) -> String {
    body.get(key)
        .and_then(|v| v.first())
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

pub fn submitted_form(body: &HashMap<String, Vec<String>>) -> SubmittedForm {
    let target_capacity_text = first_value(body, "targetCapacity");
    let mut form = FormState {
        account_id: first_value(body, "accountId"),
        launch_template_id: first_value(body, "launchTemplateId"),
        target_capacity: parse_target_capacity(Some(&target_capacity_text)),
        instance_types: Vec::new(),
        subnet_ids: parse_text_list(body.get("subnet")),
    };
    form.set_instance_types(parse_text_list(body.get("instance")));
    SubmittedForm {
        form,
        search: first_value(body, "search"),
        new_subnet: first_value(body, "new_subnet"),
        remove_index: first_value(body, "remove_index").parse::<usize>().ok(),
        target_capacity_text,
    }
}

/// Decode a raw query string (as carried in a hidden `current_query` field).
pub fn query_map(raw: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

pub fn absolute_url_from_state(state: &AppState, path: &str) -> String {
    crate::utils::absolute_url(&state.public_base_url, path)
}

pub fn render_template<T>(status: StatusCode, t: T) -> Response
where
    T: askama::Template + BaseTemplate,
{
    match t.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(%e, page = t.page_title(), "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
