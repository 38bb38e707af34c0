use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ImportError;
use crate::models::{FormState, SpotFleetDocument};
use crate::services::input_validator::validate;

static FLEET_ROLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^arn:aws:iam::([0-9]+):role/").unwrap());

// Lenient view of a pasted request: only the fields the form is derived from,
// everything else is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PastedFleetRequest {
    iam_fleet_role: Option<String>,
    target_capacity: Option<u32>,
    launch_template_configs: Option<Vec<PastedTemplateConfig>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PastedTemplateConfig {
    launch_template_specification: Option<PastedTemplateSpecification>,
    overrides: Option<Vec<PastedOverride>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PastedTemplateSpecification {
    launch_template_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PastedOverride {
    instance_type: Option<String>,
    subnet_id: Option<String>,
}

/// Recover the account ID embedded in a fleet role ARN.
pub fn account_id_from_role(role: &str) -> Option<String> {
    FLEET_ROLE_RE
        .captures(role)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Non-blank values, first occurrence wins.
fn distinct_in_order<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for v in values.map(str::trim) {
        if !v.is_empty() && !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

fn extract_pasted(request: PastedFleetRequest) -> Result<FormState, ImportError> {
    let role = request
        .iam_fleet_role
        .ok_or_else(|| ImportError::MalformedDocument("IamFleetRole is missing".into()))?;
    let account_id = account_id_from_role(&role)
        .ok_or_else(|| ImportError::MalformedDocument(format!("IamFleetRole '{}' is not an IAM role ARN", role)))?;

    let first_config = request
        .launch_template_configs
        .and_then(|configs| configs.into_iter().next())
        .ok_or_else(|| ImportError::MalformedDocument("LaunchTemplateConfigs is empty".into()))?;
    let launch_template_id = first_config
        .launch_template_specification
        .and_then(|spec| spec.launch_template_id)
        .ok_or_else(|| {
            ImportError::MalformedDocument("LaunchTemplateSpecification.LaunchTemplateId is missing".into())
        })?;

    let target_capacity = request
        .target_capacity
        .ok_or_else(|| ImportError::MalformedDocument("TargetCapacity is missing".into()))?;

    let overrides = first_config.overrides.unwrap_or_default();
    let instance_types = distinct_in_order(overrides.iter().filter_map(|o| o.instance_type.as_deref()));
    let subnet_ids = distinct_in_order(overrides.iter().filter_map(|o| o.subnet_id.as_deref()));

    let form = FormState {
        account_id,
        launch_template_id,
        target_capacity,
        instance_types,
        subnet_ids,
    };
    validate(&form)?;
    tracing::debug!(
        account_id = %form.account_id,
        instance_types = form.instance_types.len(),
        subnets = form.subnet_ids.len(),
        "Extracted form state from Spot Fleet document"
    );
    Ok(form)
}

/// Derive form state from an arbitrary JSON value.
pub fn extract_value(value: Value) -> Result<FormState, ImportError> {
    let request: PastedFleetRequest =
        serde_json::from_value(value).map_err(|e| ImportError::MalformedDocument(e.to_string()))?;
    extract_pasted(request)
}

/// Derive form state from pasted JSON text.
pub fn extract_json(text: &str) -> Result<FormState, ImportError> {
    let request: PastedFleetRequest =
        serde_json::from_str(text).map_err(|e| ImportError::MalformedDocument(e.to_string()))?;
    extract_pasted(request)
}

/// Inverse of `config_builder::build` for the form fields.
pub fn extract(doc: &SpotFleetDocument) -> Result<FormState, ImportError> {
    let value = serde_json::to_value(doc).map_err(|e| ImportError::MalformedDocument(e.to_string()))?;
    extract_value(value)
}
