use std::collections::HashMap;

use crate::models::FormState;
use crate::utils::{build_query_string, parse_csv_list, parse_target_capacity};

pub const PARAM_ACCOUNT_ID: &str = "accountId";
pub const PARAM_LAUNCH_TEMPLATE_ID: &str = "launchTemplateId";
pub const PARAM_TARGET_CAPACITY: &str = "targetCapacity";
pub const PARAM_INSTANCES: &str = "instances";
pub const PARAM_SUBNET_IDS: &str = "subnetIds";

/// Read the form from shareable URL parameters. Missing parameters leave the
/// corresponding field empty.
pub fn form_from_query(query: &HashMap<String, String>) -> FormState {
    let text = |key: &str| query.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
    FormState {
        account_id: text(PARAM_ACCOUNT_ID),
        launch_template_id: text(PARAM_LAUNCH_TEMPLATE_ID),
        target_capacity: parse_target_capacity(query.get(PARAM_TARGET_CAPACITY).map(String::as_str)),
        instance_types: parse_csv_list(query.get(PARAM_INSTANCES).map(String::as_str)),
        subnet_ids: parse_csv_list(query.get(PARAM_SUBNET_IDS).map(String::as_str)),
    }
}

/// Combine the form with the parameters already in the address bar. A filled form
/// field wins; an empty one keeps whatever the URL carried.
pub fn merge_query_params(existing: &HashMap<String, String>, form: &FormState) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut push = |key: &str, value: String| {
        if !value.is_empty() {
            pairs.push((key.to_string(), value));
        } else if let Some(prev) = existing.get(key).filter(|v| !v.is_empty()) {
            pairs.push((key.to_string(), prev.clone()));
        }
    };
    push(PARAM_INSTANCES, form.instance_types.join(","));
    push(PARAM_SUBNET_IDS, form.filled_subnet_ids().join(","));
    push(PARAM_ACCOUNT_ID, form.account_id.clone());
    push(PARAM_LAUNCH_TEMPLATE_ID, form.launch_template_id.clone());
    let capacity = if form.target_capacity > 0 {
        form.target_capacity.to_string()
    } else {
        String::new()
    };
    push(PARAM_TARGET_CAPACITY, capacity);
    pairs
}

/// Query string capturing the whole form.
pub fn share_query(form: &FormState) -> String {
    build_query_string(&merge_query_params(&HashMap::new(), form))
}
