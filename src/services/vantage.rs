//! Import and export of instances.vantage.sh comparison links.
//!
//! The site keeps its state in the query string: `filter` is a pipe separated list,
//! `selected` a comma separated list and `compare_on` toggles the comparison view.
//! Links are treated as untrusted text; a bad link yields an empty, invalid result
//! instead of an error.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

pub const VANTAGE_BASE_URL: &str = "https://instances.vantage.sh";
const MAX_INSTANCE_TYPE_LEN: usize = 32;

static INSTANCE_TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z0-9][a-z0-9.-]+$").unwrap());

/// Instance lists to put into a comparison link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VantageSelection {
    pub filter: Vec<String>,
    pub selected: Vec<String>,
    pub compare_on: bool,
}

impl VantageSelection {
    /// Link state mirroring the instance types chosen in the form.
    pub fn from_instance_types(types: &[String]) -> Self {
        Self {
            filter: types.to_vec(),
            selected: types.to_vec(),
            compare_on: true,
        }
    }
}

/// Result of parsing a pasted link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VantageImport {
    pub filter: Vec<String>,
    pub selected: Vec<String>,
    pub compare_on: bool,
    pub is_valid: bool,
}

pub fn is_instance_type_token(token: &str) -> bool {
    token.len() <= MAX_INSTANCE_TYPE_LEN && INSTANCE_TYPE_RE.is_match(token)
}

fn descending(values: &[String]) -> Vec<&str> {
    let set: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    set.into_iter().rev().collect()
}

/// Build a comparison link; empty lists and a disabled comparison are left out.
pub fn export_url(selection: &VantageSelection) -> String {
    let mut params: Vec<String> = Vec::new();
    if !selection.filter.is_empty() {
        params.push(format!("filter={}", descending(&selection.filter).join("|")));
    }
    if !selection.selected.is_empty() {
        params.push(format!("selected={}", descending(&selection.selected).join(",")));
    }
    if selection.compare_on {
        params.push("compare_on=true".to_string());
    }
    if params.is_empty() {
        VANTAGE_BASE_URL.to_string()
    } else {
        format!("{}/?{}", VANTAGE_BASE_URL, params.join("&"))
    }
}

fn split_tokens(raw: Option<String>, separator: char) -> Vec<String> {
    raw.map(|v| {
        v.split(separator)
            .filter(|t| is_instance_type_token(t))
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse a pasted link. Never fails: unparsable links or links to another origin
/// come back with `is_valid == false` and empty lists.
pub fn import_url(raw: &str) -> VantageImport {
    let parsed = match Url::parse(raw.trim()) {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!(%e, "Ignoring unparsable instances.vantage.sh link");
            return VantageImport::default();
        }
    };
    if parsed.origin().ascii_serialization() != VANTAGE_BASE_URL {
        tracing::debug!(origin = %parsed.origin().ascii_serialization(), "Ignoring link to unexpected host");
        return VantageImport::default();
    }
    let param = |name: &str| {
        parsed
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    VantageImport {
        filter: split_tokens(param("filter"), '|'),
        selected: split_tokens(param("selected"), ','),
        compare_on: param("compare_on").as_deref() == Some("true"),
        is_valid: true,
    }
}
