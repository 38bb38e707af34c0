use askama::Template;

use crate::models::{GeneratorFormData, InstanceTypeOption, SubnetRow};

#[derive(Template)]
#[template(path = "generator.html")]
pub struct GeneratorTemplate {
    pub page_title: String,
    pub base_url: String,
    pub messages: Vec<String>,
    pub has_messages: bool,
    pub form_data: GeneratorFormData,
    pub search: String,
    pub instance_options: Vec<InstanceTypeOption>,
    /// Selected types hidden by the current search (or absent from the catalog).
    pub hidden_instance_types: Vec<String>,
    pub selected_instance_types: Vec<String>,
    pub subnet_rows: Vec<SubnetRow>,
    pub current_query: String,
    pub share_url: String,
    pub preview_json: String,
    pub has_preview: bool,
    pub download_url: String,
    pub vantage_url: String,
    pub has_vantage_url: bool,
    pub vantage_input: String,
    pub import_text: String,
    pub editor_quiet_ms: u128,
}

crate::impl_base_template!(GeneratorTemplate);
