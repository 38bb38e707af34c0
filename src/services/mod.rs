pub mod artifact;
pub mod catalog;
pub mod config_builder;
pub mod config_extractor;
pub mod debounce;
pub mod input_validator;
pub mod share_state;
pub mod vantage;

// Re-export commonly used functions
pub use artifact::{render_pretty, write_document};
pub use catalog::InstanceCatalog;
pub use config_builder::build;
pub use config_extractor::{extract, extract_json, extract_value};
pub use input_validator::validate;
pub use share_state::{form_from_query, merge_query_params, share_query};
pub use vantage::{export_url, import_url, VantageImport, VantageSelection};
