// URL handling utilities
pub mod url_encoding;
pub mod url_builder;
pub mod query_string;

// Parsing utilities
pub mod parse_capacity;
pub mod parse_list;

// Re-export all utilities for convenient access
pub use url_encoding::parse_urlencoded_body;
pub use url_builder::absolute_url;
pub use query_string::{build_query_string, with_query};
pub use parse_capacity::parse_target_capacity;
pub use parse_list::{parse_csv_list, parse_text_list};
