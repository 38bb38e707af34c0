// Base template trait shared by all pages
pub mod base_template;
pub use base_template::BaseTemplate;

pub mod generator_template;
pub use generator_template::GeneratorTemplate;
