pub mod app_state;
pub mod fleet_document;
pub mod form_state;
pub mod generator_view;

pub use app_state::AppState;
pub use fleet_document::{FleetOverride, LaunchTemplateConfig, LaunchTemplateSpecification, SpotFleetDocument};
pub use form_state::FormState;
pub use generator_view::{GeneratorFormData, InstanceTypeOption, SubnetRow};
