use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An AWS Spot Fleet request, in the exact JSON shape the EC2 console accepts.
///
/// Field order matches the serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpotFleetDocument {
    pub iam_fleet_role: String,
    pub allocation_strategy: String,
    pub target_capacity: u32,
    pub valid_from: String,
    pub valid_until: String,
    pub terminate_instances_with_expiration: bool,
    #[serde(rename = "Type")]
    pub fleet_type: String,
    pub on_demand_allocation_strategy: String,
    pub launch_specifications: Vec<Value>,
    pub launch_template_configs: Vec<LaunchTemplateConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplateConfig {
    pub launch_template_specification: LaunchTemplateSpecification,
    pub overrides: Vec<FleetOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplateSpecification {
    pub launch_template_id: String,
    pub version: String,
}

/// One (instance type, subnet) pairing eligible for fleet capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FleetOverride {
    pub instance_type: String,
    pub weighted_capacity: u32,
    pub subnet_id: String,
}
